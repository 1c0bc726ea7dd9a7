//! Tests for reading results by type

use std::collections::HashMap;

use lazydag::{Scheduler, SchedulerError, SchedulerResult};
use test_case::test_case;

#[derive(Debug, Clone, PartialEq)]
struct Report {
    rows: usize,
    totals: HashMap<String, i64>,
}

#[test]
fn test_custom_struct_result() -> SchedulerResult<()> {
    let scheduler = Scheduler::new();
    let id = scheduler.add(
        |rows: usize| Report {
            rows,
            totals: HashMap::from([("north".to_string(), 10), ("south".to_string(), 20)]),
        },
        (2_usize,),
    )?;

    let report = scheduler.get_result::<Report>(id)?;

    assert_eq!(report.rows, 2);
    assert_eq!(report.totals["south"], 20);
    Ok(())
}

#[test]
fn test_float_read_as_int() -> SchedulerResult<()> {
    let scheduler = Scheduler::new();
    let id = scheduler.add(|a: f32, b: f32| a * b, (1.5_f32, 3.0_f32))?;

    let err = scheduler.get_result::<i32>(id).unwrap_err();

    assert!(matches!(err, SchedulerError::TypeMismatch { .. }));
    assert_eq!(scheduler.get_result::<f32>(id)?, 4.5);
    Ok(())
}

#[test_case("i64" ; "wider integer")]
#[test_case("u32" ; "unsigned integer")]
#[test_case("string" ; "owned string")]
#[test_case("option" ; "wrapped value")]
fn test_no_implicit_conversion(requested: &str) {
    let scheduler = Scheduler::new();
    let id = scheduler.add(|| 7_i32, ()).unwrap();

    let result = match requested {
        "i64" => scheduler.get_result::<i64>(id).map(drop),
        "u32" => scheduler.get_result::<u32>(id).map(drop),
        "string" => scheduler.get_result::<String>(id).map(drop),
        _ => scheduler.get_result::<Option<i32>>(id).map(drop),
    };

    assert!(matches!(
        result,
        Err(SchedulerError::TypeMismatch { expected, found: "i32", .. }) if expected.contains(requested_type(requested))
    ));
    // The real type still reads back
    assert_eq!(scheduler.get_result::<i32>(id).unwrap(), 7);
}

fn requested_type(requested: &str) -> &'static str {
    match requested {
        "i64" => "i64",
        "u32" => "u32",
        "string" => "String",
        _ => "Option",
    }
}

#[test]
fn test_fallible_task_stores_inner_type() -> SchedulerResult<()> {
    let scheduler = Scheduler::new();
    let id = scheduler.try_add(|s: &str| s.parse::<u8>(), ("17",))?;

    assert_eq!(scheduler.get_result::<u8>(id)?, 17);
    assert!(matches!(
        scheduler.get_result::<Result<u8, std::num::ParseIntError>>(id),
        Err(SchedulerError::TypeMismatch { .. })
    ));
    Ok(())
}
