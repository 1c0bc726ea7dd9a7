//! Tests for retrying after a failure

use std::cell::Cell;

use lazydag::{Scheduler, SchedulerError, TaskId};

use crate::common::types::Refused;

#[test]
fn test_flaky_dependency_recovers() {
    let attempts = Cell::new(0_u32);
    let scheduler = Scheduler::new();

    let flaky = scheduler
        .try_add(
            || {
                attempts.set(attempts.get() + 1);
                match attempts.get() {
                    1 => Err(Refused("warming up".into())),
                    n => Ok(n * 100),
                }
            },
            (),
        )
        .unwrap();
    let dependent = scheduler
        .add(|x: u32| x + 1, (scheduler.future_result::<u32>(flaky),))
        .unwrap();

    assert!(scheduler.get_result::<u32>(dependent).is_err());
    assert_eq!(scheduler.get_result::<u32>(dependent).unwrap(), 201);
    assert_eq!(attempts.get(), 2);
}

#[test]
fn test_execute_all_resumes_after_failure() {
    let fail = Cell::new(true);
    let scheduler = Scheduler::new();

    scheduler.add(|| 1_i32, ()).unwrap();
    scheduler
        .try_add(
            || {
                if fail.get() {
                    Err(Refused("not yet".into()))
                } else {
                    Ok(2_i32)
                }
            },
            (),
        )
        .unwrap();
    scheduler.add(|| 3_i32, ()).unwrap();

    assert!(scheduler.execute_all().is_err());
    assert!(!scheduler.is_executed(TaskId(2)).unwrap());

    fail.set(false);
    scheduler.execute_all().unwrap();

    let results: Vec<i32> = (0..3)
        .map(|i| scheduler.get_result::<i32>(TaskId(i)).unwrap())
        .collect();
    assert_eq!(results, vec![1, 2, 3]);
}

#[test]
fn test_panicking_task_can_rerun() {
    let armed = Cell::new(true);
    let scheduler = Scheduler::new();

    let id = scheduler
        .add(
            || {
                if armed.replace(false) {
                    panic!("tripwire");
                }
                "clear"
            },
            (),
        )
        .unwrap();

    assert!(matches!(
        scheduler.execute(id),
        Err(SchedulerError::TaskPanicked { .. })
    ));
    assert_eq!(scheduler.get_result::<&str>(id).unwrap(), "clear");
}

#[test]
fn test_cycle_rejection_does_not_block_later_tasks() {
    let scheduler = Scheduler::new();
    let a = scheduler
        .add(|x: i32| x, (scheduler.future_result::<i32>(TaskId(1)),))
        .unwrap();

    assert!(scheduler
        .add(|x: i32| x, (scheduler.future_result::<i32>(a),))
        .is_err());

    // The id that was refused is handed to the next valid task
    let b = scheduler.add(|| 5, ()).unwrap();
    assert_eq!(b, TaskId(1));
    assert_eq!(scheduler.get_result::<i32>(a).unwrap(), 5);
}
