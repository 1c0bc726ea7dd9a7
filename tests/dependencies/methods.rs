//! Tests for methods registered as tasks

use lazydag::{Ref, Scheduler, SchedulerResult};

use crate::common::types::Ledger;

struct Polygon {
    sides: Vec<f64>,
}

impl Polygon {
    fn perimeter(&self) -> f64 {
        self.sides.iter().sum()
    }

    fn scaled(&self, factor: f64) -> f64 {
        self.perimeter() * factor
    }
}

fn into_sides(p: Polygon) -> usize {
    p.sides.len()
}

#[test]
fn test_method_path_with_ref_receiver() -> SchedulerResult<()> {
    let square = Polygon {
        sides: vec![2.0; 4],
    };
    let scheduler = Scheduler::new();

    let perimeter = scheduler.add(Polygon::perimeter, (Ref(&square),))?;
    let scaled = scheduler.add(Polygon::scaled, (Ref(&square), 1.5))?;

    assert_eq!(scheduler.get_result::<f64>(perimeter)?, 8.0);
    assert_eq!(scheduler.get_result::<f64>(scaled)?, 12.0);
    Ok(())
}

#[test]
fn test_method_result_feeds_another_method() -> SchedulerResult<()> {
    let ledger = Ledger::new(50);
    let scheduler = Scheduler::new();

    let bonus = scheduler.add(|a: i64, b: i64| a * b, (5_i64, 2_i64))?;
    let projected = scheduler.add(
        Ledger::projected,
        (Ref(&ledger), scheduler.future_result::<i64>(bonus)),
    )?;

    assert_eq!(scheduler.get_result::<i64>(projected)?, 60);
    Ok(())
}

#[test]
fn test_mutating_method_with_future_argument() -> SchedulerResult<()> {
    let mut ledger = Ledger::new(0);

    {
        let scheduler = Scheduler::new();
        let amount = scheduler.add(|a: i64, b: i64| a + b, (30_i64, 12_i64))?;
        let deposit = scheduler.add(
            |x: i64| ledger.deposit(x),
            (scheduler.future_result::<i64>(amount),),
        )?;

        assert_eq!(scheduler.get_result::<i64>(deposit)?, 42);
        scheduler.execute_all()?;
    }

    assert_eq!(ledger.balance, 42);
    assert_eq!(ledger.entries, 1);
    Ok(())
}

#[test]
fn test_field_access_task() -> SchedulerResult<()> {
    let ledger = Ledger::new(7);
    let scheduler = Scheduler::new();

    let balance = scheduler.add(|l: &Ledger| l.balance, (Ref(&ledger),))?;

    assert_eq!(scheduler.get_result::<i64>(balance)?, 7);
    Ok(())
}

#[test]
fn test_owned_receiver_moved_into_closure() -> SchedulerResult<()> {
    let scheduler = Scheduler::new();
    let mut polygon = Some(Polygon {
        sides: vec![1.0, 1.0, 1.0],
    });

    // FnMut callables can hand out an owned value on their single run
    let id = scheduler.add(move || polygon.take().map(into_sides), ())?;

    assert_eq!(scheduler.get_result::<Option<usize>>(id)?, Some(3));
    Ok(())
}
