/*!
 * Tests for the change registry through its public API
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use subedit::errors::WorkError;
use subedit::work::{TrackedState, UnitOfWork, WorkBatch};

#[derive(Debug, Clone, Copy)]
enum Op {
    New,
    Updated,
    Deleted,
}

fn apply(uow: &mut UnitOfWork<u32>, op: Op, obj: &Arc<u32>) {
    match op {
        Op::New => {
            let _ = uow.register_new(obj);
        }
        Op::Updated => {
            let _ = uow.register_updated(obj);
        }
        Op::Deleted => uow.register_deleted(obj),
    }
}

fn occurrences(batch: &WorkBatch<u32>, obj: &Arc<u32>) -> usize {
    batch
        .inserted
        .iter()
        .chain(batch.updated.iter())
        .chain(batch.deleted.iter())
        .filter(|tracked| Arc::ptr_eq(tracked, obj))
        .count()
}

/// Every sequence of up to four operations over two objects keeps each
/// object in at most one collection, and `state_of` agrees with the batch
#[test]
fn test_registrations_allShortSequences_shouldKeepMembershipExclusive() {
    let ops = [Op::New, Op::Updated, Op::Deleted];
    let total = (ops.len() * 2).pow(4);

    for code in 0..total {
        let objects = [Arc::new(1u32), Arc::new(2u32)];
        let mut uow = UnitOfWork::new();
        let mut rest = code;

        for _ in 0..4 {
            let step = rest % (ops.len() * 2);
            rest /= ops.len() * 2;
            let obj = &objects[step / ops.len()];
            apply(&mut uow, ops[step % ops.len()], obj);

            let batch = uow.get_work();
            for obj in &objects {
                let count = occurrences(&batch, obj);
                assert!(count <= 1, "sequence {} tracked an object {} times", code, count);

                let expected = if batch.inserted.iter().any(|o| Arc::ptr_eq(o, obj)) {
                    TrackedState::Inserted
                } else if batch.updated.iter().any(|o| Arc::ptr_eq(o, obj)) {
                    TrackedState::Updated
                } else if batch.deleted.iter().any(|o| Arc::ptr_eq(o, obj)) {
                    TrackedState::Deleted
                } else {
                    TrackedState::Untracked
                };
                assert_eq!(uow.state_of(obj), expected);
            }
            assert_eq!(uow.len(), batch.len());
        }
    }
}

#[test]
fn test_transitionTable_fromEachState_shouldMatchExpectations() {
    // (setup, op, expected state, expect error)
    let cases: [(&[Op], Op, TrackedState, bool); 9] = [
        (&[Op::New], Op::New, TrackedState::Inserted, true),
        (&[Op::New], Op::Updated, TrackedState::Inserted, false),
        (&[Op::New], Op::Deleted, TrackedState::Untracked, false),
        (&[Op::Updated], Op::New, TrackedState::Updated, true),
        (&[Op::Updated], Op::Updated, TrackedState::Updated, false),
        (&[Op::Updated], Op::Deleted, TrackedState::Deleted, false),
        (&[Op::Deleted], Op::New, TrackedState::Deleted, true),
        (&[Op::Deleted], Op::Updated, TrackedState::Deleted, true),
        (&[Op::Deleted], Op::Deleted, TrackedState::Deleted, false),
    ];

    for (setup, op, expected, expect_error) in cases {
        let mut uow = UnitOfWork::new();
        let obj = Arc::new(7u32);
        for step in setup {
            apply(&mut uow, *step, &obj);
        }

        let failed = match op {
            Op::New => uow.register_new(&obj).is_err(),
            Op::Updated => uow.register_updated(&obj).is_err(),
            Op::Deleted => {
                uow.register_deleted(&obj);
                false
            }
        };

        assert_eq!(failed, expect_error, "{:?} then {:?}", setup, op);
        assert_eq!(uow.state_of(&obj), expected, "{:?} then {:?}", setup, op);
    }
}

#[test]
fn test_failedRegistration_shouldLeaveFlagAndListenersUntouched() {
    let mut uow = UnitOfWork::new();
    let events = Arc::new(AtomicUsize::new(0));
    let counter = events.clone();
    uow.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let obj = Arc::new(1u32);
    uow.register_deleted(&obj);
    uow.clear();
    uow.register_deleted(&obj);

    let before = uow.get_work().summary();
    assert!(matches!(
        uow.register_updated(&obj),
        Err(WorkError::InvalidTransition { from: TrackedState::Deleted })
    ));
    assert!(uow.register_new(&obj).is_err());

    assert_eq!(uow.get_work().summary(), before);
    assert_eq!(events.load(Ordering::SeqCst), 2);
}

#[test]
fn test_updatedOrder_shouldFollowRegistrationOrder() {
    let mut uow = UnitOfWork::new();
    let objects: Vec<Arc<u32>> = (0..5).map(Arc::new).collect();

    for obj in objects.iter().rev() {
        uow.register_updated(obj).unwrap();
    }
    uow.register_deleted(&objects[2]);

    let updated: Vec<u32> = uow.get_work().updated.iter().map(|o| **o).collect();
    assert_eq!(updated, vec![4, 3, 1, 0]);
}

#[test]
fn test_unsubscribe_shouldStopNotifications() {
    let mut uow = UnitOfWork::new();
    let events = Arc::new(AtomicUsize::new(0));
    let counter = events.clone();
    let id = uow.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    uow.register_new(&Arc::new(1u32)).unwrap();
    assert!(uow.unsubscribe(id));
    uow.register_new(&Arc::new(2u32)).unwrap();

    assert_eq!(events.load(Ordering::SeqCst), 1);
}

#[test]
fn test_trackedState_display_shouldUseLowercaseNames() {
    assert_eq!(TrackedState::Inserted.to_string(), "inserted");
    assert_eq!(TrackedState::Untracked.to_string(), "untracked");
}
