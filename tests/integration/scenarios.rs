use std::cell::RefCell;
use std::rc::Rc;

use tickflow::{Coroutine, CoroutineManager, Sequence, SuspensionPredicate, Yield};

type Log = Rc<RefCell<Vec<&'static str>>>;

fn push(
    log: &Log,
    marker: &'static str,
) -> impl FnOnce() + 'static {
    let log = log.clone();
    move || log.borrow_mut().push(marker)
}

#[test]
fn test_three_segment_procedure() {
    let log = Log::default();
    let (one, two) = (push(&log, "1"), push(&log, "2"));
    let mut coroutine = Coroutine::new(
        Sequence::new()
            .yielding(move || {
                one();
                Yield::Tick
            })
            .yielding(move || {
                two();
                Yield::Tick
            })
            .finish(push(&log, "3")),
    );

    let mut observed = Vec::new();
    for _ in 0..3 {
        let running = coroutine.update(0.016).unwrap();
        observed.push((running, log.borrow().clone()));
    }

    assert_eq!(
        observed,
        vec![
            (true, vec!["1"]),
            (true, vec!["1", "2"]),
            (false, vec!["1", "2", "3"]),
        ]
    );
}

#[test]
fn test_timed_wait_procedure() {
    let log = Log::default();
    let start = push(&log, "start");
    let mut coroutine = Coroutine::new(
        Sequence::new()
            .yielding(move || {
                start();
                SuspensionPredicate::seconds(1.0).into()
            })
            .finish(push(&log, "after")),
    );

    assert!(coroutine.update(0.016).unwrap());
    assert_eq!(*log.borrow(), vec!["start"]);
    assert!(coroutine.update(0.5).unwrap());
    assert_eq!(*log.borrow(), vec!["start"]);
    assert!(!coroutine.is_complete());
    assert!(!coroutine.update(0.5).unwrap());
    assert_eq!(*log.borrow(), vec!["start", "after"]);
    assert!(coroutine.is_complete());
}

#[test]
fn test_nested_coroutine_procedure() {
    let log = Log::default();
    let inner_start = push(&log, "inner_start");
    let inner = Coroutine::new(
        Sequence::new()
            .yielding(move || {
                inner_start();
                Yield::Tick
            })
            .finish(push(&log, "inner_end")),
    );
    let outer_start = push(&log, "outer_start");
    let mut outer = Coroutine::new(
        Sequence::new()
            .yielding(move || {
                outer_start();
                inner.into()
            })
            .finish(push(&log, "outer_end")),
    );

    assert!(outer.update(0.016).unwrap());
    assert_eq!(*log.borrow(), vec!["outer_start", "inner_start"]);
    assert!(!outer.update(0.016).unwrap());
    assert_eq!(
        *log.borrow(),
        vec!["outer_start", "inner_start", "inner_end", "outer_end"]
    );
}

#[test]
fn test_active_count_tracks_completion() {
    let mut manager = CoroutineManager::new();
    for segments in 1..=4 {
        let mut left = segments;
        manager.start(tickflow::from_fn(move || {
            left -= 1;
            Ok(if left == 0 {
                tickflow::Step::Finished
            } else {
                tickflow::Step::tick()
            })
        }));
    }

    let mut counts = Vec::new();
    for _ in 0..5 {
        manager.update(0.016).unwrap();
        counts.push(manager.active_count());
    }
    assert_eq!(counts, vec![3, 2, 1, 0, 0]);
}
