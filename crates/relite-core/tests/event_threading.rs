//! Concurrency tests: registry mutation from many threads, concurrent
//! notification, and subscription teardown racing with dispatch.

use relite_core::{Event, Subscription};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

#[test]
fn concurrent_subscriptions_are_all_registered() {
    const THREADS: usize = 10;
    const PER_THREAD: usize = 100;

    let event = Event::<i32>::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let subs = Mutex::new(Vec::new());

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..PER_THREAD {
                    let calls = Arc::clone(&calls);
                    let sub = event.subscribe(move |_| {
                        calls.fetch_add(1, Ordering::Relaxed);
                    });
                    subs.lock().unwrap().push(sub);
                }
            });
        }
    });

    event.notify(1);
    assert_eq!(calls.load(Ordering::Relaxed), THREADS * PER_THREAD);
    assert_eq!(subs.lock().unwrap().len(), THREADS * PER_THREAD);
}

#[test]
fn concurrent_notifications_deliver_every_call() {
    const HANDLERS: usize = 100;
    const THREADS: usize = 10;
    const PER_THREAD: usize = 100;

    let event = Event::<usize>::new();
    let total = Arc::new(AtomicUsize::new(0));
    let _subs: Vec<Subscription> = (0..HANDLERS)
        .map(|_| {
            let total = Arc::clone(&total);
            event.subscribe(move |v| {
                total.fetch_add(*v, Ordering::Relaxed);
            })
        })
        .collect();

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..PER_THREAD {
                    event.notify(1);
                }
            });
        }
    });

    assert_eq!(
        total.load(Ordering::Relaxed),
        HANDLERS * THREADS * PER_THREAD
    );
}

#[test]
fn subscribe_while_notifying() {
    let event = Event::<i32>::new();
    let stop = AtomicBool::new(false);
    let notified = AtomicUsize::new(0);
    let subscribed = AtomicUsize::new(0);

    thread::scope(|s| {
        s.spawn(|| {
            while !stop.load(Ordering::Acquire) {
                event.notify(1);
                notified.fetch_add(1, Ordering::Relaxed);
            }
        });
        s.spawn(|| {
            let mut subs = Vec::new();
            for _ in 0..200 {
                subs.push(event.subscribe(|_| {}));
                subscribed.fetch_add(1, Ordering::Relaxed);
            }
            stop.store(true, Ordering::Release);
        });
    });

    assert_eq!(subscribed.load(Ordering::Relaxed), 200);
    assert!(notified.load(Ordering::Relaxed) > 0);
}

#[test]
fn concurrent_unsubscribe() {
    const HANDLERS: usize = 400;

    let event = Event::<i32>::new();
    let subs: Vec<Subscription> = (0..HANDLERS).map(|_| event.subscribe(|_| {})).collect();
    let chunks: Vec<Vec<Subscription>> = {
        let mut chunks: Vec<Vec<Subscription>> = (0..4).map(|_| Vec::new()).collect();
        for (i, sub) in subs.into_iter().enumerate() {
            chunks[i % 4].push(sub);
        }
        chunks
    };

    thread::scope(|s| {
        for mut chunk in chunks {
            let event = &event;
            s.spawn(move || {
                for sub in &mut chunk {
                    sub.unsubscribe();
                    event.notify(0);
                }
                assert!(chunk.iter().all(|sub| !sub.is_valid()));
            });
        }
    });

    assert!(event.is_empty());
}

#[test]
fn scoped_drop_races_with_notify() {
    let event = Event::<i32>::new();
    let stop = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            while !stop.load(Ordering::Acquire) {
                event.notify(1);
            }
        });
        s.spawn(|| {
            for _ in 0..500 {
                let hits = Arc::new(AtomicUsize::new(0));
                let scoped = {
                    let hits = Arc::clone(&hits);
                    event.subscribe_scoped(move |_| {
                        hits.fetch_add(1, Ordering::Relaxed);
                    })
                };
                drop(scoped);
                let after_drop = hits.load(Ordering::Relaxed);
                // A notify that snapshotted before the drop may still finish,
                // but no later snapshot can contain the handler.
                thread::yield_now();
                assert!(hits.load(Ordering::Relaxed) <= after_drop + 1);
            }
            stop.store(true, Ordering::Release);
        });
    });

    assert!(event.is_empty());
}

#[test]
fn mixed_operations_stress() {
    const THREADS: usize = 8;
    const ROUNDS: usize = 250;

    let event = Event::<usize>::new();
    let delivered = AtomicUsize::new(0);

    thread::scope(|s| {
        for t in 0..THREADS {
            let event = &event;
            let delivered = &delivered;
            s.spawn(move || {
                let mut own = Vec::new();
                for round in 0..ROUNDS {
                    match (t + round) % 3 {
                        0 => own.push(event.subscribe(|_| {})),
                        1 => {
                            if let Some(mut sub) = own.pop() {
                                sub.unsubscribe();
                            }
                        }
                        _ => {
                            event.notify(round);
                            delivered.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
                for mut sub in own {
                    sub.unsubscribe();
                }
            });
        }
    });

    assert!(event.is_empty());
    assert!(delivered.load(Ordering::Relaxed) > 0);
}
