//! Accessor patterns built from `Property` closures: dependent and
//! calculated values, caching, formatting, bounds, side effects.

use relite::{Event, Property, ReactiveError, ReadonlyProperty};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn shared<T>(value: T) -> Arc<Mutex<T>> {
    Arc::new(Mutex::new(value))
}

/// Property reading and writing a shared cell.
fn backed<T: Clone + Send + 'static>(cell: &Arc<Mutex<T>>) -> Property<T> {
    let read = Arc::clone(cell);
    let write = Arc::clone(cell);
    Property::with_accessors(
        move || read.lock().unwrap().clone(),
        move |v: &mut T| *write.lock().unwrap() = v.clone(),
    )
}

#[derive(Debug, Clone, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn struct_and_collection_values() {
    let mut point = Property::new(Point { x: 1, y: 2 });
    point.set(Point { x: 3, y: 4 });
    assert_eq!(point.get().x, 3);
    assert!(point == Point { x: 3, y: 4 });

    let mut list = Property::new(vec![1, 2, 3]);
    let mut next = list.get();
    next.push(4);
    list.set(next);
    assert_eq!(list.get().len(), 4);

    let shared_value = Property::new(Arc::new(100));
    assert_eq!(*shared_value.get(), 100);
}

#[test]
fn dependent_property_writes_back_to_base() {
    let storage = shared(10);
    let base = shared(backed(&storage));

    let read_base = Arc::clone(&base);
    let write_base = Arc::clone(&base);
    let mut derived = Property::with_accessors(
        move || read_base.lock().unwrap().get() * 2,
        move |v: &mut i32| write_base.lock().unwrap().set(*v / 2),
    );

    assert_eq!(derived.get(), 20);
    base.lock().unwrap().set(20);
    assert_eq!(derived.get(), 40);

    derived.set(100);
    assert_eq!(base.lock().unwrap().get(), 50);
    assert_eq!(*storage.lock().unwrap(), 50);
    assert_eq!(derived.get(), 100);
}

#[test]
fn calculated_from_two_properties() {
    let mut width = Property::new(10.0);
    let height = Property::new(5.0);
    assert_eq!(width.get() * height.get(), 50.0);

    width.set(20.0);
    assert_eq!(width.get() * height.get(), 100.0);
}

#[test]
fn readonly_area_tracks_inputs() {
    let width = shared(10.0_f64);
    let height = shared(5.0_f64);
    let (w, h) = (Arc::clone(&width), Arc::clone(&height));
    let area = ReadonlyProperty::new(move || *w.lock().unwrap() * *h.lock().unwrap());

    assert!(area == 50.0);
    *width.lock().unwrap() = 20.0;
    assert_eq!(area.get(), 100.0);
    assert_eq!(area.to_string(), "100");
}

#[test]
fn cached_getter_invalidated_by_setter() {
    struct Cache {
        base: i32,
        cached: Option<i32>,
    }

    let computed = Arc::new(AtomicUsize::new(0));
    let state = shared(Cache {
        base: 10,
        cached: None,
    });
    let read = Arc::clone(&state);
    let write = Arc::clone(&state);
    let count = Arc::clone(&computed);
    let mut squared = Property::with_accessors(
        move || {
            let mut cache = read.lock().unwrap();
            let base = cache.base;
            *cache.cached.get_or_insert_with(|| {
                count.fetch_add(1, Ordering::SeqCst);
                base * base
            })
        },
        move |v: &mut i32| {
            let mut cache = write.lock().unwrap();
            cache.base = *v;
            cache.cached = None;
        },
    );

    assert_eq!(computed.load(Ordering::SeqCst), 0);
    assert_eq!(squared.get(), 100);
    assert_eq!(squared.get(), 100);
    assert_eq!(computed.load(Ordering::SeqCst), 1);

    squared.set(5);
    assert_eq!(squared.get(), 25);
    assert_eq!(computed.load(Ordering::SeqCst), 2);
}

#[test]
fn formatting_setter_capitalizes() {
    let storage = shared(String::new());
    let write = Arc::clone(&storage);
    let read = Arc::clone(&storage);
    let mut title = Property::with_accessors(
        move || read.lock().unwrap().clone(),
        move |v: &mut String| {
            if let Some(first) = v.get_mut(..1) {
                first.make_ascii_uppercase();
            }
            *write.lock().unwrap() = v.clone();
        },
    );

    title.set("hello".to_string());
    assert_eq!(title.get(), "Hello");
    title.set("world".to_string());
    assert_eq!(title.get(), "World");
    title.set(String::new());
    assert_eq!(title.get(), "");
}

#[test]
fn bounded_integer_clamps() {
    let mut level = Property::with_auto_accessors(
        |internal: &mut i32| *internal,
        |incoming, internal| *internal = (*incoming).clamp(0, 100),
    );

    level.set(50);
    assert_eq!(level.get(), 50);
    level.set(150);
    assert_eq!(level.get(), 100);
    level.set(-50);
    assert_eq!(level.get(), 0);
}

#[test]
fn setter_side_effects() {
    let history = shared(Vec::new());
    let sink = Arc::clone(&history);
    let mut logged = Property::with_auto_accessors(
        |internal: &mut i32| *internal,
        move |incoming, internal| {
            sink.lock().unwrap().push(format!("{internal} -> {incoming}"));
            *internal = *incoming;
        },
    );

    logged.set(1);
    logged.set(2);
    assert_eq!(*history.lock().unwrap(), vec!["0 -> 1", "1 -> 2"]);
}

#[test]
fn setter_raises_event_for_other_objects() {
    let changed = Arc::new(Event::<i32>::new());
    let received = shared(Vec::new());
    let sink = Arc::clone(&received);
    let _sub = changed.subscribe(move |v| sink.lock().unwrap().push(*v));

    let event = Arc::clone(&changed);
    let mut temperature = Property::with_auto_accessors(
        |internal: &mut i32| *internal,
        move |incoming, internal| {
            *internal = *incoming;
            event.notify(*incoming);
        },
    );

    temperature.set(21);
    temperature.set(23);
    assert_eq!(*received.lock().unwrap(), vec![21, 23]);
}

#[test]
fn throwing_setter_and_getter() {
    let storage = shared(10);
    let write = Arc::clone(&storage);
    let read = Arc::clone(&storage);
    let mut positive = Property::with_accessors(
        move || *read.lock().unwrap(),
        move |v: &mut i32| {
            assert!(*v > 0, "must be positive");
            *write.lock().unwrap() = *v;
        },
    );

    positive.set(5);
    let failed = catch_unwind(AssertUnwindSafe(|| positive.set(-1)));
    assert!(failed.is_err());
    assert_eq!(positive.get(), 5);

    let broken: Property<i32> = Property::with_accessors(|| panic!("unavailable"), |_| {});
    assert!(catch_unwind(AssertUnwindSafe(|| broken.get())).is_err());
}

#[test]
fn accessor_call_counts() {
    let gets = Arc::new(AtomicUsize::new(0));
    let sets = Arc::new(AtomicUsize::new(0));
    let (g, s) = (Arc::clone(&gets), Arc::clone(&sets));
    let mut tracked = Property::with_accessors(
        move || {
            g.fetch_add(1, Ordering::SeqCst);
            7
        },
        move |_: &mut i32| {
            s.fetch_add(1, Ordering::SeqCst);
        },
    );

    for _ in 0..3 {
        let _ = tracked.get();
    }
    tracked.set(1);
    tracked.set(1);
    assert_eq!(gets.load(Ordering::SeqCst), 3);
    assert_eq!(sets.load(Ordering::SeqCst), 2);
}

#[test]
fn comparisons_and_rendering() {
    let a = Property::new(10);
    let b = Property::new(20);
    assert!(a.get() < b.get());
    assert!(a == 10);
    assert!(b != 10);
    assert_eq!(format!("{a}/{b}"), "10/20");
}

#[test]
fn strings_of_every_shape() {
    let mut text = Property::new(String::new());
    for sample in ["", "line\nbreak", "tab\there \"quoted\"", "héllo 世界 🌍"] {
        text.set(sample.to_string());
        assert_eq!(text.get(), sample);
    }
    let long = "x".repeat(10_000);
    text.set(long.clone());
    assert_eq!(text.get().len(), long.len());
}

#[test]
fn extreme_numeric_values() {
    let mut n = Property::new(0_i64);
    for v in [i64::MIN, -1, 0, i64::MAX] {
        n.set(v);
        assert!(n == v);
    }
}

#[test]
fn unbound_reports_error() {
    let mut nothing = Property::<String>::unbound();
    assert_eq!(nothing.try_get(), Err(ReactiveError::UnboundProperty));
    assert!(nothing.try_set("x".into()).is_err());
    assert!(!nothing.is_bound());
}
