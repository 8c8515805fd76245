//! Concurrent access to the boundary cache and the element filter

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use api_boundary::{
    ApiBoundaryConfig, ApiElementFilter, BoundaryCache, BoundaryResolutionPolicy, DeclaredType,
};
use prometheus::Registry;

const THREADS: usize = 16;

#[test]
fn concurrent_callers_trigger_one_computation() {
    let archive = common::module_jar("foo.jar", "org.foo", &["org.foo"], &["org.foo.A"]);
    let policy = BoundaryResolutionPolicy::from_config(&ApiBoundaryConfig::default()).unwrap();
    let cache = Arc::new(BoundaryCache::new(&Registry::new()).unwrap());
    let computations = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let computations = Arc::clone(&computations);
            let barrier = Arc::clone(&barrier);
            let archive = archive.clone();
            let policy = policy.clone();
            thread::spawn(move || {
                barrier.wait();
                let boundary = cache
                    .boundary_for(&archive, || {
                        computations.fetch_add(1, Ordering::SeqCst);
                        // widen the race window
                        thread::sleep(std::time::Duration::from_millis(20));
                        policy.resolve_archive_boundary(&archive)
                    })
                    .unwrap();
                boundary.is_api(&DeclaredType::new("foo.jar", "org.foo.A"))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(computations.load(Ordering::SeqCst), 1);
    assert_eq!(cache.metrics().computations.get(), 1);
    assert_eq!(cache.metrics().misses.get(), 1);
    assert_eq!(cache.metrics().hits.get(), THREADS as u64 - 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn distinct_archives_resolve_independently() {
    let cache = Arc::new(BoundaryCache::new(&Registry::new()).unwrap());
    let policy = BoundaryResolutionPolicy::from_config(&ApiBoundaryConfig::default()).unwrap();
    let archives: Vec<_> = (0..4)
        .map(|i| common::module_jar(&format!("lib-{i}.jar"), "org.lib", &["org.lib"], &[]))
        .collect();
    let barrier = Arc::new(Barrier::new(archives.len() * 2));

    let handles: Vec<_> = archives
        .iter()
        .chain(archives.iter())
        .cloned()
        .map(|archive| {
            let cache = Arc::clone(&cache);
            let policy = policy.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache
                    .boundary_for(&archive, || policy.resolve_archive_boundary(&archive))
                    .map(|boundary| boundary.archive_name().to_string())
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(cache.len(), 4);
    assert_eq!(cache.metrics().computations.get(), 4);
}

#[test]
fn filter_is_shareable_across_threads() {
    let old = common::module_jar("old.jar", "org.foo", &["org.foo"], &["org.foo.A"]);
    let new = common::module_jar("new.jar", "org.foo", &["org.foo"], &["org.foo.A"]);
    let filter = Arc::new(
        ApiElementFilter::new(&ApiBoundaryConfig::default(), [old.clone()], [new.clone()]).unwrap(),
    );
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let filter = Arc::clone(&filter);
            let barrier = Arc::clone(&barrier);
            let archive = if i % 2 == 0 { old.clone() } else { new.clone() };
            thread::spawn(move || {
                barrier.wait();
                let exported = common::class(&archive, "org.foo.A");
                let internal = common::class(&archive, "org.foo.impl.B");
                (
                    filter.applies(exported.as_ref()).unwrap(),
                    filter.applies(internal.as_ref()).unwrap(),
                )
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), (true, false));
    }
    assert_eq!(filter.cache().metrics().computations.get(), 2);
}
