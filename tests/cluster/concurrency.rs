//! Concurrent selection and replacement tests

use super::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[test]
fn test_concurrent_selection_is_exactly_balanced() {
    let replicas: Vec<_> = (0..4).map(|i| pool(format!("r{i}"))).collect();
    let refs: Vec<_> = replicas.iter().collect();
    let cluster = cluster_with_replicas(&refs);

    let mut totals: HashMap<String, usize> = HashMap::new();
    thread::scope(|s| {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    let mut counts: HashMap<String, usize> = HashMap::new();
                    for _ in 0..1_000 {
                        let replica = cluster.replica().unwrap();
                        *counts.entry(replica.name().to_string()).or_default() += 1;
                    }
                    counts
                })
            })
            .collect();

        for worker in workers {
            for (name, count) in worker.join().unwrap() {
                *totals.entry(name).or_default() += count;
            }
        }
    });

    // 8000 distinct tickets spread over 4 slots
    assert_eq!(totals.len(), 4);
    assert!(totals.values().all(|&count| count == 2_000), "{totals:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_acquires_each_get_a_distinct_ticket() {
    let replicas: Vec<_> = (0..4).map(|i| pool(format!("r{i}"))).collect();
    let refs: Vec<_> = replicas.iter().collect();
    let cluster = Arc::new(cluster_with_replicas(&refs));

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let cluster = Arc::clone(&cluster);
        tasks.push(tokio::spawn(async move {
            for _ in 0..1_000 {
                cluster.replica_connection().await.unwrap().unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    for replica in &replicas {
        assert_eq!(replica.acquire_count(), 2_000, "{}", replica.name());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_selection_during_set_replicas_never_goes_out_of_range() {
    let cluster = Arc::new(Cluster::new());
    cluster
        .set_replicas([pool("gen0-a"), pool("gen0-b"), pool("gen0-c")])
        .unwrap();
    let done = Arc::new(AtomicBool::new(false));

    let mut readers = Vec::new();
    for _ in 0..4 {
        let cluster = Arc::clone(&cluster);
        let done = Arc::clone(&done);
        readers.push(tokio::spawn(async move {
            let mut selections = 0usize;
            while !done.load(Ordering::Acquire) {
                // A pool closed mid-race may refuse the acquire; that is allowed.
                let _ = cluster
                    .replica_connection()
                    .await
                    .expect("replica set is never empty");
                selections += 1;
                tokio::task::yield_now().await;
            }
            selections
        }));
    }

    let mut generations = Vec::new();
    for generation in 1..=50 {
        // Alternate between growing and shrinking the set
        let size = if generation % 2 == 0 { 1 } else { 5 };
        let next: Vec<_> = (0..size)
            .map(|i| pool(format!("gen{generation}-{i}")))
            .collect();
        cluster.set_replicas(next.iter().cloned()).unwrap();
        generations.push(next);
        tokio::task::yield_now().await;
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        reader.await.unwrap();
    }

    let (current, retired) = generations.split_last().unwrap();
    for pool in retired.iter().flatten() {
        assert_eq!(pool.close_count(), 1, "{}", pool.name());
    }
    for pool in current {
        assert_eq!(pool.close_count(), 0, "{}", pool.name());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_primary_connection_during_replace_primary() {
    let cluster = Arc::new(Cluster::new());
    cluster.assign_primary(pool("primary-0")).unwrap();
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let cluster = Arc::clone(&cluster);
        let done = Arc::clone(&done);
        tokio::spawn(async move {
            while !done.load(Ordering::Acquire) {
                assert!(cluster.primary_connection().await.is_some());
                tokio::task::yield_now().await;
            }
        })
    };

    let mut primaries = Vec::new();
    for i in 1..=20 {
        let next = pool(format!("primary-{i}"));
        cluster.replace_primary(Arc::clone(&next)).unwrap();
        primaries.push(next);
        tokio::task::yield_now().await;
    }
    done.store(true, Ordering::Release);
    reader.await.unwrap();

    let (current, displaced) = primaries.split_last().unwrap();
    assert!(displaced.iter().all(|p| p.close_count() == 1));
    assert_eq!(current.close_count(), 0);
}
