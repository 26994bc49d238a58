//! Replica and primary selection tests

use super::*;
use std::collections::HashMap;

#[test]
fn test_distribution_follows_multiplicity() {
    let heavy = pool("heavy");
    let light = pool("light");
    let medium = pool("medium");
    // heavy x3, medium x2, light x1
    let cluster = cluster_with_replicas(&[&heavy, &light, &heavy, &medium, &heavy, &medium]);

    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..10_000 {
        let replica = cluster.replica().unwrap();
        *counts.entry(replica.name().to_string()).or_default() += 1;
    }

    let per_slot = 10_000 / 6;
    let within = |name: &str, slots: usize| {
        let count = counts[name];
        let expected = per_slot * slots;
        count.abs_diff(expected) <= slots
    };
    assert!(within("heavy", 3), "{counts:?}");
    assert!(within("medium", 2), "{counts:?}");
    assert!(within("light", 1), "{counts:?}");
    assert_eq!(counts.values().sum::<usize>(), 10_000);
}

#[test]
fn test_single_replica_always_selected() {
    let only = pool("only");
    let cluster = cluster_with_replicas(&[&only]);

    for _ in 0..100 {
        assert!(Arc::ptr_eq(&cluster.replica().unwrap(), &only));
    }
}

#[tokio::test]
async fn test_replica_connection_acquires_from_selected_pool() {
    let a = pool("a");
    let b = pool("b");
    let cluster = cluster_with_replicas(&[&a, &b]);

    for _ in 0..10 {
        cluster.replica_connection().await.unwrap().unwrap();
    }

    assert_eq!(a.acquire_count(), 5);
    assert_eq!(b.acquire_count(), 5);
}

#[tokio::test]
async fn test_zero_replicas_is_absent_not_error() {
    let cluster: Cluster<MockPool> = Cluster::new();

    for _ in 0..3 {
        assert!(cluster.replica_connection().await.is_none());
    }
}

#[tokio::test]
async fn test_read_only_cluster_has_no_primary_connection() {
    let a = pool("a");
    let cluster = cluster_with_replicas(&[&a]);

    assert!(cluster.primary_connection().await.is_none());
    assert!(cluster.replica_connection().await.is_some());
}

#[tokio::test]
async fn test_write_only_cluster_has_no_replica_connection() {
    let cluster = Cluster::new();
    cluster.assign_primary(pool("primary")).unwrap();

    assert!(cluster.replica_connection().await.is_none());
    let conn = cluster.primary_connection().await.unwrap().unwrap();
    assert_eq!(conn.pool(), "primary");
}
