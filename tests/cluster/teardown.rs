//! Teardown tests

use super::*;

#[tokio::test]
async fn test_tear_down_primary_and_three_replicas_with_duplicate() {
    let primary = pool("primary");
    let a = pool("a");
    let dup = pool("dup");
    let cluster = cluster_with_replicas(&[&a, &dup, &dup]);
    cluster.assign_primary(Arc::clone(&primary)).unwrap();

    cluster.tear_down();

    assert_eq!(primary.close_count(), 1);
    assert_eq!(a.close_count(), 1);
    assert_eq!(dup.close_count(), 1);
    assert!(cluster.primary_connection().await.is_none());
    assert!(cluster.replica_connection().await.is_none());
}

#[test]
fn test_tear_down_empty_cluster_is_noop() {
    let cluster: Cluster<MockPool> = Cluster::new();

    cluster.tear_down();
    cluster.tear_down();

    assert!(!cluster.has_primary());
    assert_eq!(cluster.replica_count(), 0);
}

#[test]
fn test_tear_down_does_not_touch_previously_retired_pools() {
    let old = pool("old");
    let cluster = cluster_with_replicas(&[&old]);
    let new = pool("new");
    cluster.set_replicas([Arc::clone(&new)]).unwrap();

    cluster.tear_down();

    assert_eq!(old.close_count(), 1);
    assert_eq!(new.close_count(), 1);
}

#[tokio::test]
async fn test_repopulate_after_tear_down() {
    let cluster = Cluster::new();
    cluster.assign_primary(pool("first-primary")).unwrap();
    cluster.add_replica(pool("first-replica")).unwrap();
    cluster.tear_down();

    cluster.assign_primary(pool("second-primary")).unwrap();
    cluster.add_replica(pool("second-replica")).unwrap();

    let write = cluster.primary_connection().await.unwrap().unwrap();
    let read = cluster.replica_connection().await.unwrap().unwrap();
    assert_eq!(write.pool(), "second-primary");
    assert_eq!(read.pool(), "second-replica");
}
