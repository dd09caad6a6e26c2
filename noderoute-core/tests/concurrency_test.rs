//! Concurrent use of one `NodeSelector` from many threads.

use std::sync::Arc;
use std::thread;

use noderoute_core::{NodeSelector, ServerNode, SharedTopology, Topology};

fn topology(version: u64, len: usize) -> SharedTopology {
    Arc::new(Topology::from_nodes(
        version,
        (0..len).map(|i| ServerNode::new(format!("http://node-{i}:8080"), "orders")),
    ))
}

#[test]
fn concurrent_failures_are_not_lost() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 1_000;

    let selector = NodeSelector::new(topology(1, 3)).unwrap();

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..PER_THREAD {
                    selector.on_failed_request(1);
                }
            });
        }
    });

    assert_eq!(selector.failures(), vec![0, (THREADS * PER_THREAD) as u64, 0]);
    assert_eq!(selector.preferred_node().index, 0);
}

/// Node count of the generation published at `version`.
fn generation_len(version: u64) -> usize {
    if version % 2 == 0 {
        5
    } else {
        2
    }
}

/// Nodes named after their generation, so a node can be traced back to it.
fn generation(version: u64) -> SharedTopology {
    let len = generation_len(version);
    Arc::new(Topology::from_nodes(
        version,
        (0..len).map(|i| ServerNode::new(format!("http://node-{version}-{i}:8080"), "orders")),
    ))
}

fn parse_node_url(url: &str) -> (u64, usize) {
    let host = url
        .strip_prefix("http://node-")
        .and_then(|rest| rest.strip_suffix(":8080"))
        .unwrap();
    let (version, index) = host.split_once('-').unwrap();
    (version.parse().unwrap(), index.parse().unwrap())
}

#[test]
fn readers_never_see_a_torn_generation() {
    let selector = NodeSelector::new(generation(1)).unwrap();

    thread::scope(|scope| {
        scope.spawn(|| {
            for version in 2..200 {
                selector
                    .on_update_topology(Some(generation(version)), false)
                    .unwrap();
            }
        });

        for _ in 0..4 {
            scope.spawn(|| {
                let mut last_version = 1;
                for session_id in 0..2_000u64 {
                    let selected = selector.node_by_session_id(session_id);
                    let (version, index) = parse_node_url(&selected.node.url);

                    assert_eq!(index, selected.index);
                    assert!(selected.index < generation_len(version));
                    assert_eq!(
                        selected.index,
                        (session_id % generation_len(version) as u64) as usize
                    );
                    assert!(version >= last_version);
                    last_version = version;
                }
            });
        }
    });

    let topology = selector.topology();
    assert_eq!(topology.version, 199);
    let (version, _) = parse_node_url(&selector.preferred_node().node.url);
    assert_eq!(version, topology.version);
}

#[tokio::test]
async fn topology_swaps_race_with_failure_reports() {
    let selector = Arc::new(NodeSelector::new(topology(1, 4)).unwrap());

    let updater = {
        let selector = Arc::clone(&selector);
        tokio::task::spawn_blocking(move || {
            (2..50)
                .filter(|&version| {
                    let next = topology(version, 1 + version as usize % 4);
                    selector.on_update_topology(Some(next), false).unwrap()
                })
                .count()
        })
    };

    let reporters: Vec<_> = (0..4)
        .map(|worker| {
            let selector = Arc::clone(&selector);
            tokio::task::spawn_blocking(move || {
                for _ in 0..500 {
                    let selected = selector.preferred_node();
                    selector.on_failed_request(selected.index + worker);
                    selector.restore_node_index(0);
                }
            })
        })
        .collect();

    assert_eq!(updater.await.unwrap(), 48);
    for reporter in reporters {
        reporter.await.unwrap();
    }

    assert_eq!(selector.topology().version, 49);
    assert_eq!(selector.failures().len(), selector.node_count());
}
