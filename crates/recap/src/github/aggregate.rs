//! Fan-out/join aggregation with per-branch failure isolation.
//!
//! Launches one concurrent operation per key, tracks each branch's status
//! independently, and joins once every branch is terminal. A failed branch
//! is dropped from the result; it never fails the aggregation.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::mpsc;

/// State of one aggregation branch. Transitions are monotonic: `Pending`
/// moves to exactly one terminal state and is never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BranchStatus {
    Pending,
    Success,
    Failure,
}

/// Run one async operation per key concurrently and join the results.
///
/// Every key's operation is spawned before any completion is observed (true
/// concurrent fan-out). Successful branches append their records to the
/// accumulator in completion order; submission order does not constrain the
/// result, and callers must not rely on it. Failed branches are logged and
/// contribute nothing; an aggregation whose branches all fail still resolves,
/// with an empty result. The join resolves exactly once, after the last
/// branch reaches a terminal status, and an empty key set resolves
/// immediately.
///
/// Duplicate keys share one status entry (the last transition wins), so the
/// join can resolve before every duplicate branch finishes. Keys are
/// expected to be unique within one invocation.
pub async fn fan_out_join<T, E, F, Fut>(keys: Vec<String>, op: F) -> Vec<T>
where
    T: Send + 'static,
    E: std::fmt::Display + Send + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>> + Send + 'static,
{
    if keys.is_empty() {
        return Vec::new();
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut statuses: HashMap<String, BranchStatus> = HashMap::with_capacity(keys.len());

    for key in keys {
        statuses.insert(key.clone(), BranchStatus::Pending);
        let branch = op(key.clone());
        let tx = tx.clone();
        tokio::spawn(async move {
            // The receiver only goes away once the join has resolved.
            let _ = tx.send((key, branch.await));
        });
    }
    drop(tx);

    let mut records = Vec::new();
    while let Some((key, outcome)) = rx.recv().await {
        match outcome {
            Ok(items) => {
                records.extend(items);
                statuses.insert(key, BranchStatus::Success);
            }
            Err(error) => {
                tracing::warn!(%key, %error, "aggregation branch failed");
                statuses.insert(key, BranchStatus::Failure);
            }
        }

        // Join check: re-scan the whole table after each transition and
        // resolve once nothing is pending. Quadratic over branches, which
        // is fine at tens of keys.
        if statuses
            .values()
            .all(|status| *status != BranchStatus::Pending)
        {
            break;
        }
    }

    records
}
