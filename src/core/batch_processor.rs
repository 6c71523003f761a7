//! Batch processing with key-conflict partitioning
//!
//! This module provides the `BatchProcessor` struct, which runs a batch of
//! invocations concurrently while keeping every pair of invocations that may
//! touch the same state key in their original relative order.
//!
//! # Design
//!
//! Each invocation's key set is derived from its function and arguments
//! (`Invocation::touched_keys`). Invocations whose key sets overlap, directly
//! or through a chain of others, land in the same group. Groups are disjoint
//! in the keys they touch, so they can run on separate tokio tasks against one
//! `SharedState` without interleaving conflicting reads and writes.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── SharedState       (cloneable handle over the concurrent store)
//!     └── ChaincodeConfig   (init mode and surface of every dispatcher)
//! ```

use std::collections::HashSet;

use crate::core::chaincode::{Chaincode, ChaincodeConfig};
use crate::state::SharedState;
use crate::types::{Invocation, LedgerError};
use tracing::{debug, error};

/// Result of dispatching a single invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    /// The invocation that was dispatched
    pub invocation: Invocation,

    /// Response body or the error the dispatcher reported
    pub result: Result<Vec<u8>, LedgerError>,
}

/// Invocations that must run in order, plus the union of their keys
#[derive(Debug, Default)]
struct Group {
    keys: HashSet<String>,
    invocations: Vec<Invocation>,
}

#[derive(Debug, Clone)]
pub struct BatchProcessor {
    state: SharedState,
    config: ChaincodeConfig,
}

impl BatchProcessor {
    pub fn new(state: SharedState, config: ChaincodeConfig) -> Self {
        Self { state, config }
    }

    /// Split a batch into groups with pairwise disjoint key sets
    ///
    /// Within a group, invocations keep their batch order; groups are ordered
    /// by their first invocation. An invocation that touches no key forms a
    /// group of its own.
    pub fn partition_by_keys(&self, batch: Vec<Invocation>) -> Vec<Vec<Invocation>> {
        let mut groups: Vec<Group> = Vec::new();

        for invocation in batch {
            let keys: HashSet<String> = invocation
                .touched_keys(self.config.init_mode)
                .into_iter()
                .collect();

            let mut merged = Group::default();
            let mut remaining = Vec::with_capacity(groups.len());
            for group in groups {
                if keys.is_disjoint(&group.keys) {
                    remaining.push(group);
                } else {
                    merged.keys.extend(group.keys);
                    merged.invocations.extend(group.invocations);
                }
            }

            // merged groups were disjoint, restore batch order across them
            merged.invocations.sort_by_key(|inv| inv.seq);
            merged.keys.extend(keys);
            merged.invocations.push(invocation);

            remaining.push(merged);
            groups = remaining;
        }

        groups.sort_by_key(|group| group.invocations.first().map(|inv| inv.seq));
        groups.into_iter().map(|group| group.invocations).collect()
    }

    /// Dispatch one group's invocations sequentially
    pub async fn process_group(&self, invocations: Vec<Invocation>) -> Vec<ProcessingResult> {
        let mut chaincode = Chaincode::new(self.state.clone(), self.config);
        let mut results = Vec::with_capacity(invocations.len());

        for invocation in invocations {
            let result = chaincode.dispatch(&invocation);
            results.push(ProcessingResult { invocation, result });
        }

        results
    }

    /// Process a batch with conflict-free parallelism
    ///
    /// # Returns
    ///
    /// One result per invocation, ordered by sequence number.
    pub async fn process_batch(&self, batch: Vec<Invocation>) -> Vec<ProcessingResult> {
        let groups = self.partition_by_keys(batch);
        debug!(groups = groups.len(), "partitioned batch");

        let mut tasks = Vec::with_capacity(groups.len());
        for invocations in groups {
            let processor = self.clone();
            let task = tokio::spawn(async move { processor.process_group(invocations).await });
            tasks.push(task);
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(group_results) => results.extend(group_results),
                Err(e) => {
                    error!(error = ?e, "invocation group task panicked");
                }
            }
        }

        results.sort_by_key(|r| r.invocation.seq);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::read_account;
    use crate::types::InitMode;
    use rust_decimal::Decimal;

    fn inv(seq: u64, function: &str, args: &[&str]) -> Invocation {
        Invocation::new(seq, function, args.iter().map(|a| a.to_string()).collect())
    }

    fn processor() -> BatchProcessor {
        BatchProcessor::new(SharedState::new(), ChaincodeConfig::default())
    }

    fn seqs(group: &[Invocation]) -> Vec<u64> {
        group.iter().map(|inv| inv.seq).collect()
    }

    #[test]
    fn test_partition_empty_batch() {
        assert!(processor().partition_by_keys(vec![]).is_empty());
    }

    #[test]
    fn test_partition_separates_unrelated_accounts() {
        let groups = processor().partition_by_keys(vec![
            inv(1, "createAccount", &["alice", "NGO", "1"]),
            inv(2, "createAccount", &["bob", "NGO", "1"]),
            inv(3, "GetCompany", &["alice"]),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(seqs(&groups[0]), vec![1, 3]);
        assert_eq!(seqs(&groups[1]), vec![2]);
    }

    #[test]
    fn test_partition_merges_through_transfers() {
        let groups = processor().partition_by_keys(vec![
            inv(1, "createAccount", &["alice", "NGO", "1"]),
            inv(2, "createAccount", &["bob", "NGO", "1"]),
            inv(3, "createAccount", &["carol", "NGO", "1"]),
            inv(4, "transaction", &["alice", "bob", "1"]),
            inv(5, "transaction", &["bob", "carol", "1"]),
        ]);

        assert_eq!(groups.len(), 1);
        assert_eq!(seqs(&groups[0]), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_partition_isolates_keyless_invocations() {
        let groups = processor().partition_by_keys(vec![
            inv(1, "mint", &["alice"]),
            inv(2, "mint", &["alice"]),
        ]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_partition_uses_init_mode() {
        let processor = BatchProcessor::new(
            SharedState::new(),
            ChaincodeConfig {
                init_mode: InitMode::Classic,
                ..Default::default()
            },
        );
        let groups = processor.partition_by_keys(vec![
            inv(1, "init", &["a", "1", "b", "2"]),
            inv(2, "query", &["b"]),
            inv(3, "query", &["c"]),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(seqs(&groups[0]), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_process_batch_returns_results_in_sequence_order() {
        let state = SharedState::new();
        let processor = BatchProcessor::new(state.clone(), ChaincodeConfig::default());

        let results = processor
            .process_batch(vec![
                inv(1, "createAccount", &["alice", "CORPORATE", "1000.0"]),
                inv(2, "createAccount", &["dave", "VENDOR", "5"]),
                inv(3, "createAccount", &["bob", "NGO", "500.0"]),
                inv(4, "transaction", &["alice", "bob", "300.0"]),
                inv(5, "transaction", &["alice", "bob", "10000.0"]),
            ])
            .await;

        let order: Vec<u64> = results.iter().map(|r| r.invocation.seq).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5]);
        assert!(results[3].result.is_ok());
        assert!(matches!(
            results[4].result,
            Err(LedgerError::InsufficientFunds { .. })
        ));

        assert_eq!(
            read_account(&state, "alice").unwrap().cash_balance,
            Decimal::new(700, 0)
        );
        assert_eq!(
            read_account(&state, "bob").unwrap().cash_balance,
            Decimal::new(800, 0)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_groups_share_state() {
        let state = SharedState::new();
        let processor = BatchProcessor::new(state.clone(), ChaincodeConfig::default());

        let batch = (1..=50)
            .map(|n| inv(n, "createAccount", &[format!("user{n}").as_str(), "NGO", "10"]))
            .collect();
        let results = processor.process_batch(batch).await;

        assert_eq!(results.len(), 50);
        assert!(results.iter().all(|r| r.result.is_ok()));
        assert_eq!(state.len(), 50);
    }

    #[tokio::test]
    async fn test_process_batches_sequentially_see_earlier_writes() {
        let processor = processor();

        processor
            .process_batch(vec![inv(1, "createAccounts", &["2"])])
            .await;
        let results = processor
            .process_batch(vec![inv(2, "transaction", &["company1", "company2", "1"])])
            .await;

        assert_eq!(results[0].result, Ok(Vec::new()));
    }
}
