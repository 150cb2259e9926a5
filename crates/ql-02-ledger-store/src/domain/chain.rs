//! # Block-Structure Integrity
//!
//! A format check for chains of blocks: index continuity, hash continuity
//! and recomputed-hash match. It is not a consensus path; quorum validation
//! is the only way entries reach a ledger.

use serde::{Deserialize, Serialize};
use shared_crypto::sha256_hex;
use shared_types::Transaction;
use thiserror::Error;

/// `previous_hash` of the first block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub index: u64,
    pub timestamp: u64,
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
    pub hash: String,
}

impl Block {
    /// First block of a chain.
    pub fn genesis(transactions: Vec<Transaction>, timestamp: u64) -> Self {
        Self::sealed(0, timestamp, transactions, GENESIS_PREVIOUS_HASH.to_string())
    }

    /// A block linked after `self`.
    pub fn next(&self, transactions: Vec<Transaction>, timestamp: u64) -> Self {
        Self::sealed(self.index + 1, timestamp, transactions, self.hash.clone())
    }

    fn sealed(index: u64, timestamp: u64, transactions: Vec<Transaction>, previous_hash: String) -> Self {
        let mut block = Self {
            index,
            timestamp,
            transactions,
            previous_hash,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// SHA-256 over index, timestamp, previous hash and the JSON encoding of
    /// the transactions.
    pub fn compute_hash(&self) -> String {
        let body = serde_json::to_string(&self.transactions).unwrap_or_default();
        sha256_hex(&[
            &self.index.to_string(),
            &self.timestamp.to_string(),
            &self.previous_hash,
            &body,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("chain is empty")]
    Empty,

    #[error("block {position} has index {found}, expected {expected}")]
    IndexGap {
        position: usize,
        expected: u64,
        found: u64,
    },

    #[error("block {index} does not link to its predecessor")]
    BrokenLink { index: u64 },

    #[error("block {index} hash does not match its contents")]
    HashMismatch { index: u64 },
}

/// Check that `blocks` form a well-formed chain starting at index 0.
pub fn is_valid_chain(blocks: &[Block]) -> Result<(), ChainError> {
    let first = blocks.first().ok_or(ChainError::Empty)?;
    if first.index != 0 {
        return Err(ChainError::IndexGap {
            position: 0,
            expected: 0,
            found: first.index,
        });
    }

    for (position, block) in blocks.iter().enumerate() {
        if block.hash != block.compute_hash() {
            return Err(ChainError::HashMismatch { index: block.index });
        }
        if position == 0 {
            continue;
        }
        let previous = &blocks[position - 1];
        if block.index != previous.index + 1 {
            return Err(ChainError::IndexGap {
                position,
                expected: previous.index + 1,
                found: block.index,
            });
        }
        if block.previous_hash != previous.hash {
            return Err(ChainError::BrokenLink { index: block.index });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Address;

    fn tx(amount: u64) -> Transaction {
        Transaction {
            from: Address::genesis(),
            to: Address::genesis(),
            amount: Some(amount),
            timestamp: amount,
            witness_one: None,
            witness_two: None,
            partner_one: None,
            partner_two: None,
            id: Some(format!("t{amount}")),
            signature: None,
            hash: None,
            local: false,
        }
    }

    fn chain() -> Vec<Block> {
        let genesis = Block::genesis(vec![tx(1)], 100);
        let second = genesis.next(vec![tx(2)], 200);
        let third = second.next(vec![tx(3), tx(4)], 300);
        vec![genesis, second, third]
    }

    #[test]
    fn test_well_formed_chain_is_valid() {
        assert_eq!(is_valid_chain(&chain()), Ok(()));
    }

    #[test]
    fn test_empty_chain_is_invalid() {
        assert_eq!(is_valid_chain(&[]), Err(ChainError::Empty));
    }

    #[test]
    fn test_tampered_contents_detected() {
        let mut blocks = chain();
        blocks[1].transactions[0].amount = Some(999);
        assert_eq!(
            is_valid_chain(&blocks),
            Err(ChainError::HashMismatch { index: 1 })
        );
    }

    #[test]
    fn test_index_gap_detected() {
        let mut blocks = chain();
        blocks.remove(1);
        let err = is_valid_chain(&blocks).unwrap_err();
        assert!(matches!(
            err,
            ChainError::IndexGap { position: 1, expected: 1, found: 2 }
        ));
    }

    #[test]
    fn test_broken_link_detected() {
        let mut blocks = chain();
        blocks[2].previous_hash = "ff".into();
        blocks[2].hash = blocks[2].compute_hash();
        assert_eq!(
            is_valid_chain(&blocks),
            Err(ChainError::BrokenLink { index: 2 })
        );
    }
}
