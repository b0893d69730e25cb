use super::{AccountLedger, AccountRecord, MerkleProof};
use crate::{AccountWitness, LedgerError, TransitionParams};

use ark_ff::Zero;
use restaking_crypto::{Fq, HashAccumulator};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// An in-memory account ledger holding the records themselves.
///
/// Only populated nodes are stored. Every other node equals the root of an
/// empty subtree of its height, where an empty slot holds the leaf value zero.
/// This keeps the tree usable at the maximum depth, and lets it hand out the
/// witnesses transitions are verified against.
#[derive(Clone, Debug)]
pub struct AccountTree {
    ledger: AccountLedger,
    records: BTreeMap<u64, AccountRecord>,
    // (height, position) -> node, height 0 holds `H(leaf value)`
    nodes: HashMap<(usize, u64), Fq>,
    empty: Vec<Fq>,
}

impl AccountTree {
    pub fn new(params: &TransitionParams) -> Self {
        let depth = params.depth();
        let mut hasher = HashAccumulator::new();
        let mut empty = Vec::with_capacity(depth + 1);
        empty.push(hasher.hash(&[Fq::zero()]));
        for height in 1..=depth {
            let child = empty[height - 1];
            empty.push(hasher.hash(&[child, child]));
        }
        Self {
            ledger: AccountLedger::new(depth),
            records: BTreeMap::new(),
            nodes: HashMap::new(),
            empty,
        }
    }

    pub fn depth(&self) -> usize {
        self.ledger.depth()
    }

    pub fn ledger(&self) -> &AccountLedger {
        &self.ledger
    }

    pub fn slots(&self) -> u64 {
        1u64 << self.depth()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn root(&self) -> Fq {
        self.node(self.depth(), 0)
    }

    pub fn record(&self, index: u64) -> Option<&AccountRecord> {
        self.records.get(&index)
    }

    pub fn records(&self) -> impl Iterator<Item = &AccountRecord> {
        self.records.values()
    }

    fn node(&self, height: usize, position: u64) -> Fq {
        self.nodes
            .get(&(height, position))
            .copied()
            .unwrap_or(self.empty[height])
    }

    fn check_index(&self, index: u64) -> Result<(), LedgerError> {
        if index >= self.slots() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                slots: self.slots(),
            });
        }
        Ok(())
    }

    /// Writes `record` at its own index, replacing any previous account there
    pub fn insert(&mut self, record: AccountRecord) -> Result<(), LedgerError> {
        self.check_index(record.index)?;
        let mut hasher = HashAccumulator::new();
        let leaf = record.leaf_hash(&mut hasher);

        let mut position = record.index;
        self.nodes.insert((0, position), hasher.hash(&[leaf]));
        for height in 1..=self.depth() {
            position >>= 1;
            let left = self.node(height - 1, position << 1);
            let right = self.node(height - 1, (position << 1) | 1);
            self.nodes.insert((height, position), hasher.hash(&[left, right]));
        }
        self.records.insert(record.index, record);
        debug!(index = record.index, "account written");
        Ok(())
    }

    /// Replaces the balance of an existing account
    pub fn set_balance(&mut self, index: u64, balance: Fq) -> Result<(), LedgerError> {
        let record = self
            .records
            .get(&index)
            .ok_or(LedgerError::UnknownAccount(index))?
            .with_balance(balance);
        self.insert(record)
    }

    /// The inclusion proof of the slot at `index`. Empty slots prove the leaf
    /// value zero.
    pub fn proof(&self, index: u64) -> Result<MerkleProof, LedgerError> {
        self.check_index(index)?;
        let leaf = match self.records.get(&index) {
            Some(record) => record.leaf_hash(&mut HashAccumulator::new()),
            None => Fq::zero(),
        };

        let mut path = Vec::with_capacity(self.depth() + 1);
        path.push(leaf);
        let mut position = index;
        for height in 0..self.depth() {
            path.push(self.node(height, position ^ 1));
            position >>= 1;
        }
        Ok(MerkleProof::new(path, index))
    }

    /// The record of the account at `index` along with its inclusion proof
    pub fn witness(&self, index: u64) -> Result<AccountWitness, LedgerError> {
        let record = *self
            .records
            .get(&index)
            .ok_or(LedgerError::UnknownAccount(index))?;
        Ok(AccountWitness::new(record, self.proof(index)?))
    }
}
