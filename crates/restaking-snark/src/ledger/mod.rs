mod tree;
pub use tree::AccountTree;

use crate::LedgerError;
use restaking_crypto::{Fq, HashAccumulator, PublicKey};

/// A validator account as committed in the ledger
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountRecord {
    pub index: u64,
    pub public_key: PublicKey,
    pub balance: Fq,
}

impl AccountRecord {
    pub fn new(index: u64, public_key: PublicKey, balance: Fq) -> Self {
        Self {
            index,
            public_key,
            balance,
        }
    }

    /// The leaf value `H(index, pk.x, pk.y, balance)`
    pub fn leaf_hash(&self, hasher: &mut HashAccumulator) -> Fq {
        hasher.hash(&[
            Fq::from(self.index),
            self.public_key.x(),
            self.public_key.y(),
            self.balance,
        ])
    }

    /// The same account holding `balance` instead
    pub fn with_balance(&self, balance: Fq) -> Self {
        Self { balance, ..*self }
    }
}

/// An inclusion proof. `path[0]` is the leaf value and `path[i]` the sibling
/// at level `i`. Bit `i - 1` of `path_helper` is set when that sibling is the
/// left child.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleProof {
    pub path: Vec<Fq>,
    pub path_helper: u64,
}

impl MerkleProof {
    pub fn new(path: Vec<Fq>, path_helper: u64) -> Self {
        Self { path, path_helper }
    }

    /// The leaf value the proof starts from
    pub fn leaf(&self) -> Option<&Fq> {
        self.path.first()
    }
}

/// Verifies and updates membership of leaves in a binary Poseidon tree of a
/// fixed depth. Nodes are `H(left, right)` and a leaf value `v` enters the tree
/// as the node `H(v)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountLedger {
    depth: usize,
}

impl AccountLedger {
    pub fn new(depth: usize) -> Self {
        Self { depth }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    fn check_shape(&self, proof: &MerkleProof) -> Result<(), LedgerError> {
        if proof.path.len() != self.depth + 1 {
            return Err(LedgerError::MalformedProof {
                expected: self.depth + 1,
                got: proof.path.len(),
            });
        }
        if proof.path_helper >> self.depth != 0 {
            return Err(LedgerError::HelperOutOfRange {
                helper: proof.path_helper,
                depth: self.depth,
            });
        }
        Ok(())
    }

    /// Recomputes the root obtained by placing `leaf` at the position described
    /// by `proof`, using the proof's siblings. `path[0]` is ignored.
    pub fn compute_root(
        &self,
        hasher: &mut HashAccumulator,
        proof: &MerkleProof,
        leaf: Fq,
    ) -> Result<Fq, LedgerError> {
        self.check_shape(proof)?;

        let mut sum = hasher.hash(&[leaf]);
        for (level, sibling) in proof.path[1..].iter().enumerate() {
            sum = if (proof.path_helper >> level) & 1 == 1 {
                hasher.hash(&[*sibling, sum])
            } else {
                hasher.hash(&[sum, *sibling])
            };
        }
        Ok(sum)
    }

    /// Checks that the proof authenticates its own leaf under `root`.
    /// Malformed proofs never verify.
    pub fn verify_inclusion(
        &self,
        hasher: &mut HashAccumulator,
        root: &Fq,
        proof: &MerkleProof,
    ) -> bool {
        match proof.leaf() {
            Some(leaf) => self
                .compute_root(hasher, proof, *leaf)
                .map_or(false, |computed| &computed == root),
            None => false,
        }
    }

    /// The root after replacing the proven leaf with `new_leaf`. Only the
    /// shape of the proof is checked here; callers verify inclusion first.
    pub fn apply_update(
        &self,
        hasher: &mut HashAccumulator,
        proof: &MerkleProof,
        new_leaf: Fq,
    ) -> Result<Fq, LedgerError> {
        self.compute_root(hasher, proof, new_leaf)
    }
}
