use crate::{Bool, FqVar, HashAccumulatorVar};

use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};
use restaking_crypto::Fq;

/// A Merkle path whose first entry is the leaf value itself, followed by one
/// sibling per level, together with the direction bits (lowest level first).
/// A set direction bit places the sibling on the left.
#[derive(Clone)]
pub struct MerkleProofVar {
    pub path: Vec<FqVar>,
    pub helper: Vec<Bool>,
}

impl MerkleProofVar {
    /// Allocates `path` and the `depth` bits of `path_helper` as witnesses.
    /// Paths of the wrong length and helpers wider than `depth` bits can never
    /// authenticate a leaf and are rejected as unsatisfiable.
    pub fn new_witness(
        cs: ConstraintSystemRef<Fq>,
        path: &[Fq],
        path_helper: u64,
        depth: usize,
    ) -> Result<Self, SynthesisError> {
        if path.len() != depth + 1 || path_helper >> depth != 0 {
            return Err(SynthesisError::Unsatisfiable);
        }
        let path = path
            .iter()
            .map(|node| FqVar::new_witness(cs.clone(), || Ok(*node)))
            .collect::<Result<Vec<_>, _>>()?;
        let helper = crate::utils::u64_to_bits_le(path_helper, depth)
            .into_iter()
            .map(|bit| Bool::new_witness(cs.clone(), || Ok(bit)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { path, helper })
    }

    /// The leaf value the path starts from
    pub fn leaf(&self) -> &FqVar {
        &self.path[0]
    }

    /// Recomputes the root from `leaf` through the siblings of this path
    #[tracing::instrument(target = "r1cs", skip(self, hasher, leaf))]
    pub fn compute_root(
        &self,
        hasher: &mut HashAccumulatorVar,
        leaf: &FqVar,
    ) -> Result<FqVar, SynthesisError> {
        let mut sum = hasher.hash(&[leaf.clone()])?;
        for (sibling, bit) in self.path[1..].iter().zip(&self.helper) {
            let left = bit.select(sibling, &sum)?;
            let right = bit.select(&sum, sibling)?;
            sum = hasher.hash(&[left, right])?;
        }
        Ok(sum)
    }

    /// Enforces that the path authenticates its own leaf under `root`
    pub fn verify(
        &self,
        hasher: &mut HashAccumulatorVar,
        root: &FqVar,
    ) -> Result<(), SynthesisError> {
        self.conditional_verify(hasher, root, &Bool::TRUE)
    }

    /// Same as [`verify`](Self::verify), enforced only when `should_enforce`
    /// is set
    pub fn conditional_verify(
        &self,
        hasher: &mut HashAccumulatorVar,
        root: &FqVar,
        should_enforce: &Bool,
    ) -> Result<(), SynthesisError> {
        self.compute_root(hasher, self.leaf())?
            .conditional_enforce_equal(root, should_enforce)
    }
}
