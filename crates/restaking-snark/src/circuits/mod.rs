//! Constraint systems over the BN254 scalar field mirroring the native
//! transitions check for check. A witness that passes the native verifier
//! satisfies the corresponding circuit and vice versa.

mod aggregation;
pub use aggregation::AggregationCircuit;

mod attested_slashing;
pub use attested_slashing::AttestedSlashingCircuit;

mod slashing;
pub use slashing::SlashingCircuit;

use crate::{AccountRecord, AccountWitness, MerkleProof};

use ark_ec::AffineRepr;
use ark_ff::{Field, Zero};
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};
use restaking_crypto::{Fq, Fr, Point, PublicKey, Signature};
use restaking_gadgets::{
    alloc_point, Bool, EddsaVerifyGadget, FqVar, HashAccumulatorVar, MerkleProofVar, PointVar,
    SignatureVar,
};

/// An allocated ledger account
pub(crate) struct AccountVar {
    pub index: FqVar,
    pub public_key: PointVar,
    pub balance: FqVar,
    pub proof: MerkleProofVar,
}

impl AccountVar {
    /// Allocates the account as witnesses, except for the index which uses
    /// `index_mode`
    pub fn new(
        cs: ConstraintSystemRef<Fq>,
        account: &AccountWitness,
        depth: usize,
        index_mode: AllocationMode,
    ) -> Result<Self, SynthesisError> {
        let record = &account.record;
        let index = FqVar::new_variable(cs.clone(), || Ok(Fq::from(record.index)), index_mode)?;
        let public_key = alloc_point(
            cs.clone(),
            || Ok(*record.public_key.as_ref()),
            AllocationMode::Witness,
        )?;
        let balance = FqVar::new_witness(cs.clone(), || Ok(record.balance))?;
        let proof =
            MerkleProofVar::new_witness(cs, &account.proof.path, account.proof.path_helper, depth)?;
        Ok(Self {
            index,
            public_key,
            balance,
            proof,
        })
    }

    /// `H(index, pk.x, pk.y, balance)`
    pub fn leaf(
        &self,
        hasher: &mut HashAccumulatorVar,
        balance: &FqVar,
    ) -> Result<FqVar, SynthesisError> {
        hasher.hash(&[
            self.index.clone(),
            self.public_key.x.clone(),
            self.public_key.y.clone(),
            balance.clone(),
        ])
    }

    /// Enforces that the account hashes to the proof's leaf and that the
    /// proof authenticates it under `root`
    pub fn enforce_included(
        &self,
        hasher: &mut HashAccumulatorVar,
        root: &FqVar,
    ) -> Result<(), SynthesisError> {
        self.conditional_enforce_included(hasher, root, &Bool::TRUE)
    }

    #[tracing::instrument(target = "r1cs", skip_all)]
    pub fn conditional_enforce_included(
        &self,
        hasher: &mut HashAccumulatorVar,
        root: &FqVar,
        should_enforce: &Bool,
    ) -> Result<(), SynthesisError> {
        self.leaf(hasher, &self.balance)?
            .conditional_enforce_equal(self.proof.leaf(), should_enforce)?;
        self.proof.conditional_verify(hasher, root, should_enforce)
    }

    /// The root after rewriting the account's leaf with `balance`
    pub fn updated_root(
        &self,
        hasher: &mut HashAccumulatorVar,
        balance: &FqVar,
    ) -> Result<FqVar, SynthesisError> {
        let leaf = self.leaf(hasher, balance)?;
        self.proof.compute_root(hasher, &leaf)
    }
}

/// A signed block hash. Accounts without one cannot be assigned.
pub(crate) struct AttestationVar {
    pub signature: SignatureVar,
    pub block_hash: FqVar,
}

impl AttestationVar {
    pub fn new_witness(
        cs: ConstraintSystemRef<Fq>,
        account: &AccountWitness,
    ) -> Result<Self, SynthesisError> {
        let signature = SignatureVar::new_witness(cs.clone(), || {
            account.signature.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let block_hash = FqVar::new_witness(cs, || {
            account.block_hash.ok_or(SynthesisError::AssignmentMissing)
        })?;
        Ok(Self {
            signature,
            block_hash,
        })
    }
}

/// Enforces a valid signature of `account` over `H(index, request, block_hash)`
/// when `should_enforce` is set
pub(crate) fn enforce_attestation(
    hasher: &mut HashAccumulatorVar,
    account: &AccountVar,
    signature: &SignatureVar,
    request: &FqVar,
    block_hash: &FqVar,
    should_enforce: &Bool,
) -> Result<(), SynthesisError> {
    let message = hasher.hash(&[account.index.clone(), request.clone(), block_hash.clone()])?;
    EddsaVerifyGadget::conditional_verify(
        hasher,
        &account.public_key,
        &message,
        signature,
        should_enforce,
    )
}

/// Enforces pairwise distinct values among the enabled entries.
///
/// For every pair the prover supplies `inv` with `(a - b) * inv == a_on & b_on`,
/// which has a solution exactly when one side is disabled or `a != b`.
pub(crate) fn enforce_distinct(
    cs: ConstraintSystemRef<Fq>,
    entries: &[(Bool, FqVar)],
) -> Result<(), SynthesisError> {
    for (i, (a_on, a)) in entries.iter().enumerate() {
        for (b_on, b) in &entries[i + 1..] {
            let both = a_on.and(b_on)?;
            let diff = a - b;
            let inv = FqVar::new_witness(cs.clone(), || {
                let inv = diff.value()?.inverse().unwrap_or_else(Fq::zero);
                Ok(if both.value()? { inv } else { Fq::zero() })
            })?;
            diff.mul_equals(&inv, &FqVar::from(both))?;
        }
    }
    Ok(())
}

/// Pads `entries` to `width` with `placeholder`, pairing each slot with
/// whether it holds a real entry
pub(crate) fn pad_batch<'a>(
    entries: &'a [AccountWitness],
    placeholder: &'a AccountWitness,
    width: usize,
) -> impl Iterator<Item = (bool, &'a AccountWitness)> {
    (0..width).map(move |position| match entries.get(position) {
        Some(entry) => (true, entry),
        None => (false, placeholder),
    })
}

/// A placeholder account of the right shape. It fills the unused slots of a
/// batch and sizes circuits when no assignment is available.
pub(crate) fn empty_account(depth: usize) -> AccountWitness {
    let record = AccountRecord::new(0, PublicKey::from(Point::zero()), Fq::zero());
    AccountWitness::new(record, MerkleProof::new(vec![Fq::zero(); depth + 1], 0))
        .with_attestation(Signature::new(Point::zero(), Fr::zero()), Fq::zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_helpers::Scenario, AccountLedger};
    use ark_relations::r1cs::ConstraintSystem;
    use restaking_crypto::HashAccumulator;

    #[test]
    fn account_var_matches_native() {
        let scenario = Scenario::new(3, 1);
        let account = scenario.tree.witness(6).unwrap();
        let new_balance = Fq::from(7u64);

        let mut hasher = HashAccumulator::new();
        let new_leaf = account.record.with_balance(new_balance).leaf_hash(&mut hasher);
        let expected = AccountLedger::new(3)
            .apply_update(&mut hasher, &account.proof, new_leaf)
            .unwrap();

        let cs = ConstraintSystem::<Fq>::new_ref();
        let var = AccountVar::new(cs.clone(), &account, 3, AllocationMode::Witness).unwrap();
        let root = FqVar::new_input(cs.clone(), || Ok(scenario.tree.root())).unwrap();
        let mut hasher = HashAccumulatorVar::new(cs.clone());
        var.enforce_included(&mut hasher, &root).unwrap();
        let balance = FqVar::constant(new_balance);
        let updated = var.updated_root(&mut hasher, &balance).unwrap();

        assert_eq!(updated.value().unwrap(), expected);
        assert!(cs.is_satisfied().unwrap());
    }

    fn entries(cs: &ConstraintSystemRef<Fq>, values: &[(bool, u64)]) -> Vec<(Bool, FqVar)> {
        values
            .iter()
            .map(|(on, v)| {
                let on = Bool::new_witness(cs.clone(), || Ok(*on)).unwrap();
                let v = FqVar::new_witness(cs.clone(), || Ok(Fq::from(*v))).unwrap();
                (on, v)
            })
            .collect()
    }

    #[test]
    fn distinct_values() {
        let cs = ConstraintSystem::<Fq>::new_ref();
        let values = entries(&cs, &[(true, 1), (true, 2), (true, 3)]);
        enforce_distinct(cs.clone(), &values).unwrap();
        assert!(cs.is_satisfied().unwrap());

        let cs = ConstraintSystem::<Fq>::new_ref();
        let values = entries(&cs, &[(true, 1), (true, 2), (true, 1)]);
        enforce_distinct(cs.clone(), &values).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn disabled_duplicates_are_ignored() {
        let cs = ConstraintSystem::<Fq>::new_ref();
        let values = entries(&cs, &[(true, 0), (false, 0), (false, 0)]);
        enforce_distinct(cs.clone(), &values).unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn padding_keeps_entries_in_order() {
        let placeholder = empty_account(2);
        let scenario = Scenario::new(2, 3);
        let entries = vec![scenario.tree.witness(2).unwrap()];
        let slots = pad_batch(&entries, &placeholder, 3)
            .map(|(enabled, entry)| (enabled, entry.index()))
            .collect::<Vec<_>>();
        assert_eq!(slots, vec![(true, 2), (false, 0), (false, 0)]);
    }
}
