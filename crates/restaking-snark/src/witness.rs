use crate::{AccountRecord, MerkleProof, Role, TransitionError};
use restaking_crypto::{Fq, HashAccumulator, Point, PrivateKey, Signature};
use std::fmt;

/// The digest a validator signs: `H(index, request, block_hash)`
pub fn attestation_message(
    hasher: &mut HashAccumulator,
    index: u64,
    request: &Fq,
    block_hash: &Fq,
) -> Fq {
    hasher.hash(&[Fq::from(index), *request, *block_hash])
}

/// A ledger account as presented to a transition: its record, its inclusion
/// proof and, for the roles that sign, the attested block hash with the
/// signature over it.
///
/// Everything but the index is private and is never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountWitness {
    pub record: AccountRecord,
    pub proof: MerkleProof,
    pub signature: Option<Signature>,
    pub block_hash: Option<Fq>,
}

impl AccountWitness {
    pub fn new(record: AccountRecord, proof: MerkleProof) -> Self {
        Self {
            record,
            proof,
            signature: None,
            block_hash: None,
        }
    }

    pub fn with_attestation(mut self, signature: Signature, block_hash: Fq) -> Self {
        self.signature = Some(signature);
        self.block_hash = Some(block_hash);
        self
    }

    /// Signs `H(index, request, block_hash)` with `secret_key` and attaches the
    /// attestation
    pub fn attest(self, secret_key: &PrivateKey, request: &Fq, block_hash: &Fq) -> Self {
        let message =
            attestation_message(&mut HashAccumulator::new(), self.index(), request, block_hash);
        let signature = secret_key.sign(&message);
        self.with_attestation(signature, *block_hash)
    }

    pub fn index(&self) -> u64 {
        self.record.index
    }

    pub(crate) fn signature(&self, role: Role) -> Result<&Signature, TransitionError> {
        self.signature.as_ref().ok_or(TransitionError::MissingField {
            role,
            field: "signature",
        })
    }

    pub(crate) fn block_hash(&self, role: Role) -> Result<Fq, TransitionError> {
        self.block_hash.ok_or(TransitionError::MissingField {
            role,
            field: "block hash",
        })
    }
}

impl fmt::Debug for AccountWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountWitness")
            .field("index", &self.record.index)
            .finish_non_exhaustive()
    }
}

/// The aggregator of an aggregation. The index and both seeds are public, the
/// key, balance and proof are not.
#[derive(Clone)]
pub struct AggregatorWitness {
    pub index: u64,
    pub pre_seed: Point,
    pub post_seed: Point,
    pub secret_key: PrivateKey,
    pub balance: Fq,
    pub proof: MerkleProof,
}

impl fmt::Debug for AggregatorWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregatorWitness")
            .field("index", &self.index)
            .field("pre_seed", &self.pre_seed)
            .field("post_seed", &self.post_seed)
            .finish_non_exhaustive()
    }
}

/// Public inputs of an aggregation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AggregationInputs {
    pub pre_state_root: Fq,
    pub post_state_root: Fq,
    pub block_hash: Fq,
    pub request: Fq,
    pub validator_bits: Fq,
}

#[derive(Clone, Debug)]
pub struct AggregationWitness {
    pub aggregator: AggregatorWitness,
    pub validators: Vec<AccountWitness>,
}

/// Public inputs of both slashing transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlashingInputs {
    pub pre_state_root: Fq,
    pub post_state_root: Fq,
    pub request: Fq,
    pub block_hash: Fq,
}

/// Attestors vouch for `request` at the transition block hash, the slashed
/// validator carries its own signed block hash.
#[derive(Clone, Debug)]
pub struct AttestedSlashingWitness {
    pub attestors: Vec<AccountWitness>,
    pub slashed: AccountWitness,
}

/// The slashed validator's signed block hash is the evidence, the slasher
/// collects the stake. The slasher's proof is against the ledger after the
/// validator has been zeroed.
#[derive(Clone, Debug)]
pub struct SlashingWitness {
    pub validator: AccountWitness,
    pub slasher: AccountWitness,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::UniformRand;
    use restaking_crypto::test_helpers::{keygen, rng};

    #[test]
    fn attest_signs_the_message() {
        let rng = &mut rng();
        let (sk, pk) = keygen(rng);
        let request = Fq::rand(rng);
        let block_hash = Fq::rand(rng);
        let record = AccountRecord::new(3, pk, Fq::from(50u64));
        let witness =
            AccountWitness::new(record, MerkleProof::new(vec![], 3))
                .attest(&sk, &request, &block_hash);

        let message = attestation_message(&mut HashAccumulator::new(), 3, &request, &block_hash);
        pk.verify(&message, witness.signature(Role::Slashed).unwrap()).unwrap();
        assert_eq!(witness.block_hash(Role::Slashed).unwrap(), block_hash);
    }

    #[test]
    fn missing_fields() {
        let rng = &mut rng();
        let (_, pk) = keygen(rng);
        let witness = AccountWitness::new(
            AccountRecord::new(1, pk, Fq::from(1u64)),
            MerkleProof::new(vec![], 1),
        );
        assert_eq!(
            witness.signature(Role::Validator(2)),
            Err(TransitionError::MissingField {
                role: Role::Validator(2),
                field: "signature"
            })
        );
        assert!(witness.block_hash(Role::Slasher).is_err());
    }

    #[test]
    fn debug_hides_private_data() {
        let rng = &mut rng();
        let (_, pk) = keygen(rng);
        let witness = AccountWitness::new(
            AccountRecord::new(6, pk, Fq::from(987654321u64)),
            MerkleProof::new(vec![Fq::from(123456789u64)], 6),
        );
        let printed = format!("{:?}", witness);
        assert!(printed.contains("index: 6"));
        assert!(!printed.contains("987654321"));
        assert!(!printed.contains("123456789"));
    }
}
