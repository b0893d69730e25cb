mod aggregation;
pub use aggregation::AggregationTransition;

mod attested_slashing;
pub use attested_slashing::AttestedSlashingTransition;

mod slashing;
pub use slashing::SlashingTransition;

use crate::{
    attestation_message, AccountLedger, AccountRecord, AccountWitness, MerkleProof, Role,
    TransitionError,
};
use restaking_crypto::{curve, Fq, HashAccumulator, SignatureVerifier};

pub(crate) fn check_batch_size(got: usize, max: usize) -> Result<(), TransitionError> {
    if got > max {
        return Err(TransitionError::BatchTooLarge { got, max });
    }
    Ok(())
}

/// Rejects batches where two entries share an index
pub(crate) fn check_distinct(indices: &[u64]) -> Result<(), TransitionError> {
    for (first, a) in indices.iter().enumerate() {
        if let Some(offset) = indices[first + 1..].iter().position(|b| a == b) {
            return Err(TransitionError::DuplicateIndex {
                index: *a,
                first,
                second: first + 1 + offset,
            });
        }
    }
    Ok(())
}

/// Checks that `record` hashes to the proof's leaf and that the proof
/// authenticates that leaf under `root`
pub(crate) fn verify_account(
    ledger: &AccountLedger,
    hasher: &mut HashAccumulator,
    role: Role,
    record: &AccountRecord,
    proof: &MerkleProof,
    root: &Fq,
) -> Result<(), TransitionError> {
    if !curve::is_on_curve(record.public_key.as_ref()) {
        return Err(TransitionError::InvalidPublicKey(role));
    }
    let leaf = record.leaf_hash(hasher);
    if proof.leaf() != Some(&leaf) {
        return Err(TransitionError::LeafMismatch(role));
    }
    if !ledger.verify_inclusion(hasher, root, proof) {
        return Err(TransitionError::InclusionProof(role));
    }
    Ok(())
}

/// Checks the signature of `account` over `H(index, request, block_hash)`
pub(crate) fn verify_attestation<V: SignatureVerifier>(
    verifier: &V,
    hasher: &mut HashAccumulator,
    role: Role,
    account: &AccountWitness,
    request: &Fq,
    block_hash: &Fq,
) -> Result<(), TransitionError> {
    let signature = account.signature(role)?;
    let message = attestation_message(hasher, account.index(), request, block_hash);
    if !verifier.verify(&account.record.public_key, &message, signature) {
        return Err(TransitionError::SignatureVerification(role));
    }
    Ok(())
}

/// The root after rewriting the leaf of `record` with `balance`
pub(crate) fn update_balance(
    ledger: &AccountLedger,
    hasher: &mut HashAccumulator,
    role: Role,
    record: &AccountRecord,
    proof: &MerkleProof,
    balance: Fq,
) -> Result<Fq, TransitionError> {
    let leaf = record.with_balance(balance).leaf_hash(hasher);
    ledger
        .apply_update(hasher, proof, leaf)
        .map_err(|source| TransitionError::Ledger { role, source })
}
