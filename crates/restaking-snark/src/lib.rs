//! # Restaking Ledger SNARK
//!
//! This crate implements the verification logic of a restaking protocol's
//! account ledger: a Merkle-authenticated registry of validator accounts
//! (public key, staked balance) which is updated by two kinds of state
//! transitions.
//!
//! - **Aggregation**: an aggregator rotates its seed, proves ownership of its
//!   ledger account and applies a batch of validator attestations. Every
//!   account touched is rewarded and the indices of the processed validators
//!   are accumulated into a public participation bitmask.
//! - **Slashing**: the stake of a misbehaving validator is zeroed. Either a set
//!   of attestors vouches for the slash, or a slasher presents signed evidence
//!   bound to a block other than the current one and is credited the stake.
//!
//! Each transition receives a pre-state root and private witnesses, and accepts
//! only if the claimed post-state root (and bitmask) match the recomputed ones.
//! Inside a batch every inclusion proof is checked against the root left by the
//! previous step, so processing is a fold over the batch carrying the running
//! root. Circuits pad every batch to `batch_size` slots with disabled
//! placeholders, so a single constraint system serves all accepted batches.
//!
//! The transitions exist twice: as plain deterministic verifiers
//! ([`AggregationTransition`], [`AttestedSlashingTransition`],
//! [`SlashingTransition`]) and as constraint systems ([`AggregationCircuit`],
//! [`AttestedSlashingCircuit`], [`SlashingCircuit`]) built only from equality
//! assertions, conditional selects and field arithmetic.

mod params;
pub use params::{
    TransitionParams, AGGREGATOR_REWARD, DEFAULT_BATCH_SIZE, DEFAULT_DEPTH, MAX_DEPTH,
    VALIDATOR_REWARD,
};

mod error;
pub use error::{LedgerError, ParamsError, Role, TransitionError};

/// Merkle accumulator over the account records
pub mod ledger;
pub use ledger::{AccountLedger, AccountRecord, AccountTree, MerkleProof};

mod bitmask;
pub use bitmask::{pow, ParticipationBitmask};

mod witness;
pub use witness::{
    attestation_message, AccountWitness, AggregationInputs, AggregationWitness,
    AggregatorWitness, AttestedSlashingWitness, SlashingInputs, SlashingWitness,
};

mod transition;
pub use transition::{AggregationTransition, AttestedSlashingTransition, SlashingTransition};

mod circuits;
pub use circuits::{AggregationCircuit, AttestedSlashingCircuit, SlashingCircuit};

#[cfg(test)]
pub(crate) mod test_helpers;

pub use restaking_crypto::Fq;
