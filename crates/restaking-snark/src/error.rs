use std::fmt;
use thiserror::Error;

/// The part a witness plays in a transition. Positions refer to the order of
/// the batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Aggregator,
    Validator(usize),
    Attestor(usize),
    Slashed,
    Slasher,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Aggregator => write!(f, "aggregator"),
            Role::Validator(i) => write!(f, "validator #{}", i),
            Role::Attestor(i) => write!(f, "attestor #{}", i),
            Role::Slashed => write!(f, "slashed validator"),
            Role::Slasher => write!(f, "slasher"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Invalid protocol parameters
pub enum ParamsError {
    #[error("depth must be between 1 and 63, got {0}")]
    InvalidDepth(usize),
    #[error("batch size must be at least 1, got {0}")]
    InvalidBatchSize(usize),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Malformed ledger data
pub enum LedgerError {
    #[error("merkle path has {got} entries, expected {expected}")]
    MalformedProof { expected: usize, got: usize },
    #[error("path helper {helper:#x} does not fit in {depth} bits")]
    HelperOutOfRange { helper: u64, depth: usize },
    #[error("index {index} is outside the {slots} ledger slots")]
    IndexOutOfRange { index: u64, slots: u64 },
    #[error("no account at index {0}")]
    UnknownAccount(u64),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// A failed transition check. Any of these rejects the whole transition.
pub enum TransitionError {
    #[error("index {index} appears at batch positions {first} and {second}")]
    DuplicateIndex {
        index: u64,
        first: usize,
        second: usize,
    },
    #[error("batch of {got} entries exceeds the configured size of {max}")]
    BatchTooLarge { got: usize, max: usize },
    #[error("post seed does not match the pre seed rotated by the aggregator key")]
    SeedRotation,
    #[error("public key of the {0} is not on the curve")]
    InvalidPublicKey(Role),
    #[error("leaf of the {0} does not match its account record")]
    LeafMismatch(Role),
    #[error("inclusion proof of the {0} does not match the state root")]
    InclusionProof(Role),
    #[error("block hash of the {0} does not match the transition block hash")]
    BlockHashMismatch(Role),
    #[error("{field} missing from the {role} witness")]
    MissingField { role: Role, field: &'static str },
    #[error("signature of the {0} failed to verify")]
    SignatureVerification(Role),
    #[error("participation bitmask does not match the processed validators")]
    BitmaskMismatch,
    #[error("recomputed post state root does not match the claimed one")]
    RootMismatch,
    #[error("slashing evidence is bound to the current block")]
    Evidence,
    #[error("ledger error for the {role}: {source}")]
    Ledger {
        role: Role,
        #[source]
        source: LedgerError,
    },
}
