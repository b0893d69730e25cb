use crate::ParamsError;
use restaking_crypto::Fq;

/// Default number of tree levels (128 ledger slots)
pub const DEFAULT_DEPTH: usize = 7;

/// The direction bits of a path are packed in a `u64`
pub const MAX_DEPTH: usize = 63;

/// Default number of validators processed per transition
pub const DEFAULT_BATCH_SIZE: usize = 4;

/// Credited to the aggregator of every accepted aggregation
pub const AGGREGATOR_REWARD: u64 = 500_000_000_000_000;

/// Credited to every validator included in an accepted aggregation
pub const VALIDATOR_REWARD: u64 = 20_000_000_000;

/// Protocol wide parameters shared by all transitions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionParams {
    depth: usize,
    batch_size: usize,
    aggregator_reward: Fq,
    validator_reward: Fq,
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            batch_size: DEFAULT_BATCH_SIZE,
            aggregator_reward: Fq::from(AGGREGATOR_REWARD),
            validator_reward: Fq::from(VALIDATOR_REWARD),
        }
    }
}

impl TransitionParams {
    /// Parameters for a ledger with `2^depth` slots processing up to
    /// `batch_size` validators per transition, with the default rewards.
    pub fn new(depth: usize, batch_size: usize) -> Result<Self, ParamsError> {
        if depth == 0 || depth > MAX_DEPTH {
            return Err(ParamsError::InvalidDepth(depth));
        }
        if batch_size == 0 {
            return Err(ParamsError::InvalidBatchSize(batch_size));
        }
        Ok(Self {
            depth,
            batch_size,
            ..Self::default()
        })
    }

    pub fn with_rewards(mut self, aggregator_reward: Fq, validator_reward: Fq) -> Self {
        self.aggregator_reward = aggregator_reward;
        self.validator_reward = validator_reward;
        self
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn aggregator_reward(&self) -> Fq {
        self.aggregator_reward
    }

    pub fn validator_reward(&self) -> Fq {
        self.validator_reward
    }

    /// Number of addressable ledger slots
    pub fn slots(&self) -> u64 {
        1u64 << self.depth
    }
}
