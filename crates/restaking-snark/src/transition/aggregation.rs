use super::{check_batch_size, check_distinct, update_balance, verify_account, verify_attestation};
use crate::{
    AccountLedger, AccountRecord, AggregationInputs, AggregationWitness, ParticipationBitmask,
    Role, TransitionError, TransitionParams,
};

use restaking_crypto::{curve, Eddsa, HashAccumulator, SignatureVerifier};
use tracing::{debug, info, span, Level};

/// Verifies aggregations: the aggregator rotates its seed and is rewarded,
/// then every validator of the batch is checked against the root left by the
/// previous step, rewarded, and recorded in the participation bitmask.
#[derive(Clone, Debug)]
pub struct AggregationTransition<V = Eddsa> {
    params: TransitionParams,
    ledger: AccountLedger,
    verifier: V,
}

impl AggregationTransition<Eddsa> {
    pub fn new(params: TransitionParams) -> Self {
        Self::with_verifier(params, Eddsa)
    }
}

impl<V: SignatureVerifier> AggregationTransition<V> {
    pub fn with_verifier(params: TransitionParams, verifier: V) -> Self {
        let ledger = AccountLedger::new(params.depth());
        Self {
            params,
            ledger,
            verifier,
        }
    }

    pub fn params(&self) -> &TransitionParams {
        &self.params
    }

    /// Accepts the transition only if every check passes and the recomputed
    /// post state root and bitmask equal the claimed ones
    #[tracing::instrument(skip_all, fields(validators = witness.validators.len()))]
    pub fn verify(
        &self,
        inputs: &AggregationInputs,
        witness: &AggregationWitness,
    ) -> Result<(), TransitionError> {
        check_batch_size(witness.validators.len(), self.params.batch_size())?;
        let indices = witness
            .validators
            .iter()
            .map(|v| v.index())
            .collect::<Vec<_>>();
        check_distinct(&indices)?;

        let mut hasher = HashAccumulator::new();
        let aggregator = &witness.aggregator;

        let span = span!(Level::TRACE, "aggregator");
        let _enter = span.enter();
        let sk = aggregator.secret_key.get_sk();
        if !curve::is_on_curve(&aggregator.pre_seed)
            || curve::scalar_mul(&aggregator.pre_seed, &sk) != aggregator.post_seed
        {
            return Err(TransitionError::SeedRotation);
        }
        let record = AccountRecord::new(
            aggregator.index,
            aggregator.secret_key.to_public(),
            aggregator.balance,
        );
        verify_account(
            &self.ledger,
            &mut hasher,
            Role::Aggregator,
            &record,
            &aggregator.proof,
            &inputs.pre_state_root,
        )?;
        let root = update_balance(
            &self.ledger,
            &mut hasher,
            Role::Aggregator,
            &record,
            &aggregator.proof,
            record.balance + self.params.aggregator_reward(),
        )?;
        drop(_enter);
        debug!(index = aggregator.index, "aggregator rewarded");

        let (root, bitmask) = witness.validators.iter().enumerate().try_fold(
            (root, ParticipationBitmask::new()),
            |(root, mut bitmask), (position, validator)| -> Result<_, TransitionError> {
                let role = Role::Validator(position);
                verify_account(
                    &self.ledger,
                    &mut hasher,
                    role,
                    &validator.record,
                    &validator.proof,
                    &root,
                )?;
                if validator.block_hash(role)? != inputs.block_hash {
                    return Err(TransitionError::BlockHashMismatch(role));
                }
                verify_attestation(
                    &self.verifier,
                    &mut hasher,
                    role,
                    validator,
                    &inputs.request,
                    &inputs.block_hash,
                )?;
                let root = update_balance(
                    &self.ledger,
                    &mut hasher,
                    role,
                    &validator.record,
                    &validator.proof,
                    validator.record.balance + self.params.validator_reward(),
                )?;
                bitmask.insert(validator.index());
                debug!(position, index = validator.index(), "validator rewarded");
                Ok((root, bitmask))
            },
        )?;

        if bitmask.value() != inputs.validator_bits {
            return Err(TransitionError::BitmaskMismatch);
        }
        if root != inputs.post_state_root {
            return Err(TransitionError::RootMismatch);
        }
        info!(indices = ?bitmask.indices(), "aggregation accepted");
        Ok(())
    }
}
