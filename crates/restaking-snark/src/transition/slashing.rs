use super::{update_balance, verify_account, verify_attestation};
use crate::{
    AccountLedger, Role, SlashingInputs, SlashingWitness, TransitionError, TransitionParams,
};

use ark_ff::Zero;
use restaking_crypto::{Eddsa, Fq, HashAccumulator, SignatureVerifier};
use tracing::{debug, info};

/// Verifies slashings driven by evidence: the validator's signature over a
/// block hash other than the transition's. The validator is zeroed first and
/// the slasher, proven against the resulting root, is credited its balance.
#[derive(Clone, Debug)]
pub struct SlashingTransition<V = Eddsa> {
    params: TransitionParams,
    ledger: AccountLedger,
    verifier: V,
}

impl SlashingTransition<Eddsa> {
    pub fn new(params: TransitionParams) -> Self {
        Self::with_verifier(params, Eddsa)
    }
}

impl<V: SignatureVerifier> SlashingTransition<V> {
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

    #[tracing::instrument(skip_all)]
    pub fn verify(
        &self,
        inputs: &SlashingInputs,
        witness: &SlashingWitness,
    ) -> Result<(), TransitionError> {
        let mut hasher = HashAccumulator::new();
        let validator = &witness.validator;
        let slasher = &witness.slasher;

        verify_account(
            &self.ledger,
            &mut hasher,
            Role::Slashed,
            &validator.record,
            &validator.proof,
            &inputs.pre_state_root,
        )?;
        let evidence = validator.block_hash(Role::Slashed)?;
        verify_attestation(
            &self.verifier,
            &mut hasher,
            Role::Slashed,
            validator,
            &inputs.request,
            &evidence,
        )?;
        let root = update_balance(
            &self.ledger,
            &mut hasher,
            Role::Slashed,
            &validator.record,
            &validator.proof,
            Fq::zero(),
        )?;
        debug!(index = validator.index(), "validator zeroed");

        verify_account(
            &self.ledger,
            &mut hasher,
            Role::Slasher,
            &slasher.record,
            &slasher.proof,
            &root,
        )?;
        let root = update_balance(
            &self.ledger,
            &mut hasher,
            Role::Slasher,
            &slasher.record,
            &slasher.proof,
            slasher.record.balance + validator.record.balance,
        )?;

        if evidence == inputs.block_hash {
            return Err(TransitionError::Evidence);
        }
        if root != inputs.post_state_root {
            return Err(TransitionError::RootMismatch);
        }
        info!(
            slashed = validator.index(),
            slasher = slasher.index(),
            "slashing accepted"
        );
        Ok(())
    }
}
