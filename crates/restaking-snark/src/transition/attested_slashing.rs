use super::{check_batch_size, check_distinct, update_balance, verify_account, verify_attestation};
use crate::{
    AccountLedger, AttestedSlashingWitness, Role, SlashingInputs, TransitionError,
    TransitionParams,
};

use ark_ff::Zero;
use restaking_crypto::{Eddsa, Fq, HashAccumulator, SignatureVerifier};
use tracing::{debug, info};

/// Verifies slashings vouched for by a set of attestors. Every attestor must
/// be a ledger member at the pre-state root and sign the request at the
/// transition block hash. The slashed validator must hold a signature over its
/// own block hash, and its balance is set to zero.
#[derive(Clone, Debug)]
pub struct AttestedSlashingTransition<V = Eddsa> {
    params: TransitionParams,
    ledger: AccountLedger,
    verifier: V,
}

impl AttestedSlashingTransition<Eddsa> {
    pub fn new(params: TransitionParams) -> Self {
        Self::with_verifier(params, Eddsa)
    }
}

impl<V: SignatureVerifier> AttestedSlashingTransition<V> {
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

    #[tracing::instrument(skip_all, fields(attestors = witness.attestors.len()))]
    pub fn verify(
        &self,
        inputs: &SlashingInputs,
        witness: &AttestedSlashingWitness,
    ) -> Result<(), TransitionError> {
        check_batch_size(witness.attestors.len(), self.params.batch_size())?;
        let indices = witness
            .attestors
            .iter()
            .map(|a| a.index())
            .collect::<Vec<_>>();
        check_distinct(&indices)?;

        let mut hasher = HashAccumulator::new();
        for (position, attestor) in witness.attestors.iter().enumerate() {
            let role = Role::Attestor(position);
            verify_account(
                &self.ledger,
                &mut hasher,
                role,
                &attestor.record,
                &attestor.proof,
                &inputs.pre_state_root,
            )?;
            verify_attestation(
                &self.verifier,
                &mut hasher,
                role,
                attestor,
                &inputs.request,
                &inputs.block_hash,
            )?;
            debug!(position, index = attestor.index(), "attestation verified");
        }

        let slashed = &witness.slashed;
        verify_account(
            &self.ledger,
            &mut hasher,
            Role::Slashed,
            &slashed.record,
            &slashed.proof,
            &inputs.pre_state_root,
        )?;
        let block_hash = slashed.block_hash(Role::Slashed)?;
        verify_attestation(
            &self.verifier,
            &mut hasher,
            Role::Slashed,
            slashed,
            &inputs.request,
            &block_hash,
        )?;
        let root = update_balance(
            &self.ledger,
            &mut hasher,
            Role::Slashed,
            &slashed.record,
            &slashed.proof,
            Fq::zero(),
        )?;

        if root != inputs.post_state_root {
            return Err(TransitionError::RootMismatch);
        }
        info!(index = slashed.index(), "slashing accepted");
        Ok(())
    }
}
