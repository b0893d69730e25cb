use super::{
    empty_account, enforce_attestation, enforce_distinct, pad_batch, AccountVar, AttestationVar,
};
use crate::{AttestedSlashingWitness, SlashingInputs, TransitionParams};

use ark_ff::Zero;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use restaking_crypto::Fq;
use restaking_gadgets::{Bool, FqVar, HashAccumulatorVar, SignatureVar};
use tracing::{debug, info, span, Level};

#[derive(Clone, Debug)]
/// The attested slashing transition as a constraint system. Attestors are
/// padded to `batch_size` slots like the validators of an aggregation.
///
/// Instance values, in order: pre-state root, post-state root, request, block
/// hash and the index of the slashed validator.
pub struct AttestedSlashingCircuit {
    pub params: TransitionParams,
    pub inputs: SlashingInputs,
    pub witness: AttestedSlashingWitness,
}

impl AttestedSlashingCircuit {
    pub fn new(
        params: TransitionParams,
        inputs: SlashingInputs,
        witness: AttestedSlashingWitness,
    ) -> Self {
        Self {
            params,
            inputs,
            witness,
        }
    }

    /// A full set of attestors without assignments, for sizing the circuit
    pub fn empty(params: TransitionParams) -> Self {
        let depth = params.depth();
        let inputs = SlashingInputs {
            pre_state_root: Fq::zero(),
            post_state_root: Fq::zero(),
            request: Fq::zero(),
            block_hash: Fq::zero(),
        };
        let witness = AttestedSlashingWitness {
            attestors: vec![empty_account(depth); params.batch_size()],
            slashed: empty_account(depth),
        };
        Self::new(params, inputs, witness)
    }

    pub fn public_inputs(&self) -> Vec<Fq> {
        vec![
            self.inputs.pre_state_root,
            self.inputs.post_state_root,
            self.inputs.request,
            self.inputs.block_hash,
            Fq::from(self.witness.slashed.index()),
        ]
    }
}

impl ConstraintSynthesizer<Fq> for AttestedSlashingCircuit {
    #[tracing::instrument(target = "r1cs", skip_all)]
    fn generate_constraints(self, cs: ConstraintSystemRef<Fq>) -> Result<(), SynthesisError> {
        let span = span!(Level::TRACE, "AttestedSlashingCircuit");
        let _enter = span.enter();
        info!("generating constraints");

        let depth = self.params.depth();
        if self.witness.attestors.len() > self.params.batch_size() {
            return Err(SynthesisError::Unsatisfiable);
        }

        let pre_state_root = FqVar::new_input(cs.clone(), || Ok(self.inputs.pre_state_root))?;
        let post_state_root = FqVar::new_input(cs.clone(), || Ok(self.inputs.post_state_root))?;
        let request = FqVar::new_input(cs.clone(), || Ok(self.inputs.request))?;
        let block_hash = FqVar::new_input(cs.clone(), || Ok(self.inputs.block_hash))?;
        let slashed = AccountVar::new(
            cs.clone(),
            &self.witness.slashed,
            depth,
            AllocationMode::Input,
        )?;
        let slashed_attestation = AttestationVar::new_witness(cs.clone(), &self.witness.slashed)?;

        let placeholder = empty_account(depth);
        let attestors = pad_batch(&self.witness.attestors, &placeholder, self.params.batch_size())
            .map(|(enabled, attestor)| -> Result<_, SynthesisError> {
                let enabled = Bool::new_witness(cs.clone(), || Ok(enabled))?;
                let account =
                    AccountVar::new(cs.clone(), attestor, depth, AllocationMode::Witness)?;
                let signature = SignatureVar::new_witness(cs.clone(), || {
                    attestor.signature.ok_or(SynthesisError::AssignmentMissing)
                })?;
                Ok((enabled, account, signature))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let indices = attestors
            .iter()
            .map(|(enabled, account, _)| (enabled.clone(), account.index.clone()))
            .collect::<Vec<_>>();
        enforce_distinct(cs.clone(), &indices)?;

        let mut hasher = HashAccumulatorVar::new(cs);

        debug!(attestors = self.witness.attestors.len(), "verifying attestations");
        for (enabled, account, signature) in &attestors {
            account.conditional_enforce_included(&mut hasher, &pre_state_root, enabled)?;
            enforce_attestation(&mut hasher, account, signature, &request, &block_hash, enabled)?;
        }

        debug!("zeroing slashed balance");
        slashed.enforce_included(&mut hasher, &pre_state_root)?;
        enforce_attestation(
            &mut hasher,
            &slashed,
            &slashed_attestation.signature,
            &request,
            &slashed_attestation.block_hash,
            &Bool::TRUE,
        )?;
        let root = slashed.updated_root(&mut hasher, &FqVar::zero())?;

        root.enforce_equal(&post_state_root)?;
        info!("constraints generated");
        Ok(())
    }
}
