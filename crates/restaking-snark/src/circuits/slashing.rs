use super::{empty_account, enforce_attestation, AccountVar, AttestationVar};
use crate::{SlashingInputs, SlashingWitness, TransitionParams};

use ark_ff::Zero;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use restaking_crypto::Fq;
use restaking_gadgets::{Bool, FqVar, HashAccumulatorVar};
use tracing::{debug, info, span, Level};

#[derive(Clone, Debug)]
/// The evidence based slashing transition as a constraint system.
///
/// Instance values, in order: pre-state root, post-state root, block hash,
/// request, the index of the slashed validator and the index of the slasher.
pub struct SlashingCircuit {
    pub params: TransitionParams,
    pub inputs: SlashingInputs,
    pub witness: SlashingWitness,
}

impl SlashingCircuit {
    pub fn new(params: TransitionParams, inputs: SlashingInputs, witness: SlashingWitness) -> Self {
        Self {
            params,
            inputs,
            witness,
        }
    }

    pub fn empty(params: TransitionParams) -> Self {
        let depth = params.depth();
        let inputs = SlashingInputs {
            pre_state_root: Fq::zero(),
            post_state_root: Fq::zero(),
            request: Fq::zero(),
            block_hash: Fq::zero(),
        };
        let witness = SlashingWitness {
            validator: empty_account(depth),
            slasher: empty_account(depth),
        };
        Self::new(params, inputs, witness)
    }

    pub fn public_inputs(&self) -> Vec<Fq> {
        vec![
            self.inputs.pre_state_root,
            self.inputs.post_state_root,
            self.inputs.block_hash,
            self.inputs.request,
            Fq::from(self.witness.validator.index()),
            Fq::from(self.witness.slasher.index()),
        ]
    }
}

impl ConstraintSynthesizer<Fq> for SlashingCircuit {
    #[tracing::instrument(target = "r1cs", skip_all)]
    fn generate_constraints(self, cs: ConstraintSystemRef<Fq>) -> Result<(), SynthesisError> {
        let span = span!(Level::TRACE, "SlashingCircuit");
        let _enter = span.enter();
        info!("generating constraints");

        let depth = self.params.depth();
        let pre_state_root = FqVar::new_input(cs.clone(), || Ok(self.inputs.pre_state_root))?;
        let post_state_root = FqVar::new_input(cs.clone(), || Ok(self.inputs.post_state_root))?;
        let block_hash = FqVar::new_input(cs.clone(), || Ok(self.inputs.block_hash))?;
        let request = FqVar::new_input(cs.clone(), || Ok(self.inputs.request))?;
        let validator = AccountVar::new(
            cs.clone(),
            &self.witness.validator,
            depth,
            AllocationMode::Input,
        )?;
        let slasher = AccountVar::new(
            cs.clone(),
            &self.witness.slasher,
            depth,
            AllocationMode::Input,
        )?;
        let evidence = AttestationVar::new_witness(cs.clone(), &self.witness.validator)?;

        let mut hasher = HashAccumulatorVar::new(cs);

        debug!("zeroing slashed balance");
        validator.enforce_included(&mut hasher, &pre_state_root)?;
        enforce_attestation(
            &mut hasher,
            &validator,
            &evidence.signature,
            &request,
            &evidence.block_hash,
            &Bool::TRUE,
        )?;
        let root = validator.updated_root(&mut hasher, &FqVar::zero())?;

        debug!("crediting slasher");
        slasher.enforce_included(&mut hasher, &root)?;
        let credited = &slasher.balance + &validator.balance;
        let root = slasher.updated_root(&mut hasher, &credited)?;

        evidence.block_hash.enforce_not_equal(&block_hash)?;
        root.enforce_equal(&post_state_root)?;
        info!("constraints generated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::Scenario;
    use ark_relations::r1cs::ConstraintSystem;

    fn satisfied(circuit: SlashingCircuit) -> bool {
        let cs = ConstraintSystem::<Fq>::new_ref();
        match circuit.generate_constraints(cs.clone()) {
            Ok(()) => cs.is_satisfied().unwrap(),
            Err(_) => false,
        }
    }

    #[test]
    fn evidence_is_satisfied() {
        let mut scenario = Scenario::new(3, 1);
        let (inputs, witness) = scenario.slashing(3, 5, false);
        let circuit = SlashingCircuit::new(scenario.params.clone(), inputs, witness);

        let cs = ConstraintSystem::<Fq>::new_ref();
        circuit.clone().generate_constraints(cs.clone()).unwrap();
        assert!(cs.is_satisfied().unwrap());
        let instance = cs.borrow().unwrap().instance_assignment.clone();
        assert_eq!(instance[1..], circuit.public_inputs()[..]);
    }

    #[test]
    fn current_block_is_rejected() {
        let mut scenario = Scenario::new(3, 1);
        let (inputs, witness) = scenario.slashing(3, 5, true);
        let circuit = SlashingCircuit::new(scenario.params.clone(), inputs, witness);
        assert!(!satisfied(circuit));
    }

    #[test]
    fn slasher_proof_against_pre_state_is_unsatisfied() {
        let mut scenario = Scenario::new(3, 1);
        let (inputs, mut witness) = scenario.slashing(3, 5, false);
        witness.slasher.proof = scenario.pre_state_proof(5);
        let circuit = SlashingCircuit::new(scenario.params.clone(), inputs, witness);
        assert!(!satisfied(circuit));
    }

    #[test]
    fn missing_evidence_cannot_be_assigned() {
        let mut scenario = Scenario::new(3, 1);
        let (inputs, mut witness) = scenario.slashing(3, 5, false);
        witness.validator.block_hash = None;
        let cs = ConstraintSystem::<Fq>::new_ref();
        let err = SlashingCircuit::new(scenario.params.clone(), inputs, witness)
            .generate_constraints(cs)
            .unwrap_err();
        assert!(matches!(err, SynthesisError::AssignmentMissing));
    }
}
