use super::{
    empty_account, enforce_attestation, enforce_distinct, pad_batch, AccountVar, AttestationVar,
};
use crate::{
    AggregationInputs, AggregationWitness, AggregatorWitness, MerkleProof, TransitionParams,
};

use ark_ec::AffineRepr;
use ark_ff::Zero;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use restaking_crypto::{Fq, Point, PrivateKey};
use restaking_gadgets::{
    alloc_point, generator_var, scalar_mul, Bool, FqVar, HashAccumulatorVar, MerkleProofVar,
    PowGadget,
};
use tracing::{debug, info, span, Level};

#[derive(Clone, Debug)]
/// The aggregation transition as a constraint system.
///
/// The batch always spans `batch_size` slots. Slots past the provided
/// validators hold a disabled placeholder which leaves the root and the
/// bitmask untouched, so every accepted batch shares one constraint system.
///
/// Instance values, in order: pre-state root, post-state root, block hash,
/// request, validator bits, aggregator index, pre seed `(x, y)` and post seed
/// `(x, y)`.
pub struct AggregationCircuit {
    pub params: TransitionParams,
    pub inputs: AggregationInputs,
    pub witness: AggregationWitness,
}

impl AggregationCircuit {
    pub fn new(
        params: TransitionParams,
        inputs: AggregationInputs,
        witness: AggregationWitness,
    ) -> Self {
        Self {
            params,
            inputs,
            witness,
        }
    }

    /// A full batch without assignments, for sizing the circuit
    pub fn empty(params: TransitionParams) -> Self {
        let depth = params.depth();
        let aggregator = AggregatorWitness {
            index: 0,
            pre_seed: Point::zero(),
            post_seed: Point::zero(),
            secret_key: PrivateKey::from_sk(&Fq::zero()),
            balance: Fq::zero(),
            proof: MerkleProof::new(vec![Fq::zero(); depth + 1], 0),
        };
        let inputs = AggregationInputs {
            pre_state_root: Fq::zero(),
            post_state_root: Fq::zero(),
            block_hash: Fq::zero(),
            request: Fq::zero(),
            validator_bits: Fq::zero(),
        };
        let witness = AggregationWitness {
            aggregator,
            validators: vec![empty_account(depth); params.batch_size()],
        };
        Self::new(params, inputs, witness)
    }

    /// The instance assignment in allocation order
    pub fn public_inputs(&self) -> Vec<Fq> {
        let aggregator = &self.witness.aggregator;
        vec![
            self.inputs.pre_state_root,
            self.inputs.post_state_root,
            self.inputs.block_hash,
            self.inputs.request,
            self.inputs.validator_bits,
            Fq::from(aggregator.index),
            aggregator.pre_seed.x,
            aggregator.pre_seed.y,
            aggregator.post_seed.x,
            aggregator.post_seed.y,
        ]
    }
}

impl ConstraintSynthesizer<Fq> for AggregationCircuit {
    #[tracing::instrument(target = "r1cs", skip_all)]
    fn generate_constraints(self, cs: ConstraintSystemRef<Fq>) -> Result<(), SynthesisError> {
        let span = span!(Level::TRACE, "AggregationCircuit");
        let _enter = span.enter();
        info!("generating constraints");

        let depth = self.params.depth();
        if self.witness.validators.len() > self.params.batch_size() {
            return Err(SynthesisError::Unsatisfiable);
        }

        let pre_state_root = FqVar::new_input(cs.clone(), || Ok(self.inputs.pre_state_root))?;
        let post_state_root = FqVar::new_input(cs.clone(), || Ok(self.inputs.post_state_root))?;
        let block_hash = FqVar::new_input(cs.clone(), || Ok(self.inputs.block_hash))?;
        let request = FqVar::new_input(cs.clone(), || Ok(self.inputs.request))?;
        let validator_bits = FqVar::new_input(cs.clone(), || Ok(self.inputs.validator_bits))?;

        let aggregator = &self.witness.aggregator;
        let index = FqVar::new_input(cs.clone(), || Ok(Fq::from(aggregator.index)))?;
        let pre_seed = alloc_point(cs.clone(), || Ok(aggregator.pre_seed), AllocationMode::Input)?;
        let post_seed =
            alloc_point(cs.clone(), || Ok(aggregator.post_seed), AllocationMode::Input)?;
        let secret_key = FqVar::new_witness(cs.clone(), || Ok(aggregator.secret_key.get_sk()))?;
        let balance = FqVar::new_witness(cs.clone(), || Ok(aggregator.balance))?;
        let proof = MerkleProofVar::new_witness(
            cs.clone(),
            &aggregator.proof.path,
            aggregator.proof.path_helper,
            depth,
        )?;

        let placeholder = empty_account(depth);
        let slots = pad_batch(&self.witness.validators, &placeholder, self.params.batch_size())
            .map(|(enabled, validator)| -> Result<_, SynthesisError> {
                let enabled = Bool::new_witness(cs.clone(), || Ok(enabled))?;
                let account =
                    AccountVar::new(cs.clone(), validator, depth, AllocationMode::Witness)?;
                let attestation = AttestationVar::new_witness(cs.clone(), validator)?;
                Ok((enabled, account, attestation))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let indices = slots
            .iter()
            .map(|(enabled, account, _)| (enabled.clone(), account.index.clone()))
            .collect::<Vec<_>>();
        enforce_distinct(cs.clone(), &indices)?;

        let mut hasher = HashAccumulatorVar::new(cs);

        debug!("rotating seed");
        scalar_mul(&pre_seed, &secret_key)?.enforce_equal(&post_seed)?;
        let public_key = scalar_mul(&generator_var(), &secret_key)?;
        let aggregator = AccountVar {
            index,
            public_key,
            balance,
            proof,
        };
        aggregator.enforce_included(&mut hasher, &pre_state_root)?;
        let reward = &aggregator.balance + self.params.aggregator_reward();
        let root = aggregator.updated_root(&mut hasher, &reward)?;

        debug!(validators = self.witness.validators.len(), "applying attestations");
        let two = FqVar::constant(Fq::from(2u64));
        let (root, bits) = slots.iter().try_fold(
            (root, FqVar::zero()),
            |(root, bits), (enabled, account, attestation)| -> Result<_, SynthesisError> {
                account.conditional_enforce_included(&mut hasher, &root, enabled)?;
                attestation
                    .block_hash
                    .conditional_enforce_equal(&block_hash, enabled)?;
                enforce_attestation(
                    &mut hasher,
                    account,
                    &attestation.signature,
                    &request,
                    &block_hash,
                    enabled,
                )?;
                let reward = &account.balance + self.params.validator_reward();
                let updated = account.updated_root(&mut hasher, &reward)?;
                let root = enabled.select(&updated, &root)?;
                let bit = enabled.select(&two.pow_var(&account.index)?, &FqVar::zero())?;
                Ok((root, bits + bit))
            },
        )?;

        bits.enforce_equal(&validator_bits)?;
        root.enforce_equal(&post_state_root)?;
        info!("constraints generated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::Scenario;
    use ark_ff::One;
    use ark_relations::r1cs::{ConstraintSystem, SynthesisMode};
    use restaking_gadgets::utils::test_helpers::{
        print_unsatisfied_constraints, run_profile_constraints,
    };

    fn satisfied(circuit: AggregationCircuit) -> bool {
        let cs = ConstraintSystem::<Fq>::new_ref();
        match circuit.generate_constraints(cs.clone()) {
            Ok(()) => {
                print_unsatisfied_constraints(cs.clone());
                cs.is_satisfied().unwrap()
            }
            Err(_) => false,
        }
    }

    #[test]
    fn honest_batch_is_satisfied() {
        run_profile_constraints(|| {
            let mut scenario = Scenario::new(3, 2);
            let (inputs, witness) = scenario.aggregation(0, &[3, 6]);
            let circuit = AggregationCircuit::new(scenario.params.clone(), inputs, witness);

            let cs = ConstraintSystem::<Fq>::new_ref();
            circuit.clone().generate_constraints(cs.clone()).unwrap();
            print_unsatisfied_constraints(cs.clone());
            assert!(cs.is_satisfied().unwrap());

            let instance = cs.borrow().unwrap().instance_assignment.clone();
            assert_eq!(instance[1..], circuit.public_inputs()[..]);
        });
    }

    #[test]
    fn wrong_bitmask_is_unsatisfied() {
        let mut scenario = Scenario::new(3, 2);
        let (mut inputs, witness) = scenario.aggregation(0, &[3, 6]);
        inputs.validator_bits += Fq::one();
        let circuit = AggregationCircuit::new(scenario.params.clone(), inputs, witness);
        assert!(!satisfied(circuit));
    }

    #[test]
    fn wrong_block_hash_is_unsatisfied() {
        let mut scenario = Scenario::new(3, 2);
        let (inputs, mut witness) = scenario.aggregation(0, &[3, 6]);
        witness.validators[1].block_hash = Some(inputs.block_hash + Fq::one());
        let circuit = AggregationCircuit::new(scenario.params.clone(), inputs, witness);
        assert!(!satisfied(circuit));
    }

    #[test]
    fn wrong_seed_is_unsatisfied() {
        let mut scenario = Scenario::new(3, 1);
        let (inputs, mut witness) = scenario.aggregation(0, &[3]);
        witness.aggregator.post_seed = witness.aggregator.pre_seed;
        let circuit = AggregationCircuit::new(scenario.params.clone(), inputs, witness);
        assert!(!satisfied(circuit));
    }

    #[test]
    fn partial_batch_is_satisfied() {
        let mut scenario = Scenario::new(3, 3);
        let (inputs, witness) = scenario.aggregation(0, &[5]);
        let circuit = AggregationCircuit::new(scenario.params.clone(), inputs, witness);
        assert!(satisfied(circuit));

        let (inputs, witness) = scenario.aggregation(1, &[]);
        let circuit = AggregationCircuit::new(scenario.params.clone(), inputs, witness);
        assert!(satisfied(circuit));
    }

    #[test]
    fn duplicate_validators_are_unsatisfied() {
        // both entries are signed and proven against the running root
        let mut scenario = Scenario::new(3, 2);
        let (inputs, witness) = scenario.aggregation(0, &[3, 3]);
        let circuit = AggregationCircuit::new(scenario.params.clone(), inputs, witness);
        assert!(!satisfied(circuit));
    }

    #[test]
    fn missing_signature_cannot_be_assigned() {
        let mut scenario = Scenario::new(3, 1);
        let (inputs, mut witness) = scenario.aggregation(0, &[3]);
        witness.validators[0].signature = None;
        let cs = ConstraintSystem::<Fq>::new_ref();
        let err = AggregationCircuit::new(scenario.params.clone(), inputs, witness)
            .generate_constraints(cs)
            .unwrap_err();
        assert!(matches!(err, SynthesisError::AssignmentMissing));
    }

    #[test]
    fn every_batch_has_the_shape_of_the_empty_circuit() {
        let mut scenario = Scenario::new(3, 2);
        let setup = ConstraintSystem::<Fq>::new_ref();
        setup.set_mode(SynthesisMode::Setup);
        AggregationCircuit::empty(scenario.params.clone())
            .generate_constraints(setup.clone())
            .unwrap();

        for validators in [&[3u64, 6][..], &[3], &[]] {
            let (inputs, witness) = scenario.aggregation(0, validators);
            let cs = ConstraintSystem::<Fq>::new_ref();
            AggregationCircuit::new(scenario.params.clone(), inputs, witness)
                .generate_constraints(cs.clone())
                .unwrap();
            assert!(cs.is_satisfied().unwrap());
            assert_eq!(setup.num_constraints(), cs.num_constraints());
            assert_eq!(setup.num_instance_variables(), cs.num_instance_variables());
            assert_eq!(setup.num_witness_variables(), cs.num_witness_variables());
        }
    }
}
