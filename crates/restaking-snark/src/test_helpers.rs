use crate::{
    AccountRecord, AccountTree, AccountWitness, AggregationInputs, AggregationWitness,
    AggregatorWitness, AttestedSlashingWitness, MerkleProof, ParticipationBitmask,
    SlashingInputs, SlashingWitness, TransitionParams,
};

use ark_ff::{UniformRand, Zero};
use rand_xorshift::XorShiftRng;
use restaking_crypto::{curve, test_helpers::keygen, Fq, PrivateKey};

/// A fully populated ledger with known keys, producing honest witnesses
pub struct Scenario {
    pub params: TransitionParams,
    pub tree: AccountTree,
    pub keys: Vec<PrivateKey>,
    pub rng: XorShiftRng,
}

impl Scenario {
    /// Every slot `i` holds balance `100 + i`
    pub fn new(depth: usize, batch_size: usize) -> Self {
        let params = TransitionParams::new(depth, batch_size)
            .unwrap()
            .with_rewards(Fq::from(1000u64), Fq::from(10u64));
        let mut rng = restaking_crypto::test_helpers::rng();
        let mut tree = AccountTree::new(&params);
        let mut keys = Vec::new();
        for index in 0..params.slots() {
            let (sk, pk) = keygen(&mut rng);
            tree.insert(AccountRecord::new(index, pk, Fq::from(100 + index)))
                .unwrap();
            keys.push(sk);
        }
        Self {
            params,
            tree,
            keys,
            rng,
        }
    }

    pub fn pre_state_proof(&self, index: u64) -> MerkleProof {
        self.tree.proof(index).unwrap()
    }

    fn attested(
        &self,
        tree: &AccountTree,
        index: u64,
        request: &Fq,
        block_hash: &Fq,
    ) -> AccountWitness {
        tree.witness(index)
            .unwrap()
            .attest(&self.keys[index as usize], request, block_hash)
    }

    pub fn aggregation(
        &mut self,
        aggregator: u64,
        validators: &[u64],
    ) -> (AggregationInputs, AggregationWitness) {
        let request = Fq::rand(&mut self.rng);
        let block_hash = Fq::rand(&mut self.rng);
        let secret_key = self.keys[aggregator as usize].clone();
        let pre_seed = curve::mul_generator(&Fq::rand(&mut self.rng));
        let post_seed = curve::scalar_mul(&pre_seed, &secret_key.get_sk());

        let mut tree = self.tree.clone();
        let balance = tree.record(aggregator).unwrap().balance;
        let aggregator_witness = AggregatorWitness {
            index: aggregator,
            pre_seed,
            post_seed,
            secret_key,
            balance,
            proof: tree.proof(aggregator).unwrap(),
        };
        tree.set_balance(aggregator, balance + self.params.aggregator_reward())
            .unwrap();

        let mut witnesses = Vec::new();
        for index in validators {
            let witness = self.attested(&tree, *index, &request, &block_hash);
            tree.set_balance(*index, witness.record.balance + self.params.validator_reward())
                .unwrap();
            witnesses.push(witness);
        }

        let inputs = AggregationInputs {
            pre_state_root: self.tree.root(),
            post_state_root: tree.root(),
            block_hash,
            request,
            validator_bits: ParticipationBitmask::from_indices(validators.iter().copied()).value(),
        };
        let witness = AggregationWitness {
            aggregator: aggregator_witness,
            validators: witnesses,
        };
        (inputs, witness)
    }

    pub fn attested_slashing(
        &mut self,
        attestors: &[u64],
        slashed: u64,
    ) -> (SlashingInputs, AttestedSlashingWitness) {
        let request = Fq::rand(&mut self.rng);
        let block_hash = Fq::rand(&mut self.rng);
        let evidence = Fq::rand(&mut self.rng);

        let attestors = attestors
            .iter()
            .map(|index| self.attested(&self.tree, *index, &request, &block_hash))
            .collect();
        let slashed = self.attested(&self.tree, slashed, &request, &evidence);

        let mut tree = self.tree.clone();
        tree.set_balance(slashed.index(), Fq::zero()).unwrap();
        let inputs = SlashingInputs {
            pre_state_root: self.tree.root(),
            post_state_root: tree.root(),
            request,
            block_hash,
        };
        (inputs, AttestedSlashingWitness { attestors, slashed })
    }

    /// With `same_block` the validator signs the transition block hash itself,
    /// which is not evidence of misbehaviour
    pub fn slashing(
        &mut self,
        validator: u64,
        slasher: u64,
        same_block: bool,
    ) -> (SlashingInputs, SlashingWitness) {
        let request = Fq::rand(&mut self.rng);
        let block_hash = Fq::rand(&mut self.rng);
        let evidence = if same_block {
            block_hash
        } else {
            Fq::rand(&mut self.rng)
        };

        let mut tree = self.tree.clone();
        let validator = self.attested(&tree, validator, &request, &evidence);
        tree.set_balance(validator.index(), Fq::zero()).unwrap();
        let slasher = tree.witness(slasher).unwrap();
        tree.set_balance(slasher.index(), slasher.record.balance + validator.record.balance)
            .unwrap();

        let inputs = SlashingInputs {
            pre_state_root: self.tree.root(),
            post_state_root: tree.root(),
            request,
            block_hash,
        };
        (inputs, SlashingWitness { validator, slasher })
    }
}
