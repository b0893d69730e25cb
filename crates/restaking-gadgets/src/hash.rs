use crate::FqVar;

use ark_crypto_primitives::sponge::{
    constraints::CryptographicSpongeVar, poseidon::constraints::PoseidonSpongeVar,
};
use ark_r1cs_std::fields::{fp::FpVar, FieldVar};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};
use restaking_crypto::{Fq, POSEIDON_CONFIG};

/// In-circuit counterpart of [`restaking_crypto::HashAccumulator`]. Digests
/// match the native accumulator for the same sequence of writes.
#[derive(Clone)]
pub struct HashAccumulatorVar {
    cs: ConstraintSystemRef<Fq>,
    buffer: Vec<FqVar>,
}

impl HashAccumulatorVar {
    pub fn new(cs: ConstraintSystemRef<Fq>) -> Self {
        Self {
            cs,
            buffer: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    pub fn write(&mut self, value: &FqVar) {
        self.buffer.push(value.clone());
    }

    pub fn write_all(&mut self, values: &[FqVar]) {
        self.buffer.extend_from_slice(values);
    }

    /// Constrains the digest of everything written since the last reset
    #[tracing::instrument(target = "r1cs", skip(self))]
    pub fn sum(&self) -> Result<FqVar, SynthesisError> {
        let mut input = Vec::with_capacity(self.buffer.len() + 1);
        input.push(FpVar::constant(Fq::from(self.buffer.len() as u64)));
        input.extend_from_slice(&self.buffer);

        let mut sponge = PoseidonSpongeVar::<Fq>::new(self.cs.clone(), &*POSEIDON_CONFIG);
        sponge.absorb(&input)?;
        let mut out = sponge.squeeze_field_elements(1)?;
        Ok(out.remove(0))
    }

    /// Resets the accumulator, writes `values` and constrains their digest
    pub fn hash(&mut self, values: &[FqVar]) -> Result<FqVar, SynthesisError> {
        self.reset();
        self.write_all(values);
        self.sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_r1cs_std::prelude::*;
    use ark_relations::r1cs::ConstraintSystem;
    use ark_ff::UniformRand;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;
    use restaking_crypto::HashAccumulator;

    #[test]
    fn matches_native() {
        let rng = &mut XorShiftRng::seed_from_u64(0);
        for arity in 0..5 {
            let values = (0..arity).map(|_| Fq::rand(rng)).collect::<Vec<_>>();
            let native = HashAccumulator::new().hash(&values);

            let cs = ConstraintSystem::<Fq>::new_ref();
            let vars = values
                .iter()
                .map(|v| FqVar::new_witness(cs.clone(), || Ok(*v)).unwrap())
                .collect::<Vec<_>>();
            let mut hasher = HashAccumulatorVar::new(cs.clone());
            let digest = hasher.hash(&vars).unwrap();

            assert_eq!(digest.value().unwrap(), native);
            assert!(cs.is_satisfied().unwrap());
        }
    }

    #[test]
    fn streaming_writes() {
        let cs = ConstraintSystem::<Fq>::new_ref();
        let a = FqVar::new_witness(cs.clone(), || Ok(Fq::from(1u64))).unwrap();
        let b = FqVar::new_witness(cs.clone(), || Ok(Fq::from(2u64))).unwrap();
        let mut hasher = HashAccumulatorVar::new(cs.clone());
        hasher.write(&a);
        hasher.write(&b);
        let streamed = hasher.sum().unwrap();

        let native = HashAccumulator::new().hash(&[Fq::from(1u64), Fq::from(2u64)]);
        assert_eq!(streamed.value().unwrap(), native);
    }
}
