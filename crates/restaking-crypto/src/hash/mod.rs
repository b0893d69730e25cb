mod poseidon;
pub use poseidon::{ALPHA, CAPACITY, FULL_ROUNDS, PARTIAL_ROUNDS, POSEIDON_CONFIG, RATE};

use crate::Fq;

use ark_crypto_primitives::sponge::{
    poseidon::PoseidonSponge, CryptographicSponge, FieldBasedCryptographicSponge,
};

/// A resettable streaming hash over field elements.
///
/// Values are buffered by [`write`](Self::write) and only compressed when
/// [`sum`](Self::sum) is called. The digest commits to the number of written
/// elements, so inputs of different arity never collide. `sum` leaves the
/// buffer untouched; callers hashing unrelated data must [`reset`](Self::reset)
/// in between.
#[derive(Clone, Default)]
pub struct HashAccumulator {
    buffer: Vec<Fq>,
}

impl HashAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards everything written since the last reset
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    pub fn write(&mut self, value: Fq) {
        self.buffer.push(value);
    }

    /// Writes each of the provided values in order
    pub fn write_all(&mut self, values: &[Fq]) {
        self.buffer.extend_from_slice(values);
    }

    /// Returns the digest of everything written since the last reset
    pub fn sum(&self) -> Fq {
        let mut input = Vec::with_capacity(self.buffer.len() + 1);
        input.push(Fq::from(self.buffer.len() as u64));
        input.extend_from_slice(&self.buffer);

        let mut sponge = PoseidonSponge::<Fq>::new(&*POSEIDON_CONFIG);
        sponge.absorb(&input);
        sponge.squeeze_native_field_elements(1)[0]
    }

    /// Resets the accumulator, writes `values` and returns their digest
    pub fn hash(&mut self, values: &[Fq]) -> Fq {
        self.reset();
        self.write_all(values);
        self.sum()
    }
}

/// One-shot digest of `values`
pub fn hash(values: &[Fq]) -> Fq {
    HashAccumulator::new().hash(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::Zero;

    #[test]
    fn sum_does_not_reset() {
        let mut h = HashAccumulator::new();
        h.write(Fq::from(1u64));
        h.write(Fq::from(2u64));
        let first = h.sum();
        assert_eq!(first, h.sum());

        h.write(Fq::from(3u64));
        assert_ne!(first, h.sum());

        h.reset();
        h.write(Fq::from(1u64));
        h.write(Fq::from(2u64));
        assert_eq!(first, h.sum());
    }

    #[test]
    fn arity_is_committed() {
        let one = hash(&[Fq::from(7u64)]);
        let two = hash(&[Fq::from(7u64), Fq::zero()]);
        assert_ne!(one, two);
        assert_ne!(hash(&[]), hash(&[Fq::zero()]));
    }

    #[test]
    fn order_matters() {
        let a = Fq::from(11u64);
        let b = Fq::from(13u64);
        assert_ne!(hash(&[a, b]), hash(&[b, a]));
    }
}
