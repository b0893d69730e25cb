use ark_ff::{BigInteger, Field, PrimeField, Zero};
use restaking_crypto::Fq;
use restaking_gadgets::POW_WIDTH;

/// Computes `base^exponent` the same way the constraint system does: the
/// exponent's canonical integer is scanned over `POW_WIDTH` bits, most
/// significant first, squaring before every bit but the first and keeping the
/// multiplied accumulator only where the bit is set.
pub fn pow<F: PrimeField>(base: F, exponent: F) -> F {
    let mut bits = exponent.into_bigint().to_bits_le();
    bits.resize(POW_WIDTH, false);

    let mut output = F::one();
    for (i, bit) in bits.iter().rev().enumerate() {
        if i != 0 {
            output.square_in_place();
        }
        if *bit {
            output *= base;
        }
    }
    output
}

/// The running sum of `2^index` over the validators processed by an
/// aggregation.
///
/// Since indices within one transition are distinct the sum is a bit set for
/// any index below the field's bit size. Larger indices wrap modulo the field
/// and are no longer recoverable through [`contains`](Self::contains).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParticipationBitmask(Fq);

impl ParticipationBitmask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_indices<I: IntoIterator<Item = u64>>(indices: I) -> Self {
        let mut bitmask = Self::new();
        indices.into_iter().for_each(|index| bitmask.insert(index));
        bitmask
    }

    /// Adds `2^index`
    pub fn insert(&mut self, index: u64) {
        self.0 += pow(Fq::from(2u64), Fq::from(index));
    }

    pub fn value(&self) -> Fq {
        self.0
    }

    pub fn contains(&self, index: u64) -> bool {
        index < u64::from(Fq::MODULUS_BIT_SIZE) && self.0.into_bigint().get_bit(index as usize)
    }

    /// The set bit positions, in increasing order
    pub fn indices(&self) -> Vec<u64> {
        self.0
            .into_bigint()
            .to_bits_le()
            .into_iter()
            .enumerate()
            .filter_map(|(i, bit)| if bit { Some(i as u64) } else { None })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<ParticipationBitmask> for Fq {
    fn from(bitmask: ParticipationBitmask) -> Fq {
        bitmask.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::UniformRand;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn pow_matches_field_pow() {
        let rng = &mut XorShiftRng::seed_from_u64(11);
        for exponent in [0u64, 1, 2, 7, 64, 253, 1000] {
            let base = Fq::rand(rng);
            assert_eq!(pow(base, Fq::from(exponent)), base.pow([exponent]));
        }
        assert_eq!(pow(Fq::from(2u64), Fq::from(3u64)), Fq::from(8u64));
        assert_eq!(pow(Fq::zero(), Fq::zero()), Fq::from(1u64));
    }

    #[test]
    fn bitmask_tracks_indices() {
        let bitmask = ParticipationBitmask::from_indices(vec![1, 2, 5]);
        assert_eq!(bitmask.value(), Fq::from(38u64));
        assert_eq!(bitmask.indices(), vec![1, 2, 5]);
        assert!(bitmask.contains(5));
        assert!(!bitmask.contains(3));
        assert!(!bitmask.contains(400));
        assert!(ParticipationBitmask::new().is_empty());
    }

    #[test]
    fn insertion_order_is_irrelevant() {
        let a = ParticipationBitmask::from_indices(vec![9, 0, 130]);
        let b = ParticipationBitmask::from_indices(vec![130, 9, 0]);
        assert_eq!(a, b);
        assert!(a.contains(130));
    }
}
