use crate::{Fq, Fr, Point};

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInteger, PrimeField};

/// The fixed generator of the prime order subgroup
pub fn generator() -> Point {
    Point::generator()
}

/// Multiplies `point` by the canonical integer representation of `scalar`.
///
/// This matches an in-circuit double-and-add over the little endian bits of a
/// native field element, so the native and constrained results agree even
/// when the scalar exceeds the subgroup order.
pub fn scalar_mul(point: &Point, scalar: &Fq) -> Point {
    point.mul_bigint(scalar.into_bigint()).into_affine()
}

/// Computes `G·scalar` for the fixed generator `G`
pub fn mul_generator(scalar: &Fq) -> Point {
    scalar_mul(&generator(), scalar)
}

pub fn is_on_curve(point: &Point) -> bool {
    point.is_on_curve()
}

/// Reduces a native field element into the scalar field
pub fn to_scalar(value: &Fq) -> Fr {
    Fr::from_le_bytes_mod_order(&value.into_bigint().to_bytes_le())
}

/// Lifts a scalar into the native field. The scalar modulus is smaller than the
/// native one, so this never wraps.
pub fn from_scalar(value: &Fr) -> Fq {
    Fq::from_le_bytes_mod_order(&value.into_bigint().to_bytes_le())
}

/// Adds two affine points
pub fn add(a: &Point, b: &Point) -> Point {
    (a.into_group() + b.into_group()).into_affine()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{One, UniformRand};
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    #[test]
    fn scalar_mul_is_homomorphic() {
        let rng = &mut XorShiftRng::seed_from_u64(7);
        // small scalars never wrap, so the sum is taken over the integers
        let a = Fq::from(rng.gen::<u64>());
        let b = Fq::from(rng.gen::<u64>());
        assert_eq!(
            mul_generator(&(a + b)),
            add(&mul_generator(&a), &mul_generator(&b))
        );

        // a + b may wrap modulo the native field, which is not a multiple of the
        // subgroup order, so compare through the scalar field instead
        let a = Fq::rand(rng);
        let b = Fq::rand(rng);
        let rhs = add(&mul_generator(&a), &mul_generator(&b));
        let expected = mul_generator(&from_scalar(&(to_scalar(&a) + to_scalar(&b))));
        assert_eq!(rhs, expected);
    }

    #[test]
    fn generator_times_one() {
        assert_eq!(mul_generator(&Fq::one()), generator());
    }

    #[test]
    fn detects_points_off_curve() {
        let g = generator();
        assert!(is_on_curve(&g));
        assert!(!is_on_curve(&Point::new_unchecked(g.x, g.y + Fq::one())));
    }
}
