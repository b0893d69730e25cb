use crate::{FqVar, PointVar};

use ark_ec::{twisted_edwards::TECurveConfig, AffineRepr};
use ark_ed_on_bn254::EdwardsConfig;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{Namespace, SynthesisError};
use restaking_crypto::{curve::generator, Fq, Point};
use std::borrow::Borrow;

/// The fixed generator as a constant
pub fn generator_var() -> PointVar {
    PointVar::constant(generator().into_group())
}

/// Multiplies `point` by the canonical integer behind `scalar`
#[tracing::instrument(target = "r1cs", skip(point, scalar))]
pub fn scalar_mul(point: &PointVar, scalar: &FqVar) -> Result<PointVar, SynthesisError> {
    let bits = scalar.to_bits_le()?;
    point.scalar_mul_le(bits.iter())
}

/// Allocates the coordinates of `point` with the given mode and enforces that
/// they satisfy the curve equation. Unlike `PointVar::new_variable` this does
/// not restrict the point to the prime order subgroup, and public points keep
/// their own coordinates as instance values.
pub fn alloc_point<T: Borrow<Point>>(
    cs: impl Into<Namespace<Fq>>,
    f: impl FnOnce() -> Result<T, SynthesisError>,
    mode: AllocationMode,
) -> Result<PointVar, SynthesisError> {
    let ns = cs.into();
    let cs = ns.cs();
    let point = f().map(|p| *p.borrow());
    let x = FqVar::new_variable(cs.clone(), || point.map(|p| p.x), mode)?;
    let y = FqVar::new_variable(cs, || point.map(|p| p.y), mode)?;
    let point = PointVar::new(x, y);
    enforce_on_curve(&point)?;
    Ok(point)
}

/// Enforces `a·x^2 + y^2 = 1 + d·x^2·y^2`
pub fn enforce_on_curve(point: &PointVar) -> Result<(), SynthesisError> {
    let x2 = point.x.square()?;
    let y2 = point.y.square()?;
    let lhs = &x2 * EdwardsConfig::COEFF_A + &y2;
    let rhs = FqVar::one() + &(&x2 * &y2) * EdwardsConfig::COEFF_D;
    lhs.enforce_equal(&rhs)
}
