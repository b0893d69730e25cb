use crate::{
    curve::{alloc_point, generator_var},
    Bool, FqVar, HashAccumulatorVar, PointVar,
};

use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{Namespace, SynthesisError};
use restaking_crypto::{curve, Fq, Signature};
use std::borrow::Borrow;
use tracing::{span, trace, Level};

/// An allocated signature. The response `s` is carried as a native field
/// element, which is lossless because the scalar modulus is the smaller one.
#[derive(Clone)]
pub struct SignatureVar {
    pub r: PointVar,
    pub s: FqVar,
}

impl AllocVar<Signature, Fq> for SignatureVar {
    fn new_variable<T: Borrow<Signature>>(
        cs: impl Into<Namespace<Fq>>,
        f: impl FnOnce() -> Result<T, SynthesisError>,
        mode: AllocationMode,
    ) -> Result<Self, SynthesisError> {
        let ns = cs.into();
        let cs = ns.cs();
        let signature = f().map(|s| *s.borrow());
        let r = alloc_point(cs.clone(), || signature.map(|s| *s.r()), mode)?;
        let s = FqVar::new_variable(cs, || signature.map(|s| curve::from_scalar(s.s())), mode)?;
        Ok(Self { r, s })
    }
}

/// EdDSA Signature Verification Gadget.
///
/// Enforces `G·s == R + A·c` with the Poseidon challenge
/// `c = H(R.x, R.y, A.x, A.y, m)`, exactly as the native verifier does.
pub struct EddsaVerifyGadget;

impl EddsaVerifyGadget {
    pub fn verify(
        hasher: &mut HashAccumulatorVar,
        public_key: &PointVar,
        message: &FqVar,
        signature: &SignatureVar,
    ) -> Result<(), SynthesisError> {
        Self::conditional_verify(hasher, public_key, message, signature, &Bool::TRUE)
    }

    /// Enforces the verification equation only when `should_enforce` is set.
    /// The challenge and both sides are computed regardless.
    #[tracing::instrument(target = "r1cs", skip_all)]
    pub fn conditional_verify(
        hasher: &mut HashAccumulatorVar,
        public_key: &PointVar,
        message: &FqVar,
        signature: &SignatureVar,
        should_enforce: &Bool,
    ) -> Result<(), SynthesisError> {
        let span = span!(Level::TRACE, "EddsaVerifyGadget_verify");
        let _enter = span.enter();

        let c = hasher.hash(&[
            signature.r.x.clone(),
            signature.r.y.clone(),
            public_key.x.clone(),
            public_key.y.clone(),
            message.clone(),
        ])?;

        trace!("enforcing verification equation");
        let lhs = generator_var().scalar_mul_le(signature.s.to_bits_le()?.iter())?;
        let rhs = crate::scalar_mul(public_key, &c)? + &signature.r;
        lhs.conditional_enforce_equal(&rhs, should_enforce)
    }
}
