//! # Restaking Gadgets
//!
//! This module provides gadgets for constructing R1CS over the BN254 scalar
//! field for the restaking account ledger: Poseidon hashing, Merkle path
//! recomputation, EdDSA verification over the embedded twisted Edwards curve,
//! and the square-and-multiply exponentiation behind the participation bitmask.

use ark_r1cs_std::{boolean::Boolean, fields::fp::FpVar};
use restaking_crypto::Fq;

/// Field variables over the native field
pub type FqVar = FpVar<Fq>;

/// Booleans over the native field
pub type Bool = Boolean<Fq>;

/// Points of the embedded curve
pub type PointVar = ark_ed_on_bn254::constraints::EdwardsVar;

mod pow;
pub use pow::{PowGadget, POW_WIDTH};

mod hash;
pub use hash::HashAccumulatorVar;

mod merkle;
pub use merkle::MerkleProofVar;

mod eddsa;
pub use eddsa::{EddsaVerifyGadget, SignatureVar};

mod curve;
pub use curve::{alloc_point, enforce_on_curve, generator_var, scalar_mul};

/// Utility functions which do not involve generating constraints
pub mod utils;
