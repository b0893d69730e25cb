//! # Restaking Cryptography
//!
//! This crate implements the native cryptographic collaborators of the restaking
//! account ledger: a streaming Poseidon hash accumulator over the BN254 scalar
//! field, EdDSA-style Schnorr signatures over the twisted Edwards curve embedded
//! in that field, and the handful of curve operations the ledger transitions need.

/// Keys and signatures
pub(crate) mod keys;
pub use keys::{Eddsa, PrivateKey, PublicKey, Signature, SignatureVerifier};

/// Streaming field hashing
pub mod hash;
pub use hash::{HashAccumulator, POSEIDON_CONFIG};

/// Byte oriented hash functions
pub mod hashers;
pub use hashers::{field_from_bytes, hash_to_field};

/// Curve helpers
pub mod curve;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use thiserror::Error;

/// The native field. Every balance, root, digest and request lives here.
pub type Fq = ark_ed_on_bn254::Fq;

/// The scalar field of the prime order subgroup of the curve.
pub type Fr = ark_ed_on_bn254::Fr;

/// Affine points of the embedded twisted Edwards curve
pub type Point = ark_ed_on_bn254::EdwardsAffine;

/// Convenience result alias
pub type CryptoResult<T> = std::result::Result<T, CryptoError>;

/// Domain separator for mapping external block hashes to the field
pub const BLOCK_DOMAIN: &[u8] = b"RSforblk";

/// Domain separator for mapping external request identifiers to the field
pub const REQUEST_DOMAIN: &[u8] = b"RSforreq";

#[derive(Debug, Error)]
/// Error type
pub enum CryptoError {
    /// Error
    #[error("signature verification failed")]
    VerificationFailed,
    /// The point does not satisfy the curve equation
    #[error("point is not on the curve")]
    InvalidPoint,
    /// Personalization string cannot be larger than 8 bytes
    #[error("domain length is too large: {0}")]
    DomainTooLarge(usize),
    #[error("{0}")]
    SerializationError(#[from] ark_serialize::SerializationError),
}
