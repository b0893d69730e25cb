use crate::{CryptoError, CryptoResult, Fq};

use ark_ff::PrimeField;
use blake2s_simd::Params;
use tracing::trace;

/// Maximum length of a BLAKE2s personalization string
pub const MAX_DOMAIN_LENGTH: usize = 8;

/// Interprets `bytes` as a little endian integer and reduces it modulo the
/// field order.
pub fn field_from_bytes(bytes: &[u8]) -> Fq {
    Fq::from_le_bytes_mod_order(bytes)
}

/// Maps arbitrary bytes (e.g. an externally supplied 32 byte block hash) to
/// a field element by hashing them with a personalized BLAKE2s and reducing
/// the digest modulo the field order.
pub fn hash_to_field(domain: &[u8], message: &[u8]) -> CryptoResult<Fq> {
    if domain.len() > MAX_DOMAIN_LENGTH {
        return Err(CryptoError::DomainTooLarge(domain.len()));
    }
    let digest = Params::new()
        .hash_length(32)
        .personal(domain)
        .to_state()
        .update(message)
        .finalize();
    trace!(
        domain = %String::from_utf8_lossy(domain),
        len = message.len(),
        "mapped bytes to field"
    );
    Ok(field_from_bytes(digest.as_bytes()))
}
