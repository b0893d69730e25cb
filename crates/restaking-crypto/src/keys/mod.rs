/// Implements Schnorr signatures in the EdDSA style over the twisted Edwards
/// curve embedded in the BN254 scalar field, with a Poseidon challenge so that
/// verification stays cheap inside a constraint system.
mod secret;
pub use secret::PrivateKey;

mod public;
pub use public::PublicKey;

mod signature;
pub use signature::Signature;

use crate::Fq;

/// Verifies a signature over a single field digest.
pub trait SignatureVerifier {
    fn verify(&self, public_key: &PublicKey, message: &Fq, signature: &Signature) -> bool;
}

/// The signature scheme used by the ledger
#[derive(Clone, Copy, Debug, Default)]
pub struct Eddsa;

impl SignatureVerifier for Eddsa {
    fn verify(&self, public_key: &PublicKey, message: &Fq, signature: &Signature) -> bool {
        public_key.verify(message, signature).is_ok()
    }
}

/// Challenge `H(R.x, R.y, A.x, A.y, m)` binding the nonce commitment, the
/// signer and the message.
pub(crate) fn challenge(r: &crate::Point, public_key: &PublicKey, message: &Fq) -> Fq {
    crate::hash::hash(&[r.x, r.y, public_key.x(), public_key.y(), *message])
}
