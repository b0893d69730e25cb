use super::{challenge, PublicKey, Signature};
use crate::{curve, hash, Fq};

use ark_std::UniformRand;
use rand::Rng;
use std::fmt;

/// A signing key. The secret is a native field element so that the same key
/// can drive in-circuit scalar multiplications (e.g. seed rotation).
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    sk: Fq,
}

impl PrivateKey {
    pub fn generate<R: Rng>(rng: &mut R) -> PrivateKey {
        PrivateKey { sk: Fq::rand(rng) }
    }

    pub fn from_sk(sk: &Fq) -> PrivateKey {
        PrivateKey { sk: *sk }
    }

    pub fn get_sk(&self) -> Fq {
        self.sk
    }

    /// Signs the provided digest. The nonce is derived deterministically from
    /// the key and the message.
    pub fn sign(&self, message: &Fq) -> Signature {
        let nonce = curve::to_scalar(&hash::hash(&[self.sk, *message]));
        let r = curve::mul_generator(&curve::from_scalar(&nonce));
        let c = challenge(&r, &self.to_public(), message);
        let s = nonce + curve::to_scalar(&c) * curve::to_scalar(&self.sk);
        Signature::new(r, s)
    }

    pub fn to_public(&self) -> PublicKey {
        PublicKey::from(curve::mul_generator(&self.sk))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}
