use super::{challenge, Signature};
use crate::{curve, CryptoError, CryptoResult, Fq, Point};

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use tracing::trace;

/// A public key on the embedded twisted Edwards curve
#[derive(Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct PublicKey(Point);

impl From<Point> for PublicKey {
    fn from(pk: Point) -> PublicKey {
        PublicKey(pk)
    }
}

impl AsRef<Point> for PublicKey {
    fn as_ref(&self) -> &Point {
        &self.0
    }
}

impl PublicKey {
    pub fn x(&self) -> Fq {
        self.0.x
    }

    pub fn y(&self) -> Fq {
        self.0.y
    }

    /// Checks `G·s == R + A·c` for the challenge `c` over the provided digest
    pub fn verify(&self, message: &Fq, signature: &Signature) -> CryptoResult<()> {
        if !curve::is_on_curve(signature.r()) || !curve::is_on_curve(&self.0) {
            trace!("signature or key off the curve");
            return Err(CryptoError::InvalidPoint);
        }
        let c = challenge(signature.r(), self, message);
        let lhs = curve::mul_generator(&curve::from_scalar(signature.s()));
        let rhs = curve::add(signature.r(), &curve::scalar_mul(&self.0, &c));
        if lhs == rhs {
            Ok(())
        } else {
            Err(CryptoError::VerificationFailed)
        }
    }
}
