use crate::{Fr, Point};

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

/// A Schnorr signature: the nonce commitment `R` and the response `s`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Signature {
    r: Point,
    s: Fr,
}

impl Signature {
    pub fn new(r: Point, s: Fr) -> Self {
        Signature { r, s }
    }

    pub fn r(&self) -> &Point {
        &self.r
    }

    pub fn s(&self) -> &Fr {
        &self.s
    }
}
