use crate::{PrivateKey, PublicKey};

use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

// Same RNG for all tests
pub fn rng() -> XorShiftRng {
    XorShiftRng::seed_from_u64(0x5eed)
}

/// generate a keypair
pub fn keygen<R: rand::Rng>(rng: &mut R) -> (PrivateKey, PublicKey) {
    let secret_key = PrivateKey::generate(rng);
    let public_key = secret_key.to_public();
    (secret_key, public_key)
}

/// generate N keypairs
pub fn keygen_mul<R: rand::Rng>(rng: &mut R, num: usize) -> (Vec<PrivateKey>, Vec<PublicKey>) {
    let mut secret_keys = Vec::new();
    let mut public_keys = Vec::new();
    for _ in 0..num {
        let (secret_key, public_key) = keygen(rng);
        secret_keys.push(secret_key);
        public_keys.push(public_key);
    }
    (secret_keys, public_keys)
}
