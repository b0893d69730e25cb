use crate::Fq;

use ark_crypto_primitives::sponge::poseidon::{find_poseidon_ark_and_mds, PoseidonConfig};
use ark_ff::PrimeField;
use once_cell::sync::Lazy;

/// Number of field elements absorbed per permutation
pub const RATE: usize = 2;
/// Number of field elements kept out of reach of the absorb/squeeze interface
pub const CAPACITY: usize = 1;
/// S-box exponent
pub const ALPHA: u64 = 5;
pub const FULL_ROUNDS: usize = 8;
pub const PARTIAL_ROUNDS: usize = 57;

/// Poseidon parameters shared by the native accumulator and its in-circuit
/// counterpart. Round constants and the MDS matrix come from the Grain LFSR.
pub static POSEIDON_CONFIG: Lazy<PoseidonConfig<Fq>> = Lazy::new(|| {
    let (ark, mds) = find_poseidon_ark_and_mds::<Fq>(
        Fq::MODULUS_BIT_SIZE as u64,
        RATE,
        FULL_ROUNDS as u64,
        PARTIAL_ROUNDS as u64,
        0,
    );
    PoseidonConfig {
        full_rounds: FULL_ROUNDS,
        partial_rounds: PARTIAL_ROUNDS,
        alpha: ALPHA,
        ark,
        mds,
        rate: RATE,
        capacity: CAPACITY,
    }
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dimensions() {
        let config = &*POSEIDON_CONFIG;
        assert_eq!(config.ark.len(), FULL_ROUNDS + PARTIAL_ROUNDS);
        assert!(config.ark.iter().all(|row| row.len() == RATE + CAPACITY));
        assert_eq!(config.mds.len(), RATE + CAPACITY);
    }
}
