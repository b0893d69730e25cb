use ark_ff::PrimeField;
use ark_r1cs_std::{fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::SynthesisError;

/// Number of exponent bits scanned by [`PowGadget::pow_var`]
pub const POW_WIDTH: usize = 256;

pub trait PowGadget<F: PrimeField> {
    /// Computes `self^exponent` by scanning the exponent bits most significant
    /// first, squaring the accumulator before every bit but the first and
    /// selecting the multiplied value when the bit is set.
    ///
    /// The bits are provided in *little-endian* order.
    fn pow_le_bits(&self, exponent_bits: &[Boolean<F>]) -> Result<FpVar<F>, SynthesisError>;

    /// Computes `self^exponent` over the full `POW_WIDTH` bit decomposition of
    /// the exponent.
    fn pow_var(&self, exponent: &FpVar<F>) -> Result<FpVar<F>, SynthesisError>;
}

impl<F: PrimeField> PowGadget<F> for FpVar<F> {
    #[tracing::instrument(target = "r1cs", skip(self, exponent_bits))]
    fn pow_le_bits(&self, exponent_bits: &[Boolean<F>]) -> Result<FpVar<F>, SynthesisError> {
        let mut output = FpVar::<F>::one();
        for (i, bit) in exponent_bits.iter().rev().enumerate() {
            if i != 0 {
                output = output.square()?;
            }
            let multiply = &output * self;
            output = bit.select(&multiply, &output)?;
        }
        Ok(output)
    }

    #[tracing::instrument(target = "r1cs", skip(self, exponent))]
    fn pow_var(&self, exponent: &FpVar<F>) -> Result<FpVar<F>, SynthesisError> {
        let mut bits = exponent.to_bits_le()?;
        bits.resize(POW_WIDTH, Boolean::constant(false));
        self.pow_le_bits(&bits)
    }
}
