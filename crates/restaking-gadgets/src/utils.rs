/// Returns the low `length` bits of `value` in *little-endian* order
pub fn u64_to_bits_le(value: u64, length: usize) -> Vec<bool> {
    (0..length)
        .map(|i| i < 64 && (value >> i) & 1 == 1)
        .collect()
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use ark_ff::Field;
    use ark_relations::r1cs::{ConstraintLayer, ConstraintSystemRef};
    use tracing_subscriber::layer::SubscriberExt;

    /// Prints the name of the first unsatisfied constraint, if any
    pub fn print_unsatisfied_constraints<F: Field>(cs: ConstraintSystemRef<F>) {
        if let Ok(Some(name)) = cs.which_is_unsatisfied() {
            println!("unsatisfied: {}", name);
        }
    }

    /// Runs `f` with constraint tracing enabled so that unsatisfied constraints
    /// are reported with their gadget path
    pub fn run_profile_constraints<T>(f: impl FnOnce() -> T) -> T {
        let layer = ConstraintLayer::default();
        let subscriber = tracing_subscriber::Registry::default().with(layer);
        tracing::subscriber::with_default(subscriber, f)
    }
}
