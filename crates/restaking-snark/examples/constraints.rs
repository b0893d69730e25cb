use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem, SynthesisMode};
use restaking_crypto::Fq;
use restaking_snark::{
    AggregationCircuit, AttestedSlashingCircuit, SlashingCircuit, TransitionParams,
    DEFAULT_BATCH_SIZE, DEFAULT_DEPTH,
};
use std::env;
use std::error::Error;

fn count<C: ConstraintSynthesizer<Fq>>(
    circuit: C,
) -> Result<(usize, usize, usize), Box<dyn Error>> {
    let cs = ConstraintSystem::new_ref();
    cs.set_mode(SynthesisMode::Setup);
    circuit.generate_constraints(cs.clone())?;
    Ok((
        cs.num_constraints(),
        cs.num_instance_variables(),
        cs.num_witness_variables(),
    ))
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let mut args = env::args();
    args.next(); // discard the program name
    let depth = match args.next() {
        Some(arg) => arg.parse()?,
        None => DEFAULT_DEPTH,
    };
    let batch_size = match args.next() {
        Some(arg) => arg.parse()?,
        None => DEFAULT_BATCH_SIZE,
    };
    let params = TransitionParams::new(depth, batch_size)?;

    let circuits = [
        ("aggregation", count(AggregationCircuit::empty(params.clone()))?),
        (
            "attested slashing",
            count(AttestedSlashingCircuit::empty(params.clone()))?,
        ),
        ("slashing", count(SlashingCircuit::empty(params))?),
    ];
    for (name, (constraints, instance, witness)) in circuits.iter() {
        println!(
            "{} (depth {}, batch {}): {} constraints, {} instance and {} witness variables",
            name, depth, batch_size, constraints, instance, witness,
        );
    }

    Ok(())
}
