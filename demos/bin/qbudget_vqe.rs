//! Budgeted VQE Demo
//!
//! Minimizes the energy of a Pauli-sum Hamiltonian on a simulated noisy
//! device, stopping early if the circuit-time or wall-time budget runs out.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use qbudget_adapter_sim::SimulatorBackend;
use qbudget_demos::ansatz::{hardware_efficient_ansatz, num_parameters};
use qbudget_demos::hamiltonian::{
    H2_GROUND_STATE_ENERGY, H2_OCCUPIED, h2_hamiltonian, load_operator, required_qubits,
};
use qbudget_demos::runner::{StopReason, VqeRunner};
use qbudget_demos::{
    create_progress_bar, print_header, print_info, print_result, print_section, print_success,
    print_warning,
};
use qbudget_estimate::{SamplingSession, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "qbudget-vqe")]
#[command(about = "Run VQE under a circuit-time and wall-time budget")]
struct Args {
    /// Hardware class (sc, it)
    #[arg(long, default_value = "sc")]
    hardware: String,

    /// Number of shots per energy evaluation
    #[arg(short, long, default_value = "1024")]
    shots: u64,

    /// Number of ansatz repetitions
    #[arg(short, long, default_value = "1")]
    reps: usize,

    /// Maximum optimization iterations
    #[arg(short, long, default_value = "30")]
    iterations: usize,

    /// Adam learning rate
    #[arg(long, default_value = "0.1")]
    learning_rate: f64,

    /// Stop when successive energies differ by less than this
    #[arg(long, default_value = "0.0")]
    tol: f64,

    /// Seed for the simulator and the initial parameters
    #[arg(long)]
    seed: Option<u64>,

    /// Sample without noise (time is still charged)
    #[arg(long)]
    noiseless: bool,

    /// Session configuration file (YAML)
    #[arg(short, long, env = "QBUDGET_CONFIG")]
    config: Option<PathBuf>,

    /// Operator file (JSON list of {pauli, re, im}); defaults to H2
    #[arg(long)]
    operator: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = SessionConfig::load(args.config.as_deref()).context("loading configuration")?;

    // Setup logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    print_header("Budgeted VQE Demo");

    let (operator, occupied, exact) = match &args.operator {
        Some(path) => (load_operator(path)?, Vec::new(), None),
        None => (
            h2_hamiltonian(),
            H2_OCCUPIED.to_vec(),
            Some(H2_GROUND_STATE_ENERGY),
        ),
    };
    let n_qubits = required_qubits(&operator);
    let ansatz = hardware_efficient_ansatz(n_qubits, args.reps, &occupied)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let initial: Vec<f64> = (0..num_parameters(n_qubits, args.reps))
        .map(|_| rng.gen_range(-0.1..0.1))
        .collect();

    print_section("Problem Setup");
    print_result("Hardware", &args.hardware);
    print_result("Qubits", n_qubits);
    print_result("Hamiltonian terms", operator.len());
    print_result("Parameters", initial.len());
    print_result("Shots per estimate", args.shots);
    print_result(
        "Budget",
        format!(
            "{} s circuit time, {} s wall time",
            config.limits.max_circuit_time, config.limits.max_wall_time
        ),
    );
    print_result("Allocation", config.allocation.policy);
    print_result("Grouping", config.grouping);
    if let Some(exact) = exact {
        print_result("Exact ground state", format!("{exact:.6} Hartree"));
    }

    let backend = match args.seed {
        Some(seed) => SimulatorBackend::with_seed(seed),
        None => SimulatorBackend::new(),
    };
    let mut session = SamplingSession::with_config(backend, &config)?;
    if args.noiseless {
        session = session.noiseless();
    }

    print_section("Running VQE Optimization");
    let runner = VqeRunner::new(args.hardware.clone())
        .with_shots(args.shots)
        .with_maxiter(args.iterations)
        .with_tol(args.tol)
        .with_learning_rate(args.learning_rate);

    let pb = create_progress_bar(args.iterations as u64, "Optimizing...");
    let result = runner.run(&mut session, &operator, &ansatz, &initial, |_, energy| {
        pb.inc(1);
        pb.set_message(format!("E = {energy:.6}"));
    })?;
    pb.finish_with_message("Optimization finished");

    print_section("Results");
    if result.iterations == 0 {
        print_warning("No iteration completed within the budget");
    } else {
        print_result(
            "Best energy",
            format!("{:.6} ± {:.6}", result.best_energy, result.best_error),
        );
        if let Some(exact) = exact {
            print_result(
                "Absolute error",
                format!("{:.6} Hartree", (result.best_energy - exact).abs()),
            );
        }
        let params: Vec<String> = result.best_params.iter().map(|p| format!("{p:.4}")).collect();
        print_result("Best parameters", format!("[{}]", params.join(", ")));
    }
    print_result("Iterations", result.iterations);

    print_section("Resources");
    print_result("Jobs", result.ledger.total_jobs);
    print_result("Shots", result.ledger.total_shots);
    print_result(
        "Circuit time",
        format!("{:.3} s", result.ledger.total_circuit_time),
    );
    print_result("Wall time", format!("{:.3} s", result.ledger.wall_time));

    println!();
    match &result.stop_reason {
        StopReason::BudgetExceeded(reason) => {
            print_warning(&format!("Stopped early: {reason}"));
            print_info("Raise the limits in the config file or QBUDGET_MAX_* variables");
        }
        StopReason::Converged => print_success("VQE converged"),
        StopReason::MaxIterations => print_success("VQE demo complete!"),
    }

    Ok(())
}
