//! qbudget Demo Suite
//!
//! A variational eigensolver run under a resource budget:
//!
//! - **Ansatz**: Hartree–Fock-style prefix plus RY/CZ layers with symbolic
//!   parameters
//! - **Optimizer**: Adam on parameter-shift gradients from the session
//! - **Budget**: the run stops cleanly when the session reports
//!   `BudgetExceeded`, keeping the best energy seen
//!
//! ```ignore
//! use qbudget_adapter_sim::SimulatorBackend;
//! use qbudget_demos::{ansatz, hamiltonian, runner::VqeRunner};
//! use qbudget_estimate::SamplingSession;
//!
//! let h = hamiltonian::h2_hamiltonian();
//! let circuit = ansatz::hardware_efficient_ansatz(2, 1, &hamiltonian::H2_OCCUPIED)?;
//! let mut session = SamplingSession::new(SimulatorBackend::with_seed(7));
//! let result = VqeRunner::new("sc").run(&mut session, &h, &circuit, &[0.0; 4], |_, _| {})?;
//! ```

pub mod ansatz;
pub mod hamiltonian;
pub mod optimizer;
pub mod runner;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for demo operations.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(template) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        pb.set_style(template.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}
