#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use tsr_cli::args::{CliArgs, Command};
use tsr_cli::driver;
use tsr_cli::reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_MODULE_FAILURES: i32 = 1;

fn main() -> Result<()> {
    // TSR_LOG / TSR_LOG_FORMAT, see tracing_config.rs.
    tsr_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let reporter = Reporter::new(!args.no_color && std::io::stderr().is_terminal());

    let code = match &args.command {
        Command::Generate(generate) => {
            let report = driver::run_generate(generate, &cwd)?;
            if generate.out.is_none() {
                println!("{}", report.output);
            }
            if !report.outcome.failures.is_empty() {
                eprintln!("{}", reporter.render_failures(&report.outcome.failures));
            }
            eprintln!("{}", reporter.summary(&report.outcome));
            if report.outcome.failures.is_empty() {
                EXIT_SUCCESS
            } else {
                EXIT_MODULE_FAILURES
            }
        }
        Command::Inspect(inspect) => {
            let stdout_reporter = Reporter::new(!args.no_color && std::io::stdout().is_terminal());
            let report = driver::run_inspect(inspect, &cwd)?;
            for inspected in &report.types {
                println!("{}", stdout_reporter.format_type(inspected.id, &inspected.ty));
            }
            EXIT_SUCCESS
        }
    };

    std::process::exit(code);
}
