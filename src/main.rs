use bfi::commands::run::{self, RunArgs};
use bfi::ExitStatus;
use clap::Parser;
use std::env;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Diagnostics go to stderr and stay quiet unless RUST_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    // argv[0] prefixes error messages and the usage text
    let program = env::args().next().unwrap_or_else(|| String::from("bf"));

    let args = match RunArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            run::print_usage(&program);
            return ExitStatus::InvalidArgs.into();
        }
    };

    run::run(&program, args).into()
}
