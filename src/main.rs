use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use radcalc::{Calculator, config::Config, parse, storage::FileStore};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// radcalc is a calculator for decimal, hexadecimal, octal and binary
/// arithmetic with persistent variables.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory saved profiles are read from and written to. Defaults to
    /// $RADCALC_HOME or the platform config directory.
    #[arg(short, long)]
    storage: Option<PathBuf>,

    /// Profile to load before evaluating anything.
    #[arg(short, long)]
    profile: Option<String>,

    /// Compute assignments without storing them.
    #[arg(short, long)]
    dry_run: bool,

    /// Expression to evaluate. Without one, lines are read from stdin.
    expression: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env())
                             .with_writer(io::stderr)
                             .init();

    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(root) = &args.storage {
        config = config.with_storage_root(root);
    }

    let store = FileStore::new(config.storage_root);
    debug!(root = %store.root().display(), "profile storage");
    let mut calculator = match &args.profile {
        Some(profile) => Calculator::with_profile(store, profile),
        None => Calculator::new(store),
    };

    if let Some(expression) = &args.expression {
        return if run_line(&mut calculator, expression, !args.dry_run) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    for line in io::stdin().lock().lines() {
        let Ok(line) = line else {
            eprintln!("Failed to read from stdin.");
            return ExitCode::FAILURE;
        };
        run_line(&mut calculator, &line, !args.dry_run);
    }
    ExitCode::SUCCESS
}

/// Evaluates one line and prints its result or error. Returns whether the
/// line succeeded.
fn run_line(calculator: &mut Calculator, line: &str, commit: bool) -> bool {
    let outcome = parse(line).map_err(radcalc::Error::from)
                             .and_then(|nodes| Ok(calculator.exec(&nodes, commit)?));
    match outcome {
        Ok(result) => {
            let mut stdout = io::stdout().lock();
            if !result.is_empty() {
                let _ = writeln!(stdout, "{result}");
            }
            let _ = stdout.flush();
            true
        },
        Err(e) => {
            eprintln!("{e}");
            false
        },
    }
}
