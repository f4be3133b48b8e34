use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use tracing::info;

/// Strip stage directions from a play script and tag speaker lines with `>`.
#[derive(Parser, Debug)]
#[command(name = "preprocess", author, version, about, long_about = None)]
struct Args {
    /// Raw script to clean.
    input: PathBuf,

    /// Where to write the tagged transcript.
    #[arg(default_value = "preprocessed.txt")]
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(1);
        }
    };
    markov::logging::init();

    match run(&args) {
        Ok(()) => {
            println!("Done.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    info!(bytes = raw.len(), input = %args.input.display(), "read script");

    let cleaned = markov::clean(&raw)?;
    info!(lines = cleaned.lines().count(), "lines after speaker preprocessing");

    std::fs::write(&args.output, &cleaned)
        .with_context(|| format!("could not write {}", args.output.display()))?;
    info!(bytes = cleaned.len(), output = %args.output.display(), "wrote transcript");
    Ok(())
}
