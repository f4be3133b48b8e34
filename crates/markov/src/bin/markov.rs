use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use markov::{
    BuildConfig, Chain, ChainError, ChainModel, Corpus, CorpusSnapshot, GenerateConfig,
    MarkovError, Transcript,
};
use tracing::{info, warn};

/// Build per-speaker Markov chains from a `>NAME` tagged transcript.
#[derive(Parser, Debug)]
#[command(name = "markov", author, version, about, long_about = None)]
struct Args {
    /// Tagged transcript to read.
    input: PathBuf,

    /// Where to write the chains (`.bin` for bincode, JSON otherwise).
    #[arg(default_value = "markov_chains.json")]
    output: PathBuf,

    /// Print every normalized transition matrix.
    #[arg(long)]
    dump: bool,

    /// Only dump / generate for this speaker.
    #[arg(long)]
    speaker: Option<String>,

    /// Generate up to N tokens per speaker.
    #[arg(long, value_name = "N")]
    generate: Option<usize>,

    /// Seed for generation.
    #[arg(long)]
    seed: Option<u64>,

    /// Build speakers one after another.
    #[arg(long)]
    sequential: bool,
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

    match run(args) {
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

fn run(args: Args) -> anyhow::Result<()> {
    println!("{} -> {}", args.input.display(), args.output.display());

    let transcript = Transcript::load(&args.input)?;
    let mut build = BuildConfig::from_env();
    if args.sequential {
        build.parallel = false;
    }
    let corpus = Corpus::build(transcript, &build)?;

    let selected: Vec<&ChainModel> = match &args.speaker {
        Some(name) => {
            let name = name.to_lowercase();
            let chain = corpus.get(&name).ok_or(MarkovError::UnknownSpeaker(name))?;
            vec![chain]
        }
        None => corpus.iter().collect(),
    };

    for chain in &selected {
        info!(speaker = chain.name(), "{}", chain.report());
    }

    if args.dump {
        for chain in &selected {
            println!("Graph for {}:", chain.name());
            print!("{}", chain.matrix());
        }
    }

    if let Some(n) = args.generate {
        let mut config = GenerateConfig::from_env();
        config.max_tokens = n;
        if let Some(seed) = args.seed {
            config.seed = seed;
        }
        let mut rng = config.rng();
        for chain in &selected {
            match chain.generate_text(chain.start_token(), config.max_tokens, &mut rng) {
                Ok(text) => println!("{}: {}", chain.name(), text),
                Err(ChainError::DegenerateRow { row }) => {
                    warn!(speaker = chain.name(), row, "nothing to generate from");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    CorpusSnapshot::capture(&corpus)
        .save(&args.output)
        .with_context(|| format!("saving chains to {}", args.output.display()))?;
    info!(speakers = corpus.len(), output = %args.output.display(), "chains written");
    Ok(())
}
