use std::path::PathBuf;

use clap::Parser;
use eco_quiz::{Quiz, QuizConfig, QuizError, telemetry};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the questions from (defaults to the built-in bank)
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// TOML file with timing overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds allowed per question
    #[arg(short, long)]
    time_limit: Option<u32>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

async fn run(args: Args) -> Result<(), QuizError> {
    telemetry::init_tracing(args.log_file.as_deref())?;

    let mut config = match &args.config {
        Some(path) => QuizConfig::load(path)?,
        None => QuizConfig::default(),
    };
    if let Some(secs) = args.time_limit {
        config = config.with_time_limit(secs)?;
    }

    let quiz = match &args.questions {
        Some(path) => Quiz::from_json(path, config)?,
        None => Quiz::builtin(config)?,
    };
    quiz.run().await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
