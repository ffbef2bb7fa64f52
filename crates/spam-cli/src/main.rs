use std::{
    collections::HashMap,
    io::Read,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use mimalloc::MiMalloc;
use spam_inference::{Label, Prediction, Scorer, DEFAULT_THRESHOLD};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Texts scored per progress-bar tick in batch mode.
const BATCH_CHUNK_SIZE: usize = 256;

#[derive(Parser)]
#[command(name = "spam-cli")]
#[command(about = "Classify text as spam or ham", long_about = None)]
struct Cli {
    /// Text to score (if not provided, reads from stdin)
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Read text from file
    #[arg(short, long, value_name = "PATH", conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Batch process texts (one per line)
    #[arg(short, long, value_name = "PATH", conflicts_with_all = ["text", "file"])]
    batch: Option<PathBuf>,

    /// Batch process from JSON array
    #[arg(long, value_name = "PATH", conflicts_with_all = ["text", "file", "batch"])]
    batch_json: Option<PathBuf>,

    /// Classifier artifact
    #[arg(
        long,
        env = "SPAM_MODEL_PATH",
        default_value = "model_artifacts/spam_classifier.json"
    )]
    model_path: PathBuf,

    /// Vectorizer artifact (.json or bincode)
    #[arg(
        long,
        env = "SPAM_VECTORIZER_PATH",
        default_value = "model_artifacts/tfidf_vectorizer.json"
    )]
    vectorizer_path: PathBuf,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "probability")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode (detailed output)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Spam threshold; texts with P(spam) >= threshold are flagged
    #[arg(short = 't', long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Custom class labels (comma-separated: label0,label1)
    #[arg(long, value_name = "HAM,SPAM", value_parser = parse_labels, default_value = "ham,spam")]
    labels: [String; 2],
}

/// Parse `label0,label1` into exactly two non-empty names.
fn parse_labels(raw: &str) -> Result<[String; 2], String> {
    let names: Vec<&str> = raw.split(',').map(str::trim).collect();
    match names.as_slice() {
        [ham, spam] if !ham.is_empty() && !spam.is_empty() => {
            Ok([(*ham).to_owned(), (*spam).to_owned()])
        }
        _ => Err(format!(
            "expected two comma-separated labels (e.g. ham,spam), got `{raw}`"
        )),
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Output just the class (0 = ham, 1 = spam)
    Class,
    /// Output spam probability as a float 0-1 (default)
    Probability,
    /// Output as JSON
    Json,
    /// Human-readable output with confidence
    Human,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (_, true) => Self::Verbose,
            _ => Self::Normal,
        }
    }

    fn log_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum InputSource {
    Single(String),
    Batch(Vec<String>),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    init_tracing(verbosity);

    let input_source = determine_input_source(&cli)?;

    let start = Instant::now();
    let scorer = Scorer::from_paths(&cli.model_path, &cli.vectorizer_path).with_context(|| {
        format!(
            "Failed to load artifacts (model: {}, vectorizer: {})",
            cli.model_path.display(),
            cli.vectorizer_path.display()
        )
    })?;
    if verbosity == Verbosity::Verbose {
        eprintln!("Artifacts loaded in {:?}", start.elapsed());
    }

    match input_source {
        InputSource::Single(text) => {
            let start = Instant::now();
            let prediction = scorer.score(&text, cli.threshold)?;
            if verbosity == Verbosity::Verbose {
                eprintln!("Inference time: {:?}", start.elapsed());
            }
            println!("{}", render(&prediction, cli.format, &cli.labels)?);
        }
        InputSource::Batch(texts) => {
            let predictions = process_batch(&scorer, &texts, &cli, verbosity)?;
            for line in render_batch(&predictions, cli.format, &cli.labels)? {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Determine input source from CLI args
fn determine_input_source(cli: &Cli) -> Result<InputSource> {
    // Priority: text arg > file > batch > batch_json > stdin
    if let Some(text) = &cli.text {
        return Ok(InputSource::Single(text.clone()));
    }

    if let Some(path) = &cli.file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        return Ok(InputSource::Single(text));
    }

    if let Some(path) = &cli.batch {
        return read_line_batch(path).map(InputSource::Batch);
    }

    if let Some(path) = &cli.batch_json {
        return read_json_batch(path).map(InputSource::Batch);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(InputSource::Single(buffer))
}

fn read_line_batch(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file: {}", path.display()))?;
    Ok(contents.lines().map(String::from).collect())
}

fn read_json_batch(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON batch file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON array in {}", path.display()))
}

fn process_batch(
    scorer: &Scorer,
    texts: &[String],
    cli: &Cli,
    verbosity: Verbosity,
) -> Result<Vec<Prediction>> {
    let show_progress = verbosity != Verbosity::Quiet
        && texts.len() > BATCH_CHUNK_SIZE
        && cli.format != OutputFormat::Json;

    let progress = if show_progress {
        let bar = ProgressBar::new(texts.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} texts [{elapsed_precise}]")
                .context("Invalid progress bar template")?,
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let start = Instant::now();
    let mut predictions = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(BATCH_CHUNK_SIZE) {
        predictions.extend(scorer.score_batch(chunk, cli.threshold)?);
        progress.inc(chunk.len() as u64);
    }
    progress.finish_and_clear();

    debug!(num_texts = texts.len(), elapsed = ?start.elapsed(), "Batch scored");
    if verbosity == Verbosity::Verbose {
        eprintln!("Scored {} texts in {:?}", texts.len(), start.elapsed());
    }
    Ok(predictions)
}

fn label_name(label: Label, labels: &[String]) -> String {
    labels
        .get(i64::from(label) as usize)
        .cloned()
        .unwrap_or_else(|| label.to_string())
}

fn to_json(prediction: &Prediction, labels: &[String]) -> serde_json::Value {
    let label = prediction.label();
    serde_json::json!({
        "class": i64::from(label),
        "class_label": label_name(label, labels),
        "propensity": prediction.propensity(),
        "probabilities": labels
            .iter()
            .zip(prediction.probabilities())
            .map(|(name, prob)| (name.clone(), prob))
            .collect::<HashMap<_, _>>(),
    })
}

/// Render one prediction in the requested format.
fn render(prediction: &Prediction, format: OutputFormat, labels: &[String]) -> Result<String> {
    let label = prediction.label();
    Ok(match format {
        OutputFormat::Class => i64::from(label).to_string(),
        OutputFormat::Probability => format!("{:.4}", prediction.propensity()),
        OutputFormat::Json => serde_json::to_string(&to_json(prediction, labels))?,
        OutputFormat::Human => {
            let confidence = prediction.probabilities()[i64::from(label) as usize] * 100.0;
            format!(
                "Result: {}\nConfidence: {confidence:.1}%",
                label_name(label, labels)
            )
        }
    })
}

/// JSON batches become a single array; every other format is one line per text.
fn render_batch(
    predictions: &[Prediction],
    format: OutputFormat,
    labels: &[String],
) -> Result<Vec<String>> {
    if format == OutputFormat::Json {
        let array: Vec<_> = predictions.iter().map(|p| to_json(p, labels)).collect();
        return Ok(vec![serde_json::to_string(&array)?]);
    }
    predictions
        .iter()
        .map(|prediction| render(prediction, format, labels))
        .collect()
}
