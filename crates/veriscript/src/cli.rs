use std::{
    io::{self, BufRead, Read, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, ensure};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use veriscript_preprocessing::pre_processor::{
    DEFAULT_BUNDLE_URLS, LemmatizerMode, LinguisticResources, ResourceOptions,
};

use crate::{
    Analyzer, ArtifactConfig, Classifier, Label, LabelEncoding, LikelihoodSampler,
    MAX_INPUT_CHARS, MIN_ANALYSIS_CHARS, MIN_SCORE_CHARS, Thresholds, Tone, UniformSampler,
    Verdict,
};

const BAR_WIDTH: usize = 30;
const CLEAR_COMMAND: &str = ":clear";
const QUIT_COMMAND: &str = ":quit";

#[derive(Parser, Debug)]
#[command(name = "veriscript", version)]
#[command(about = "Detect AI-generated and mixed text", long_about = None)]
pub struct Cli {
    /// Text to analyze (if not provided, reads from stdin)
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    /// Read text from file
    #[arg(short, long, value_name = "PATH", conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Analyze several submissions, each ended by an empty line
    #[arg(short, long, conflicts_with_all = ["text", "file"])]
    pub interactive: bool,

    /// Trained ONNX classifier
    #[arg(long, env = "VERISCRIPT_MODEL", default_value = "model.onnx")]
    pub model: PathBuf,

    /// Fitted TF-IDF vectorizer (`.json` export or bincode `.bin`)
    #[arg(long, env = "VERISCRIPT_VECTORIZER", default_value = "vectorizer.json")]
    pub vectorizer: PathBuf,

    /// Directory holding the stopword and WordNet files
    #[arg(long, env = "VERISCRIPT_RESOURCES_DIR", value_name = "DIR")]
    pub resources_dir: Option<PathBuf>,

    /// Archives (`.tar.gz` bundle or NLTK `.zip` packages) downloaded when the
    /// resource files are missing (comma-separated)
    #[arg(
        long,
        env = "VERISCRIPT_RESOURCES_URL",
        value_name = "URL",
        value_delimiter = ',',
        default_values = DEFAULT_BUNDLE_URLS.iter().copied()
    )]
    pub resources_url: Vec<String>,

    /// Never download missing resource files
    #[arg(long)]
    pub offline: bool,

    /// Lemmatizer mode (any, noun); must match the mode the vectorizer was
    /// fitted with, or lemmas will miss the vocabulary
    #[arg(long, default_value_t = LemmatizerMode::AnyPos)]
    pub lemmatizer: LemmatizerMode,

    /// Labels for class codes 0, 1 and 2 (comma-separated)
    #[arg(long, value_delimiter = ',', num_args = 3, default_values = ["ai", "human", "mixed"])]
    pub labels: Vec<Label>,

    /// Minimum text length to analyze
    #[arg(long, default_value_t = MIN_ANALYSIS_CHARS)]
    pub min_chars: usize,

    /// Minimum text length for showing an AI likelihood
    #[arg(long, default_value_t = MIN_SCORE_CHARS)]
    pub min_score_chars: usize,

    /// Maximum text length to analyze
    #[arg(long, default_value_t = MAX_INPUT_CHARS)]
    pub max_chars: usize,

    /// ONNX Runtime intra-op threads
    #[arg(long, default_value_t = 1)]
    pub threads: usize,

    /// Seed for the AI likelihood draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Styled text with a likelihood bar
    Human,
    /// One JSON object per verdict
    Json,
}

impl Cli {
    fn resource_options(&self) -> ResourceOptions {
        let dir = self.resources_dir.clone().or_else(|| {
            dirs::data_dir().map(|data| data.join("veriscript").join("nltk_data"))
        });
        ResourceOptions {
            dir,
            urls: if self.offline {
                Vec::new()
            } else {
                self.resources_url.clone()
            },
            lemmatizer_mode: self.lemmatizer,
        }
    }

    fn artifact_config(&self) -> Result<ArtifactConfig> {
        let labels = LabelEncoding::try_from(self.labels.as_slice())
            .context("Invalid --labels")?;
        Ok(ArtifactConfig::new(&self.model, &self.vectorizer)
            .with_labels(labels)
            .with_intra_threads(self.threads))
    }

    fn thresholds(&self) -> Result<Thresholds> {
        ensure!(
            self.min_chars <= self.max_chars,
            "--min-chars ({}) exceeds --max-chars ({})",
            self.min_chars,
            self.max_chars
        );
        Ok(Thresholds {
            min_analysis_chars: self.min_chars,
            min_score_chars: self.min_score_chars,
            max_input_chars: self.max_chars,
        })
    }

    fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (_, true) => "debug",
            _ => "warn",
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-q`/`-v`.
pub fn init_tracing(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(io::stderr)
        .init();
}

pub fn run(cli: &Cli) -> Result<()> {
    let thresholds = cli.thresholds()?;
    let config = cli.artifact_config()?;

    let resources = LinguisticResources::prepare(&cli.resource_options());
    let analyzer = Analyzer::load(&config, resources)
        .with_context(|| {
            format!(
                "Failed to load model {} with vectorizer {}",
                config.model_path.display(),
                config.vectorizer_path.display()
            )
        })?
        .with_thresholds(thresholds);

    let mut sampler: Box<dyn LikelihoodSampler> = match cli.seed {
        Some(seed) => Box::new(UniformSampler::seeded(seed)),
        None => Box::new(UniformSampler::new()),
    };

    let stdout = io::stdout();
    if cli.interactive {
        info!("Interactive session started");
        return run_interactive(
            &analyzer,
            sampler.as_mut(),
            cli.format,
            io::stdin().lock(),
            stdout.lock(),
        );
    }

    let text = read_input(cli)?;
    let verdict = analyzer
        .analyze(&text, sampler.as_mut())
        .context("Failed to analyze the given text")?;
    render(&verdict, cli.format, &mut stdout.lock())
}

/// Priority: text arg > file > stdin
fn read_input(cli: &Cli) -> Result<String> {
    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }

    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer)
}

/// Read submissions from `input` until `:quit` or end of input. A submission
/// ends at an empty line; `:clear` drops what has been typed so far.
pub fn run_interactive<C, R, W>(
    analyzer: &Analyzer<C>,
    sampler: &mut dyn LikelihoodSampler,
    format: OutputFormat,
    input: R,
    mut output: W,
) -> Result<()>
where
    C: Classifier,
    R: BufRead,
    W: Write,
{
    if format == OutputFormat::Human {
        writeln!(
            output,
            "Enter text, then an empty line to analyze it ({CLEAR_COMMAND} to start over, {QUIT_COMMAND} to exit)."
        )?;
    }

    let mut buffer = String::new();
    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        match line.trim() {
            QUIT_COMMAND => {
                buffer.clear();
                break;
            }
            CLEAR_COMMAND => {
                buffer.clear();
                debug!("Submission cleared");
            }
            "" => {
                if !buffer.is_empty() {
                    submit(analyzer, sampler, format, &buffer, &mut output)?;
                    buffer.clear();
                }
            }
            _ => {
                buffer.push_str(&line);
                buffer.push('\n');
            }
        }
    }

    if !buffer.is_empty() {
        submit(analyzer, sampler, format, &buffer, &mut output)?;
    }
    Ok(())
}

fn submit<C: Classifier, W: Write>(
    analyzer: &Analyzer<C>,
    sampler: &mut dyn LikelihoodSampler,
    format: OutputFormat,
    text: &str,
    output: &mut W,
) -> Result<()> {
    let verdict = analyzer
        .analyze(text, sampler)
        .context("Failed to analyze submission")?;
    render(&verdict, format, output)?;
    output.flush()?;
    Ok(())
}

/// Filled portion of a `width`-wide bar for a percentage.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn likelihood_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

fn render<W: Write>(verdict: &Verdict, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string(verdict)?)?;
        }
        OutputFormat::Human => {
            let prefix = match verdict.tone() {
                Tone::Success => "ok",
                Tone::Error => "alert",
                Tone::Warning => "warning",
            };
            writeln!(out, "{prefix}: {}", verdict.message())?;
            if let Some(likelihood) = verdict.ai_likelihood() {
                writeln!(out, "AI likelihood: {likelihood:.1} %")?;
                writeln!(out, "[{}]", likelihood_bar(likelihood, BAR_WIDTH))?;
            }
            if let Some(note) = verdict.note() {
                writeln!(out, "info: {note}")?;
            }
        }
    }
    Ok(())
}
