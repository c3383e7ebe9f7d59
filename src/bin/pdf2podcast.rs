//! CLI binary for edgequake-pdf2podcast.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `PodcastConfig`, runs the pipeline and writes the results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2podcast::config::{DEFAULT_MODEL, DEFAULT_SPEECH_BASE_URL, DEFAULT_TTS_MODEL};
use edgequake_pdf2podcast::generate::check_source_length;
use edgequake_pdf2podcast::pipeline::extract;
use edgequake_pdf2podcast::{
    write_outputs, FailurePolicy, PipelineProgressCallback, PipelineState, PodcastConfig,
    PodcastPipeline, ProgressCallback, Stage, Voice,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar step per pipeline stage plus a log
/// line for every finished stage and audio segment.
struct CliProgressCallback {
    bar: ProgressBar,
    stage_started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:24.green/238}] {pos}/{len} stages  {msg}  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        let bar = ProgressBar::new(Stage::ALL.len() as u64);
        bar.set_style(style);
        bar.set_prefix("Podcast");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            stage_started: Mutex::new(None),
        })
    }

    fn stage_elapsed(&self) -> String {
        let secs = self
            .stage_started
            .lock()
            .ok()
            .and_then(|mut t| t.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        dim(&format!("{secs:.1}s"))
    }
}

impl PipelineProgressCallback for CliProgressCallback {
    fn on_pipeline_start(&self, source_chars: usize) {
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Generating podcast from {source_chars} characters…"))
        ));
    }

    fn on_stage_start(&self, stage: Stage) {
        if let Ok(mut t) = self.stage_started.lock() {
            *t = Some(Instant::now());
        }
        self.bar.set_message(format!("{}…", stage.description()));
    }

    fn on_stage_complete(&self, stage: Stage) {
        self.bar.println(format!(
            "  {} Step {}  {:<28}  {}",
            green("✓"),
            stage.number(),
            stage.description(),
            self.stage_elapsed(),
        ));
        self.bar.inc(1);
    }

    fn on_stage_error(&self, stage: Stage, error: &str) {
        let msg: String = if error.chars().count() > 80 {
            error.chars().take(79).chain(['…']).collect()
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} Step {}  {}  {}",
            red("✗"),
            stage.number(),
            red(&msg),
            self.stage_elapsed(),
        ));
        self.bar.inc(1);
    }

    fn on_segment_complete(&self, segment: usize, total: usize, bytes: usize) {
        self.bar.println(format!(
            "      {} segment {segment}/{total}  {}",
            dim("♪"),
            dim(&format!("{bytes} bytes")),
        ));
    }

    fn on_pipeline_complete(&self, failed_stages: usize) {
        self.bar.finish_and_clear();
        if failed_stages == 0 {
            eprintln!("{} All {} stages completed", green("✔"), Stage::ALL.len());
        } else {
            eprintln!(
                "{} {} stage(s) failed",
                red("✘"),
                bold(&failed_stages.to_string())
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Podcast from a PDF, written to the current directory
  pdf2podcast paper.pdf

  # Different narrator and output directory
  pdf2podcast --voice nova -o episodes/ paper.pdf

  # Plain-text input instead of a PDF
  pdf2podcast --text notes.txt

  # Stop at the first failing stage
  pdf2podcast --halt-on-error paper.pdf

  # JSON summary of the run
  pdf2podcast --json paper.pdf > run.json

OUTPUT:
  podcast.mp3          Narrated episode (when audio generation succeeded)
  podcast_script.txt   The generated script

VOICES:
  alloy (default), echo, fable, onyx, nova, shimmer

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key (speech, and LLM when no provider is named)
  OPENAI_BASE_URL         OpenAI-compatible API root for speech synthesis
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  PDFIUM_LIB_PATH         Path to libpdfium if it is not on the library path

  Variables may also be placed in a .env file in the working directory.
"#;

/// Turn PDF documents into narrated podcasts.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2podcast",
    version,
    about = "Turn PDF documents into narrated podcasts",
    long_about = "Summarise a PDF with an LLM, extract its key points, write a conversational \
podcast script, and narrate it with a text-to-speech service. Supports OpenAI, Anthropic, \
Google Gemini and any OpenAI-compatible endpoint for the text stages.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file (or text file with --text).
    input: PathBuf,

    /// Treat the input as UTF-8 text instead of a PDF.
    #[arg(long)]
    text: bool,

    /// Directory for podcast.mp3 and podcast_script.txt.
    #[arg(short, long, env = "PDF2PODCAST_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// LLM model ID for the summary, key-point and script stages.
    #[arg(long, env = "EDGEQUAKE_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(
        long,
        env = "EDGEQUAKE_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set.\n\
          Supported: openai, anthropic, gemini, azure, ollama, or any OpenAI-compatible URL."
    )]
    provider: Option<String>,

    /// Text-to-speech model ID.
    #[arg(long, env = "PDF2PODCAST_TTS_MODEL", default_value = DEFAULT_TTS_MODEL)]
    tts_model: String,

    /// Narrator voice.
    #[arg(long, env = "PDF2PODCAST_VOICE", value_enum, default_value = "alloy")]
    voice: VoiceArg,

    /// Max LLM output tokens per call.
    #[arg(long, env = "PDF2PODCAST_MAX_TOKENS", default_value_t = 4000)]
    max_tokens: usize,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PDF2PODCAST_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// OpenAI API key, used for speech and for the LLM when no provider is named.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// OpenAI-compatible API root for speech synthesis.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_SPEECH_BASE_URL)]
    speech_base_url: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2PODCAST_PASSWORD")]
    password: Option<String>,

    /// Minimum characters of source text required to start.
    #[arg(long, env = "PDF2PODCAST_MIN_CHARS", default_value_t = 100)]
    min_chars: usize,

    /// Stop after the first failing stage instead of running the rest.
    #[arg(long, env = "PDF2PODCAST_HALT_ON_ERROR")]
    halt_on_error: bool,

    /// Print the run as JSON instead of the summary and key points.
    #[arg(long, env = "PDF2PODCAST_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2PODCAST_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2PODCAST_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2PODCAST_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum VoiceArg {
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

impl From<VoiceArg> for Voice {
    fn from(v: VoiceArg) -> Self {
        match v {
            VoiceArg::Alloy => Voice::Alloy,
            VoiceArg::Echo => Voice::Echo,
            VoiceArg::Fable => Voice::Fable,
            VoiceArg::Onyx => Voice::Onyx,
            VoiceArg::Nova => Voice::Nova,
            VoiceArg::Shimmer => Voice::Shimmer,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn PipelineProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Source text ──────────────────────────────────────────────────────
    let source_text = if cli.text {
        tokio::fs::read_to_string(&cli.input)
            .await
            .with_context(|| format!("Failed to read text from {:?}", cli.input))?
    } else {
        extract::extract_text(&cli.input, config.password.as_deref())
            .await
            .context("Failed to extract text from PDF")?
    };
    check_source_length(&source_text, config.min_source_chars)?;

    // ── Run pipeline ─────────────────────────────────────────────────────
    let pipeline =
        PodcastPipeline::from_config(config).context("Failed to set up language and speech services")?;
    let run_start = Instant::now();
    let state = pipeline.run(source_text).await;

    let written = write_outputs(&state, &cli.output_dir)
        .await
        .context("Failed to write outputs")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&state).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        print_report(&state);
    }

    if !cli.quiet && !cli.json {
        for path in written.audio.iter().chain(written.script.iter()) {
            eprintln!("   →  {}", bold(&path.display().to_string()));
        }
        eprintln!(
            "   {}",
            dim(&format!("{:.1}s total", run_start.elapsed().as_secs_f64()))
        );
    }

    if let Some(err) = state.error_message() {
        anyhow::bail!(err);
    }

    Ok(())
}

/// Map CLI args to `PodcastConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PodcastConfig> {
    let policy = if cli.halt_on_error {
        FailurePolicy::Halt
    } else {
        FailurePolicy::Continue
    };

    let mut builder = PodcastConfig::builder()
        .model(&cli.model)
        .tts_model(&cli.tts_model)
        .voice(cli.voice.into())
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .speech_base_url(&cli.speech_base_url)
        .min_source_chars(cli.min_chars)
        .on_failure(policy);

    if let Some(ref name) = cli.provider {
        builder = builder.provider_name(name);
    }
    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Print the summary and numbered key points.
fn print_report(state: &PipelineState) {
    if !state.summary.is_empty() {
        println!("{}\n", bold("Summary"));
        println!("{}\n", state.summary.trim());
    }

    if !state.key_points.is_empty() {
        println!("{}\n", bold("Key Points"));
        for (i, point) in state.key_points.iter().enumerate() {
            println!("{}. {}", i + 1, point);
        }
        println!();
    }
}
