//! CLI binary for concrete-poetry.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `GeneratorConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use concrete_poetry::{
    generate, generate_to_file, GenerationProgress, GeneratorConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per subject.
/// Works correctly when subjects complete out of order (concurrent mode).
struct CliProgress {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Drawing subjects…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl GenerationProgress for CliProgress {
    fn on_start(&self, total_subjects: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>2}/{len} poems  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_subjects as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Rendering");
    }

    fn on_subject_start(&self, _index: usize, subject: &str) {
        self.bar.set_message(subject.to_string());
    }

    fn on_subject_complete(&self, _index: usize, subject: &str, attempts: usize) {
        self.bar.println(format!(
            "  {} {:<20} {}",
            green("✓"),
            subject,
            dim(&format!(
                "{attempts} candidate{}",
                if attempts == 1 { "" } else { "s" }
            )),
        ));
        self.bar.inc(1);
    }

    fn on_subject_error(&self, _index: usize, subject: &str, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 80 {
            let cut: String = error.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };

        self.bar
            .println(format!("  {} {:<20} {}", red("✗"), subject, red(&msg)));
        self.bar.inc(1);
    }

    fn on_complete(&self, total_subjects: usize, rendered: usize) {
        let failed = total_subjects.saturating_sub(rendered);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} poems rendered",
                green("✔"),
                bold(&rendered.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} poems rendered  ({} failed)",
                cyan("⚠"),
                bold(&rendered.to_string()),
                total_subjects,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # A five-poem edition, written to concrete-<timestamp>.pdf
  concrete 5

  # Reproducible edition to a named file
  concrete 3 --seed 17 -o menagerie.pdf

  # Skip the PDF step and keep the HTML
  concrete 5 -o edition.html

  # Preview poems on the terminal without writing a file
  concrete 2 --print

  # Draw from your own corpus (JSON array of names)
  concrete 4 --corpus birds.json

SETUP:
  1. Create a Custom Search API key:  https://developers.google.com/custom-search
  2. Create a search engine ID:       https://cse.google.com
  3. export GOOGLE_API_KEY=... GOOGLE_CSE_ID=...
  4. Install wkhtmltopdf (https://wkhtmltopdf.org) for PDF output,
     or use an .html output path / --print to go without it.

ENVIRONMENT VARIABLES:
  GOOGLE_API_KEY   Custom Search JSON API key
  GOOGLE_CSE_ID    Custom Search Engine ID
"#;

/// Generate an edition of concrete poems from image-searched subjects.
#[derive(Parser, Debug)]
#[command(
    name = "concrete",
    version,
    about = "Procedurally generated concrete poetry",
    long_about = "Draws subjects from a corpus, finds an image for each, and renders every \
image as a halftone typeset from the letters of the subject's own name, bound into a PDF edition.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Number of poems in the edition.
    count: usize,

    /// Output file. A .html/.htm extension skips the PDF step.
    /// Default: concrete-<yymmdd-HHMMSS>.pdf
    #[arg(short, long, env = "CONCRETE_OUTPUT")]
    output: Option<PathBuf>,

    /// Print rendered poems to stdout instead of writing a file.
    #[arg(long, conflicts_with = "output")]
    print: bool,

    /// Largest pre-skew grid dimension (4–200).
    #[arg(long, env = "CONCRETE_MAX_SIDE", default_value_t = 40)]
    max_side: u32,

    /// Width correction for tall character cells.
    #[arg(long, env = "CONCRETE_SKEW", default_value_t = 1.75)]
    skew: f64,

    /// Subjects processed concurrently.
    #[arg(short, long, env = "CONCRETE_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Candidate image URLs requested per subject (1–10).
    #[arg(long, env = "CONCRETE_CANDIDATES", default_value_t = 10)]
    candidates: usize,

    /// Extra term appended to every image search query.
    #[arg(long, env = "CONCRETE_QUERY_SUFFIX", default_value = "transparent")]
    query_suffix: String,

    /// RNG seed; reruns with the same seed draw the same edition.
    #[arg(long, env = "CONCRETE_SEED")]
    seed: Option<u64>,

    /// JSON array of subject names to draw from instead of the animal corpus.
    #[arg(long, env = "CONCRETE_CORPUS")]
    corpus: Option<PathBuf>,

    /// Google Custom Search API key.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Google Custom Search engine ID.
    #[arg(long, env = "GOOGLE_CSE_ID", hide_env_values = true)]
    cse_id: Option<String>,

    /// Per-candidate download timeout in seconds.
    #[arg(long, env = "CONCRETE_DOWNLOAD_TIMEOUT", default_value_t = 30)]
    download_timeout: u64,

    /// Print run statistics as JSON to stderr.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "CONCRETE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CONCRETE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "CONCRETE_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.print;
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
    let mut builder = GeneratorConfig::builder()
        .count(cli.count)
        .max_side(cli.max_side)
        .skew(cli.skew)
        .concurrency(cli.concurrency)
        .candidates(cli.candidates)
        .query_suffix(cli.query_suffix.clone())
        .download_timeout_secs(cli.download_timeout);

    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    if let Some(ref corpus) = cli.corpus {
        builder = builder.corpus_path(corpus);
    }
    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key);
    }
    if let Some(ref cx) = cli.cse_id {
        builder = builder.cse_id(cx);
    }
    if show_progress {
        builder = builder.progress(CliProgress::new());
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run generation ───────────────────────────────────────────────────
    if cli.print {
        let output = generate(&config).await.context("Generation failed")?;

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        for (subject, block) in output.poems() {
            writeln!(handle, "{subject}\n")?;
            write!(handle, "{block}")?;
            writeln!(handle)?;
        }

        report_stats(&cli, &output.stats)?;
        return Ok(());
    }

    let output_path = cli.output.clone().unwrap_or_else(|| {
        PathBuf::from(format!(
            "concrete-{}.pdf",
            chrono::Local::now().format("%y%m%d-%H%M%S")
        ))
    });

    let stats = generate_to_file(&output_path, &config)
        .await
        .context("Generation failed")?;

    if !cli.quiet {
        eprintln!(
            "{}  {}/{} poems  {}ms  →  {}",
            if stats.failed == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.rendered,
            stats.requested,
            stats.total_duration_ms,
            bold(&output_path.display().to_string()),
        );
    }
    report_stats(&cli, &stats)?;

    Ok(())
}

/// Emit `--json` statistics on stderr.
fn report_stats(cli: &Cli, stats: &concrete_poetry::GenerationStats) -> Result<()> {
    if cli.json {
        eprintln!(
            "{}",
            serde_json::to_string_pretty(stats).context("Failed to serialise stats")?
        );
    }
    Ok(())
}
