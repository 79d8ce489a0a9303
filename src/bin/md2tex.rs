//! CLI binary for md2tex.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use md2tex::{
    convert_dir, convert_file, convert_to_file, BatchOutput, ConversionConfig,
    ConversionProgressCallback, Md2TexError, ProgressCallback,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
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

/// `{msg}` shows the document currently being converted.
const BAR_TEMPLATE: &str = "{spinner:.cyan} {prefix:.bold}  \
     [{bar:42.green/238}] {pos:>3}/{len} files  ⏱ {elapsed_precise}  {msg}";

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback for `--all`: a bar anchored at the bottom of
/// the terminal and one log line per finished document. Documents may
/// finish out of order when `--concurrency` is above 1.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total_files} Markdown file(s) to convert:"))
        ));
    }

    fn on_file_start(&self, source: &Path) {
        self.bar.set_message(source.display().to_string());
    }

    fn on_file_complete(&self, source: &Path, latex_len: usize) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            source.display(),
            dim(&format!("{latex_len:>6} bytes")),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, source: &Path, error: &str) {
        // Keep the log line on one row.
        let first = error.lines().next().unwrap_or(error);
        let msg = if first.chars().count() > 80 {
            let cut: String = first.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            first.to_string()
        };

        self.bar.println(format!(
            "  {} {}  {}",
            red("✗"),
            source.display(),
            red(&msg)
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let failed = total_files.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} files converted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files converted  ({} failed)",
                if failed == total_files {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert one chapter into tex/introduction.tex
  md2tex content/introduction.md

  # Convert every chapter in content/
  md2tex --all

  # Print LaTeX instead of writing a file
  md2tex --stdout content/methods.md

  # Different layout, eight documents at a time
  md2tex --all --content-dir chapters -o build/tex -c 8

  # Machine-readable batch report
  md2tex --all --json > report.json

SUPPORTED MARKDOWN:
  Markdown              LaTeX
  ────────────────────  ─────────────────────────────
  # .. ######           \chapter .. \subparagraph
  - item / * / +        itemize + \item
  1. item               enumerate + \item
  ``` fenced block      verbatim
  **bold** __bold__     \textbf{..}
  *italic* _italic_     \textit{..}
  `code`                \texttt{..}
  [ref:key]             \cite{key}

ENVIRONMENT VARIABLES:
  MD2TEX_OUTPUT_DIR     Default for --output-dir
  MD2TEX_CONTENT_DIR    Default for --content-dir
  MD2TEX_CONCURRENCY    Default for --concurrency
  RUST_LOG              Override the log filter (e.g. md2tex=debug)
"#;

/// Convert thesis chapters from Markdown to LaTeX.
#[derive(Parser, Debug)]
#[command(
    name = "md2tex",
    version,
    about = "Convert thesis chapters from Markdown to LaTeX",
    long_about = "Convert Markdown documents (headings, lists, fenced blocks, emphasis, \
inline code and [ref:key] citations) to LaTeX. Converts a single file, or every \
Markdown file in the content directory with --all.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown file to convert.
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    input: Option<PathBuf>,

    /// Convert every Markdown file in the content directory.
    #[arg(long)]
    all: bool,

    /// Directory the LaTeX files are written to.
    #[arg(short, long, env = "MD2TEX_OUTPUT_DIR", default_value = "tex")]
    output_dir: PathBuf,

    /// Directory scanned by --all.
    #[arg(long, env = "MD2TEX_CONTENT_DIR", default_value = "content")]
    content_dir: PathBuf,

    /// Number of documents converted at once by --all.
    #[arg(short, long, env = "MD2TEX_CONCURRENCY", default_value_t = 4,
          value_parser = clap::value_parser!(u32).range(1..))]
    concurrency: u32,

    /// Print the LaTeX to stdout instead of writing a file (single file only).
    #[arg(long, conflicts_with = "all")]
    stdout: bool,

    /// Print the conversion report as JSON.
    #[arg(long, env = "MD2TEX_JSON")]
    json: bool,

    /// Close a fenced block left open at the end of a document.
    #[arg(long, env = "MD2TEX_CLOSE_UNTERMINATED")]
    close_unterminated: bool,

    /// Disable progress bar.
    #[arg(long, env = "MD2TEX_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MD2TEX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MD2TEX_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar and the "Converted:" lines already tell the user
    // what happened, so library INFO logs are only shown with --verbose.
    let show_progress = cli.all && !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    if cli.all {
        return run_batch(&cli, &config).await;
    }

    // `required_unless_present` guarantees an input without --all.
    let input = cli.input.as_deref().context("No input file given")?;
    run_single(&cli, input, &config).await
}

/// Convert one file. A missing file is reported, not treated as a failure.
async fn run_single(cli: &Cli, input: &Path, config: &ConversionConfig) -> Result<()> {
    if cli.stdout {
        let output = match convert_file(input, config).await {
            Err(e) if e.is_missing_input() => return report_missing(&e),
            other => other.context("Conversion failed")?,
        };

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            write_latex(&mut io::stdout().lock(), &output.latex)?;
        }
        return Ok(());
    }

    let report = match convert_to_file(input, config).await {
        Err(e) if e.is_missing_input() => return report_missing(&e),
        other => other.context("Conversion failed")?,
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet {
        println!(
            "Converted: {} → {}",
            report.source.display(),
            report.destination.display()
        );
        if report.stats.as_ref().is_some_and(|s| s.unterminated_literal) {
            eprintln!(
                "{} {} ends inside a fenced block",
                cyan("⚠"),
                report.source.display()
            );
        }
    }
    Ok(())
}

/// Convert every document in the content directory.
async fn run_batch(cli: &Cli, config: &ConversionConfig) -> Result<()> {
    let batch = match convert_dir(&config.content_dir, config).await {
        Err(e) if e.is_missing_input() => return report_missing(&e),
        other => other.context("Batch conversion failed")?,
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&batch).context("Failed to serialise report")?;
        println!("{json}");
    } else if batch.stats.discovered == 0 {
        if !cli.quiet {
            println!("No Markdown files found in {}", config.content_dir.display());
        }
        return Ok(());
    } else if !cli.quiet && config.progress_callback.is_none() {
        print_batch(&batch);
    }

    // Documents that vanished mid-batch were already reported.
    let hard = batch.hard_failures().count();
    if hard > 0 {
        anyhow::bail!(
            "{} of {} file(s) failed to convert",
            hard,
            batch.stats.discovered
        );
    }
    Ok(())
}

/// Plain per-file listing used when the progress bar is off.
fn print_batch(batch: &BatchOutput) {
    println!(
        "Found {} Markdown file(s) to convert:",
        batch.stats.discovered
    );
    for file in &batch.files {
        match &file.error {
            None => println!(
                "Converted: {} → {}",
                file.source.display(),
                file.destination.display()
            ),
            Some(err) => eprintln!("{} {err}", red("Error:")),
        }
    }
    eprintln!(
        "Converted {}/{} files in {}ms",
        batch.stats.converted, batch.stats.discovered, batch.stats.total_duration_ms
    );
}

/// Write `latex` followed by a newline if it does not already end in one.
fn write_latex(out: &mut impl Write, latex: &str) -> Result<()> {
    out.write_all(latex.as_bytes())
        .context("Failed to write to stdout")?;
    if !latex.ends_with('\n') {
        out.write_all(b"\n").context("Failed to write to stdout")?;
    }
    Ok(())
}

fn report_missing(e: &Md2TexError) -> Result<()> {
    eprintln!("Error: {e}");
    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .output_dir(&cli.output_dir)
        .content_dir(&cli.content_dir)
        .concurrency(cli.concurrency as usize)
        .close_unterminated_literal(cli.close_unterminated);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
