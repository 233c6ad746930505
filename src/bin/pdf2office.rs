//! CLI binary for edgequake-pdf2office.
//!
//! A thin shim over the library crate: three positional arguments in, one
//! output file and an exit code out. Expected failures print a single
//! machine-readable tag on stderr (`INPUT_NOT_FOUND`, `UNSUPPORTED_FORMAT`,
//! `MISSING:<capability>`) so callers can branch on it.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2office::pipeline::input::validate_input;
use edgequake_pdf2office::{
    convert, ConversionConfig, ConversionProgressCallback, OutputFormat, Pdf2OfficeError,
    ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Page progress bar on stderr, enabled with `--progress`.
struct CliProgressCallback {
    bar: ProgressBar,
    skipped: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        // Length is set in on_conversion_start once the page count is known.
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        bar.set_style(style);
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            skipped: AtomicUsize::new(0),
        })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
        self.bar.set_prefix("Rendering");
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, _page_num: usize, _total: usize, _units: usize) {
        self.bar.inc(1);
    }

    fn on_image_skipped(&self, page_num: usize, index: usize, reason: &str) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} page {} image {} skipped  {}",
            yellow("⚠"),
            page_num,
            index + 1,
            dim(reason)
        ));
    }

    fn on_conversion_complete(&self, total_pages: usize, images_skipped: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages rendered{}",
            green("✔"),
            total_pages,
            if images_skipped > 0 {
                format!(" ({} images skipped)", images_skipped)
            } else {
                String::new()
            }
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  pdf2office report.pdf txt report.txt
  pdf2office report.pdf docx report.docx
  pdf2office slides.pdf PPTX deck.pptx --progress
  pdf2office scan.pdf xlsx out.xlsx --pdfium-lib /opt/pdfium/lib/libpdfium.so --json

EXIT CODES:
  0  success
  2  a required library is unavailable      stderr: MISSING:<pdfium|docx|xlsx|pptx>
  3  the input file does not exist          stderr: INPUT_NOT_FOUND
  4  the format is not txt/docx/xlsx/pptx   stderr: UNSUPPORTED_FORMAT
  1  anything else (unreadable PDF, write failure)

ENVIRONMENT VARIABLES:
  RUST_LOG   Log filter override (e.g. RUST_LOG=edgequake_pdf2office=debug)

PDFIUM:
  The PDFium shared library is looked up in the working directory, then on
  the system library path. Use --pdfium-lib to point at a specific file.
"#;

/// Extract text and images from a PDF into TXT, DOCX, XLSX or PPTX.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2office",
    version,
    about = "Extract text and images from a PDF into TXT, DOCX, XLSX or PPTX",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to read.
    input: PathBuf,

    /// Output format: txt, docx, xlsx or pptx (case-insensitive).
    format: String,

    /// File to write. Its extension is not inspected.
    output: PathBuf,

    /// Load PDFium from this shared library instead of searching for it.
    #[arg(long, value_name = "PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Print the conversion report as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Show a page progress bar on stderr.
    #[arg(long)]
    progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // stderr carries the machine-readable tags, so library logs stay at
    // `error` unless asked for.
    let filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let known = err.downcast_ref::<Pdf2OfficeError>();
            match known.and_then(|e| e.diagnostic_tag().map(|tag| (tag, e.exit_code()))) {
                Some((tag, code)) => {
                    eprintln!("{tag}");
                    ExitCode::from(code)
                }
                None => {
                    eprintln!("Error: {err:#}");
                    ExitCode::from(known.map(|e| e.exit_code()).unwrap_or(1))
                }
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    // ── Checks, in exit-code order: 3, 4 (2 is checked by `convert`) ────
    validate_input(&cli.input)?;
    let format: OutputFormat = cli.format.parse()?;

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ConversionConfig::builder();
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_library(lib);
    }
    if cli.progress {
        let cb: ProgressCallback = CliProgressCallback::new();
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run conversion ───────────────────────────────────────────────────
    let report = convert(&cli.input, format, &cli.output, &config)
        .with_context(|| format!("Conversion to {} failed", format))?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    }

    Ok(())
}
