use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use pcf_core::{canonicalize_with, CanonicalizerConfig, Value};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod fingerprint;

/// PCF — Avro Parsing Canonical Form CLI
///
/// Canonicalize, fingerprint, and compare Avro schemas.
#[derive(Parser)]
#[command(name = "pcf", version, about, long_about = None)]
struct Cli {
    /// Print nothing on success; rely on the exit code
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log debug events to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Deepest schema nesting accepted
    #[arg(long, global = true, default_value_t = CanonicalizerConfig::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Parsing Canonical Form of a schema
    Canonicalize {
        /// Path to .avsc file, or - for stdin
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fingerprint the canonical form of a schema
    Fingerprint {
        /// Path to .avsc file, or - for stdin
        file: PathBuf,
        /// Fingerprint algorithm
        #[arg(long, value_enum, default_value_t = Algorithm::Rabin)]
        algorithm: Algorithm,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare two schemas by canonical form
    Diff {
        /// First .avsc file
        file_a: PathBuf,
        /// Second .avsc file
        file_b: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum Algorithm {
    /// CRC-64-AVRO, 16 hex digits
    Rabin,
    /// SHA-256, 64 hex digits
    Sha256,
}

impl Algorithm {
    fn name(self) -> &'static str {
        match self {
            Algorithm::Rabin => "rabin",
            Algorithm::Sha256 => "sha256",
        }
    }

    fn apply(self, canonical: &str) -> String {
        match self {
            Algorithm::Rabin => format!("{:016x}", fingerprint::rabin(canonical.as_bytes())),
            Algorithm::Sha256 => fingerprint::sha256_hex(canonical.as_bytes()),
        }
    }
}

// ── Exit codes ─────────────────────────────────────────────

const EXIT_OK: i32 = 0;
const EXIT_DIFFERENT: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            EXIT_ERROR
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<i32> {
    let config = CanonicalizerConfig {
        max_depth: cli.max_depth,
    };
    let out = Output { quiet: cli.quiet };

    match &cli.command {
        Commands::Canonicalize { file, json } => {
            let canonical = canonical_form(file, &config)?;
            if *json {
                out.json(&CanonicalReport {
                    source: &source_label(file),
                    canonical: &canonical,
                })?;
            } else {
                out.line(&canonical);
            }
            Ok(EXIT_OK)
        }
        Commands::Fingerprint {
            file,
            algorithm,
            json,
        } => {
            let canonical = canonical_form(file, &config)?;
            let fingerprint = algorithm.apply(&canonical);
            debug!(algorithm = algorithm.name(), %fingerprint, "fingerprinted");
            if *json {
                out.json(&FingerprintReport {
                    source: &source_label(file),
                    algorithm: algorithm.name(),
                    fingerprint: &fingerprint,
                })?;
            } else {
                out.line(&fingerprint);
            }
            Ok(EXIT_OK)
        }
        Commands::Diff {
            file_a,
            file_b,
            json,
        } => {
            let a = canonical_form(file_a, &config)?;
            let b = canonical_form(file_b, &config)?;
            let identical = a == b;
            if *json {
                out.json(&DiffReport {
                    identical,
                    a: &a,
                    b: &b,
                })?;
            } else if identical {
                out.line("schemas are semantically identical");
            } else {
                out.line(&format!("--- {}", source_label(file_a)));
                out.line(&format!("+++ {}", source_label(file_b)));
                out.line(&format!("-{}", a));
                out.line(&format!("+{}", b));
            }
            Ok(if identical { EXIT_OK } else { EXIT_DIFFERENT })
        }
        Commands::Version => {
            out.line(&format!(
                "pcf {} (pcf-core {})",
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_VERSION")
            ));
            Ok(EXIT_OK)
        }
    }
}

// ── Input ──────────────────────────────────────────────────

fn source_label(path: &Path) -> String {
    if is_stdin(path) {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_source(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("cannot read schema from stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
    }
}

fn load_schema(path: &Path) -> Result<Value> {
    let text = read_source(path)?;
    debug!(source = %source_label(path), bytes = text.len(), "read schema");
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", source_label(path)))?;
    Ok(Value::from(json))
}

fn canonical_form(path: &Path, config: &CanonicalizerConfig) -> Result<String> {
    let schema = load_schema(path)?;
    let canonical = canonicalize_with(&schema, config)
        .with_context(|| format!("cannot canonicalize {}", source_label(path)))?;
    debug!(source = %source_label(path), bytes = canonical.len(), "canonicalized");
    Ok(canonical)
}

// ── Output ─────────────────────────────────────────────────

struct Output {
    quiet: bool,
}

impl Output {
    fn line(&self, text: &str) {
        if !self.quiet {
            println!("{}", text);
        }
    }

    fn json<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value)?;
        self.line(&text);
        Ok(())
    }
}

#[derive(Serialize)]
struct CanonicalReport<'a> {
    source: &'a str,
    canonical: &'a str,
}

#[derive(Serialize)]
struct FingerprintReport<'a> {
    source: &'a str,
    algorithm: &'static str,
    fingerprint: &'a str,
}

#[derive(Serialize)]
struct DiffReport<'a> {
    identical: bool,
    a: &'a str,
    b: &'a str,
}
