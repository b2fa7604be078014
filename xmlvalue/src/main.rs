//! xmlvalue - turn XML/HTML into an ordered JSON tree and query it
//!
//! This is the main CLI entry point that orchestrates parsing and querying.

mod cli;
mod input;
mod output;

use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use rayon::prelude::*;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xmlvalue_core::{Document, ParseOptions, Query};

use cli::Args;
use input::{expand_globs, load_file, load_source, STDIN_LABEL};
use output::{format_matches, Match, OutputFormat};

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("error: {:#}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Diagnostics go to stderr so stdout stays machine-readable
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

/// What to pull out of each document
enum Selection {
    /// The whole tree
    Root,
    /// Every node matching the query
    All(Query),
    /// The first match only
    One(Query),
}

impl Selection {
    fn from_args(args: &Args) -> Self {
        let Some(ref name) = args.name else {
            return Selection::Root;
        };

        let mut query = Query::new(name.as_str())
            .with_attributes(args.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .with_recursive(args.recursive);
        if let Some(max) = args.max {
            query = query.with_max(max);
        }

        if args.one {
            Selection::One(query)
        } else {
            Selection::All(query)
        }
    }

    fn select(&self, file: &str, doc: &Document) -> Vec<Match> {
        let root = doc.root();
        match self {
            Selection::Root => vec![Match::new(file, root)],
            Selection::All(query) => root.get(query).into_iter().map(|n| Match::new(file, n)).collect(),
            Selection::One(query) => {
                let node = root.get_one(query);
                if node.is_empty() {
                    Vec::new()
                } else {
                    vec![Match::new(file, node)]
                }
            }
        }
    }
}

fn parse_options(args: &Args) -> ParseOptions {
    let base = if args.html { ParseOptions::html() } else { ParseOptions::new() };
    base.with_namespaces(args.namespaces)
        .with_sanitize(args.html || args.sanitize)
}

fn run(args: Args) -> anyhow::Result<()> {
    let format = OutputFormat::from_str(&args.output).ok_or_else(|| {
        anyhow!(
            "invalid format '{}'. Valid formats: {}",
            args.output,
            OutputFormat::valid_formats().join(", ")
        )
    })?;

    let files = expand_globs(&args.files);
    let read_stdin = args.files.is_empty() && !atty::is(atty::Stream::Stdin);

    if files.is_empty() && !read_stdin {
        eprintln!("Usage: xmlvalue <files...> [OPTIONS]");
        eprintln!("   or: cat page.html | xmlvalue --html -n a");
        eprintln!("\nUse --help for more information.");
        bail!("no input files");
    }

    let concurrency = args.concurrency.unwrap_or_else(num_cpus::get);
    rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency)
        .build_global()
        .ok();

    let options = parse_options(&args);
    let selection = Selection::from_args(&args);

    let mut matches: Vec<Match> = if read_stdin {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("failed to read standard input")?;
        let doc = load_source(STDIN_LABEL, &source, &options)
            .ok_or_else(|| anyhow!("{} could not be parsed", STDIN_LABEL))?;
        selection.select(STDIN_LABEL, &doc)
    } else {
        debug!("processing {} files with {} workers", files.len(), concurrency);
        let per_file: Vec<Option<Vec<Match>>> = files
            .par_iter()
            .map(|file| load_file(file, &options).map(|doc| selection.select(file, &doc)))
            .collect();

        if per_file.iter().all(Option::is_none) {
            bail!("no files could be parsed");
        }
        per_file.into_iter().flatten().flatten().collect()
    };

    if let Some(max) = args.max {
        matches.truncate(max);
    }

    let is_test_mode = args.expect.is_some();
    if !is_test_mode {
        let mut stdout = io::stdout().lock();
        stdout.write_all(format_matches(&matches, format).as_bytes())?;
        stdout.flush()?;
    }

    check_expectation(&matches, &args, format)
}

/// ANSI colors for test output
mod test_colors {
    pub const RESET: &str = "\x1b[0m";
    pub const GREEN: &str = "\x1b[32m";
    pub const RED: &str = "\x1b[31m";
    pub const BOLD: &str = "\x1b[1m";
}

/// Result of an expectation check
#[derive(Debug, PartialEq)]
struct TestResult {
    passed: bool,
    expected: String,
    actual: usize,
}

impl TestResult {
    fn check(expect: &str, count: usize) -> anyhow::Result<Self> {
        let passed = match expect {
            "none" => count == 0,
            "some" => count > 0,
            _ => {
                let expected: usize = expect.parse().map_err(|_| {
                    anyhow!("invalid expectation '{}': use 'none', 'some', or a number", expect)
                })?;
                count == expected
            }
        };
        Ok(TestResult {
            passed,
            expected: expect.to_string(),
            actual: count,
        })
    }
}

fn check_expectation(matches: &[Match], args: &Args, format: OutputFormat) -> anyhow::Result<()> {
    let Some(ref expect) = args.expect else {
        return Ok(());
    };

    let result = TestResult::check(expect, matches.len())?;
    let use_color = atty::is(atty::Stream::Stdout);
    let (symbol, color) = if result.passed {
        ("✓", test_colors::GREEN)
    } else {
        ("✗", test_colors::RED)
    };

    if use_color {
        println!("{}{}{} {} matches{}", test_colors::BOLD, color, symbol, result.actual, test_colors::RESET);
    } else {
        println!("{} {} matches", symbol, result.actual);
    }

    if result.passed {
        return Ok(());
    }

    // On failure, show what was found
    if !matches.is_empty() && format != OutputFormat::Count {
        for line in format_matches(matches, format).lines() {
            println!("  {}", line);
        }
    }

    bail!(
        "expectation failed: expected {}, got {} matches",
        result.expected,
        result.actual
    )
}
