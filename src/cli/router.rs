//! Command routing and execution
//!
//! This module turns parsed CLI arguments plus the layered configuration into
//! a report on stdout and an [`Outcome`] the binary maps to an exit code.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::analytics::{self, Analysis};
use crate::cli::args::Commands;
use crate::cli::filter::{filter_events, parse_set, EventFilter};
use crate::cli::help::generate_help;
use crate::config::{AnalyzerConfig, OutputFormat};
use crate::input::{self, Dataset};
use crate::report;

/// How a successful command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Strict mode was requested and the analysis found errors
    StrictFailure,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::StrictFailure => 1,
        }
    }
}

/// Settings for one `analyze` run, after CLI flags override the config
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeOptions {
    pub inputs: Vec<String>,
    pub globs: Vec<String>,
    pub stream_config: Option<PathBuf>,
    pub format: OutputFormat,
    pub filter: EventFilter,
    pub max_issues: usize,
    pub strict: bool,
}

/// Result of an `analyze` run, ready to render
#[derive(Debug, Clone)]
pub struct AnalyzeRun {
    pub dataset: Dataset,
    pub analysis: Analysis,
}

/// Execute a CLI command, writing its report to `out`
pub async fn execute_command(
    command: Option<Commands>,
    config: &AnalyzerConfig,
    out: &mut impl Write,
) -> Result<Outcome> {
    match command {
        Some(Commands::Analyze {
            input,
            glob,
            stream_config,
            config: _,
            format,
            event_types,
            min_confidence,
            max_issues,
            strict,
        }) => {
            let format = resolve_format(format.as_deref(), config)?;
            let event_types = match &event_types {
                Some(types) => parse_set([types.as_str()]),
                None => parse_set(config.event_types.iter().map(String::as_str)),
            };
            let filter =
                EventFilter::new(event_types, min_confidence.unwrap_or(config.min_confidence));
            let opts = AnalyzeOptions {
                inputs: input,
                globs: glob,
                stream_config,
                format,
                filter,
                max_issues: max_issues.unwrap_or(config.max_issues),
                strict: strict || config.strict,
            };
            run_analyze(&opts, config, out).await
        }
        Some(Commands::Inventory {
            stream_config,
            config: _,
            format,
        }) => {
            let format = resolve_format(format.as_deref(), config)?;
            run_inventory(&stream_config, format, out).await
        }
        None => {
            writeln!(out, "{}", generate_help())?;
            Ok(Outcome::Success)
        }
    }
}

fn resolve_format(flag: Option<&str>, config: &AnalyzerConfig) -> Result<OutputFormat> {
    match flag {
        Some(value) => value
            .parse::<OutputFormat>()
            .with_context(|| format!("invalid --format {value:?} (expected text or json)")),
        None => Ok(config.format),
    }
}

/// Load, filter and analyze the requested inputs
pub async fn analyze_inputs(opts: &AnalyzeOptions, config: &AnalyzerConfig) -> Result<AnalyzeRun> {
    let mut dataset = match &opts.stream_config {
        Some(path) => input::load_from_stream_config(path)
            .await
            .context("input error")?,
        None => Dataset::default(),
    };

    let explicit = !opts.inputs.is_empty() || !opts.globs.is_empty();
    if explicit || opts.stream_config.is_none() {
        let globs = if explicit {
            opts.globs.clone()
        } else {
            debug!("No inputs given, using default globs {:?}", config.default_globs);
            config.default_globs.clone()
        };
        dataset
            .extend_from(&opts.inputs, &globs)
            .await
            .context("input error")?;
    }

    let total = dataset.events.len();
    let events = filter_events(std::mem::take(&mut dataset.events), &opts.filter);
    if events.len() != total {
        debug!("Filter kept {} of {} events", events.len(), total);
    }

    let analysis = analytics::run(&events);
    dataset.events = events;
    Ok(AnalyzeRun { dataset, analysis })
}

async fn run_analyze(
    opts: &AnalyzeOptions,
    config: &AnalyzerConfig,
    out: &mut impl Write,
) -> Result<Outcome> {
    let run = analyze_inputs(opts, config).await?;
    let stream = run.dataset.stream.as_ref();

    match opts.format {
        OutputFormat::Text => {
            let text =
                report::render_text(&run.analysis, &run.dataset.files, stream, opts.max_issues);
            writeln!(out, "{text}")?;
        }
        OutputFormat::Json => {
            let json = report::render_json(&run.analysis, &run.dataset.files, stream)
                .context("encode json")?;
            writeln!(out, "{json}")?;
        }
    }

    if opts.strict && run.analysis.has_errors() {
        return Ok(Outcome::StrictFailure);
    }
    Ok(Outcome::Success)
}

async fn run_inventory(path: &Path, format: OutputFormat, out: &mut impl Write) -> Result<Outcome> {
    let dataset = input::load_from_stream_config(path)
        .await
        .context("input error")?;
    let Some(summary) = dataset.stream else {
        anyhow::bail!("stream config {} produced no inventory", path.display());
    };

    match format {
        OutputFormat::Text => write!(out, "{}", report::render_inventory(&summary))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?,
    }
    Ok(Outcome::Success)
}
