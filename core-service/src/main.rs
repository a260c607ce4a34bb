//! PhishGuard GRC - command line entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use phishguard_core::constants;
use phishguard_core::logic::config::PipelineConfig;
use phishguard_core::logic::dataset::InputFormat;
use phishguard_core::logic::pipeline;
use phishguard_core::logic::register::{filter_by_level, read_register, summarize};
use phishguard_core::logic::risk::{ControlPolicy, RiskLevel};

#[derive(Parser)]
#[command(name = "phishguard", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a sample of emails and write the register, report and metrics
    Run(RunArgs),
    /// Print the risk summary of an existing register
    Summary {
        /// Register CSV to read
        #[arg(long)]
        register: Option<PathBuf>,
        /// Only list rows at this level (Low, Medium, High)
        #[arg(long)]
        level: Option<RiskLevel>,
        /// Rows to list
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Control policy JSON used for GDPR references
        #[arg(long)]
        policy: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Input CSV
    #[arg(long)]
    input: Option<PathBuf>,
    /// Input layout: text or features
    #[arg(long)]
    format: Option<InputFormat>,
    /// Vectorizer artifact (vocabulary + idf)
    #[arg(long)]
    vectorizer: Option<PathBuf>,
    /// Model manifest
    #[arg(long)]
    model: Option<PathBuf>,
    /// Register CSV output
    #[arg(long)]
    register: Option<PathBuf>,
    /// Markdown report output
    #[arg(long)]
    report: Option<PathBuf>,
    /// Classification metrics JSON output
    #[arg(long)]
    metrics: Option<PathBuf>,
    /// Maximum rows to score
    #[arg(long)]
    sample_size: Option<usize>,
    /// Sampling seed (random and logged when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Control policy JSON overriding thresholds and control text
    #[arg(long)]
    policy: Option<PathBuf>,
}

impl RunArgs {
    fn into_config(self) -> PipelineConfig {
        let env = PipelineConfig::from_env();
        PipelineConfig {
            input: self.input.unwrap_or(env.input),
            format: self.format.unwrap_or(env.format),
            vectorizer: self.vectorizer.unwrap_or(env.vectorizer),
            model: self.model.unwrap_or(env.model),
            register: self.register.unwrap_or(env.register),
            report: self.report.unwrap_or(env.report),
            metrics: self.metrics.unwrap_or(env.metrics),
            sample_size: self.sample_size.unwrap_or(env.sample_size),
            seed: self.seed.or(env.seed),
            policy: self.policy.or(env.policy),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Summary {
            register,
            level,
            limit,
            policy,
        } => summary(register, level, limit, policy),
    }
}

fn run(args: RunArgs) -> Result<()> {
    log::info!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);

    let config = args.into_config();
    let outcome = pipeline::run(&config).context("risk assessment failed")?;

    println!("Assessed {} emails (seed {})", outcome.summary.total, outcome.seed);
    for level in &outcome.summary.levels {
        println!("  {:<6} {:>6}  ({})", level.risk_level, level.count, level.gdpr_reference);
    }
    println!("  Average GDPR compliance score: {}", outcome.summary.average_display());
    if let Some(metrics) = &outcome.metrics {
        println!("  Accuracy on labelled sample: {:.4}", metrics.accuracy);
    }
    println!("Register: {}", outcome.register_path.display());
    println!("Report:   {}", outcome.report_path.display());
    if let Some(path) = &outcome.metrics_path {
        println!("Metrics:  {}", path.display());
    }
    Ok(())
}

fn summary(register: Option<PathBuf>, level: Option<RiskLevel>, limit: usize, policy: Option<PathBuf>) -> Result<()> {
    let path = register.unwrap_or_else(|| constants::get_register_path().into());
    let rows = read_register(&path).with_context(|| format!("failed to read register {}", path.display()))?;
    let policy = match policy {
        Some(p) => ControlPolicy::load(&p).with_context(|| format!("failed to load policy {}", p.display()))?,
        None => ControlPolicy::default(),
    };

    let summary = summarize(&rows, &policy);
    println!("Risk register: {} ({} rows)", path.display(), summary.total);
    for entry in &summary.levels {
        println!("  {:<6} {:>6}  GDPR {}", entry.risk_level, entry.count, entry.gdpr_reference);
    }
    println!("  Average GDPR compliance score: {}", summary.average_display());

    let filtered = filter_by_level(&rows, level);
    println!();
    match level {
        Some(level) => println!("{} risk rows ({}):", level, filtered.len()),
        None => println!("Rows ({}):", filtered.len()),
    }
    for row in filtered.iter().take(limit) {
        println!("  {:.2}  {:<6}  {}", row.risk_score, row.risk_level, row.email_preview);
    }
    Ok(())
}
