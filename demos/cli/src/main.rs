use std::path::PathBuf;

use anyhow::Context;
use biligram_core::{ClassifierConfig, RiskFactorStatus};
use biligram_engine::classify_request_str;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "biligram-cli",
    about = "Classify newborn bilirubin results against the Bhutani nomogram and AAP treatment thresholds."
)]
struct Args {
    /// Path to the request JSON (patient plus serum / POC / TCLab tables).
    #[arg(short, long)]
    input: PathBuf,

    /// What is known about the infant's neurotoxicity risk factors.
    #[arg(long, value_enum, default_value_t = RiskFactorsArg::Unknown)]
    risk_factors: RiskFactorsArg,

    /// Print the full report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RiskFactorsArg {
    Unknown,
    Absent,
    Present,
}

impl From<RiskFactorsArg> for RiskFactorStatus {
    fn from(arg: RiskFactorsArg) -> Self {
        match arg {
            RiskFactorsArg::Unknown => RiskFactorStatus::Unknown,
            RiskFactorsArg::Absent => RiskFactorStatus::Absent,
            RiskFactorsArg::Present => RiskFactorStatus::Present,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("could not read file {:?}", args.input))?;

    let config = ClassifierConfig {
        risk_factors: args.risk_factors.into(),
    };
    let report = classify_request_str(&data, &config)
        .with_context(|| format!("could not classify {:?}", args.input))?;

    tracing::info!(
        results = report.results.len(),
        advisories = report.advisories.len(),
        "classified request"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for advisory in &report.advisories {
        println!("Warning: {}", advisory.message());
    }

    for result in &report.results {
        println!(
            "{}  {:>6.1} h  {:>5} mg/dL ({})  {} risk",
            result.measurement.drawn_at.format("%-m/%-d %H:%M"),
            result.age_hours,
            result.measurement.level,
            result.measurement.method.label(),
            result.risk_zone.label()
        );
        if let Some(text) = &result.follow_up.without_risk_factors {
            println!("    without risk factors: {text}");
        }
        if let Some(text) = &result.follow_up.with_risk_factors {
            println!("    with risk factors:    {text}");
        }
        for note in &result.treatment_notes {
            println!("    {note}");
        }
    }

    Ok(())
}
