//! Runs the hand-labelled comparison cases against a live model.
//!
//! Every case is scored through the comparison pipeline and printed next to
//! its expected groundedness and thoroughness.
//!
//! Run with:
//! ```bash
//! OPENAI_API_KEY=your-key cargo run --example fact_comparator_cases
//! ```
//!
//! `FACTDIFF_CONFIG` may point at a YAML/JSON [`EvalConfig`] file to pick
//! other models or settings.

use factdiff::evals::{cases_from_yaml_str, CalibrationSummary, Calibrator};
use factdiff::prelude::*;

const CASES: &str = include_str!("calibration_cases.yaml");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for debugging
    tracing_subscriber::fmt::init();

    println!("🔎 Fact Comparator Cases\n");

    let config = match std::env::var("FACTDIFF_CONFIG") {
        Ok(path) => EvalConfig::from_file(path)?,
        Err(_) => EvalConfig {
            settings: ModelSettings::new().temperature(0.0),
            ..EvalConfig::new("openai:gpt-4")
        },
    };
    println!("Model: {}\n", config.model);

    let cases = cases_from_yaml_str(CASES)?;
    let calibrator = Calibrator::new(config.pipeline()?);

    println!("Running {} cases...\n", cases.len());
    let rows = calibrator.run(&cases).await;

    println!("Performance Report:");
    for (i, (case, row)) in cases.iter().zip(&rows).enumerate() {
        println!("Case {}: {}", i + 1, case.name);
        if let Some(description) = &case.description {
            println!("  Description: {description}");
        }
        println!("  Answer: '{}'", case.answer);
        println!("  Context: '{}'", case.context);
        print!("{row}");
        if let Some(comparison) = &row.comparison {
            println!("  Raw Result: {}", serde_json::to_string(comparison)?);
        }
        println!();
    }

    println!("Summary:\n{}", CalibrationSummary::from_rows(&rows));

    Ok(())
}
