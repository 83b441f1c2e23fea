pub mod json;
pub mod junit;
pub mod types;

use anyhow::Result;
use std::path::Path;

pub use types::RunReport;

/// Regenerate a report from a saved run JSON
pub async fn generate_report(
    results_path: &Path,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let results = std::fs::read_to_string(results_path)?;
    let report: RunReport = serde_json::from_str(&results)?;

    match format {
        "json" => json::generate(&report, output).await,
        "junit" => {
            let xml = junit::generate_junit_xml(&report)?;
            if let Some(path) = output {
                std::fs::write(path, xml)?;
                println!("JUnit report saved to: {}", path.display());
            } else {
                println!("{}", xml);
            }
            Ok(())
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    }
}

/// Write the run artifacts (run JSON, JUnit XML) under `output_dir`.
pub fn write_run_artifacts(report: &RunReport, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;

    let json_path = output_dir.join("run.json");
    std::fs::write(&json_path, serde_json::to_string_pretty(report)?)?;
    println!("    Run record saved to: {}", json_path.display());

    junit::write_report(report, output_dir)?;
    Ok(())
}
