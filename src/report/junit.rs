use super::types::RunReport;
use crate::journey::state::{StepReport, StepStatus};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

/// Generate JUnit XML report string from a finished run
pub fn generate_junit_xml(report: &RunReport) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total_tests = report.steps.len();
    let failures = report
        .steps
        .iter()
        .filter(|s| matches!(s.status, StepStatus::Failed { .. }))
        .count();
    let skipped = report
        .steps
        .iter()
        .filter(|s| matches!(s.status, StepStatus::Skipped { .. }))
        .count();
    let total_duration = report.summary.total_duration_ms.unwrap_or(0);

    // <testsuites>
    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "humanflow-run"));
    suites_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suites_start.push_attribute(("failures", failures.to_string().as_str()));
    suites_start.push_attribute(("skipped", skipped.to_string().as_str()));
    suites_start.push_attribute((
        "time",
        (total_duration as f64 / 1000.0).to_string().as_str(),
    ));
    writer.write_event(Event::Start(suites_start))?;

    // A run is one suite; each journey step maps to one test case.
    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", "journey"));
    suite_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suite_start.push_attribute(("failures", failures.to_string().as_str()));
    suite_start.push_attribute(("skipped", skipped.to_string().as_str()));
    suite_start.push_attribute(("id", report.run_id.as_str()));
    suite_start.push_attribute((
        "time",
        (total_duration as f64 / 1000.0).to_string().as_str(),
    ));
    suite_start.push_attribute(("timestamp", report.generated_at.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    for step in &report.steps {
        write_test_case(&mut writer, step)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let result = writer.into_inner().into_inner();
    let xml = String::from_utf8(result)?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(writer: &mut Writer<W>, step: &StepReport) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", step.name.as_str()));
    case_start.push_attribute(("classname", "humanflow.journey"));
    case_start.push_attribute((
        "time",
        (step.duration_ms.unwrap_or(0) as f64 / 1000.0)
            .to_string()
            .as_str(),
    ));
    writer.write_event(Event::Start(case_start))?;

    match &step.status {
        StepStatus::Failed { error } => {
            let mut fail_start = BytesStart::new("failure");
            fail_start.push_attribute(("message", error.as_str()));
            fail_start.push_attribute(("type", "StepFailure"));
            writer.write_event(Event::Start(fail_start))?;
            writer.write_event(Event::Text(quick_xml::events::BytesText::new(error)))?;
            writer.write_event(Event::End(BytesEnd::new("failure")))?;
        }
        StepStatus::Skipped { reason } => {
            let mut skip_start = BytesStart::new("skipped");
            skip_start.push_attribute(("message", reason.as_str()));
            writer.write_event(Event::Empty(skip_start))?;
        }
        _ => {}
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Write report to file
pub fn write_report(report: &RunReport, output_dir: &Path) -> Result<()> {
    let xml = generate_junit_xml(report)?;
    let path = output_dir.join("junit.xml");
    std::fs::write(&path, xml)?;
    println!("    Generated JUnit report: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::state::{RunOutcome, RunSummary, StepReport};

    #[test]
    fn test_generate_junit_xml() {
        let report = RunReport {
            run_id: "run-1".to_string(),
            steps: vec![
                StepReport {
                    index: 0,
                    name: "proxy-check".to_string(),
                    status: StepStatus::Skipped {
                        reason: "no proxy configured".to_string(),
                    },
                    duration_ms: Some(1),
                    screenshot_path: None,
                    retry_count: 0,
                },
                StepReport {
                    index: 1,
                    name: "login".to_string(),
                    status: StepStatus::Passed,
                    duration_ms: Some(1500),
                    screenshot_path: None,
                    retry_count: 0,
                },
                StepReport {
                    index: 2,
                    name: "browse-product-1".to_string(),
                    status: StepStatus::Failed {
                        error: "element not ready: add-to-cart".to_string(),
                    },
                    duration_ms: Some(2000),
                    screenshot_path: None,
                    retry_count: 2,
                },
            ],
            summary: RunSummary {
                run_id: "run-1".to_string(),
                total_steps: 3,
                passed: 1,
                failed: 1,
                skipped: 1,
                outcome: RunOutcome::CompletedWithPartialFailures {
                    passed: 1,
                    failed: 1,
                },
                total_duration_ms: Some(3501),
            },
            generated_at: "2023-01-01 12:00:00".to_string(),
        };

        let xml = generate_junit_xml(&report).expect("Failed to generate XML");

        assert!(xml.contains(r#"<testsuites name="humanflow-run""#));
        assert!(xml.contains(r#"tests="3""#));
        assert!(xml.contains(r#"failures="1""#));
        assert!(xml.contains(r#"skipped="1""#));
        assert!(xml.contains(r#"<testcase name="login""#));
        assert!(xml.contains(r#"message="element not ready: add-to-cart""#));
        assert!(xml.contains(r#"<skipped message="no proxy configured"/>"#));
    }
}
