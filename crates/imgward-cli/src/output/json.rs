//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::Notices;
use super::formatter::OutputFormatter;
use anyhow::Result;
use imgward_core::ReportSummary;
use imgward_core::ScanOutcome;
use imgward_core::Verdict;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter {
    operation: &'static str,
}

#[derive(Debug, Serialize)]
struct SummaryOutput {
    total: usize,
    av_clean: usize,
    malicious: usize,
    av_errors: usize,
    integrity_failures: usize,
    metadata_flagged: usize,
    flagged: usize,
}

impl From<ReportSummary> for SummaryOutput {
    fn from(s: ReportSummary) -> Self {
        Self {
            total: s.total,
            av_clean: s.av_clean,
            malicious: s.malicious,
            av_errors: s.av_errors,
            integrity_failures: s.integrity_failures,
            metadata_flagged: s.metadata_flagged,
            flagged: s.flagged,
        }
    }
}

#[derive(Debug, Serialize)]
struct IntegrityOutput<'a> {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct AnomalyOutput<'a> {
    kind: &'static str,
    tag: Option<&'a str>,
    message: String,
}

#[derive(Debug, Serialize)]
struct AntivirusOutput<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct FileOutput<'a> {
    file: String,
    header: &'static str,
    integrity: IntegrityOutput<'a>,
    anomalies: Vec<AnomalyOutput<'a>>,
    antivirus: AntivirusOutput<'a>,
    flagged: bool,
}

impl<'a> FileOutput<'a> {
    /// Only metadata findings are listed; a clean file has no anomalies.
    fn new(file: String, verdict: &'a Verdict) -> Self {
        Self {
            file,
            header: verdict.declared_format.as_str(),
            integrity: IntegrityOutput {
                valid: verdict.integrity_ok(),
                reason: verdict.integrity.reason(),
            },
            anomalies: verdict
                .findings()
                .map(|a| AnomalyOutput {
                    kind: a.kind(),
                    tag: a.tag(),
                    message: a.to_string(),
                })
                .collect(),
            antivirus: AntivirusOutput {
                status: verdict.av_status.as_str(),
                detail: verdict.av_status.diagnostic(),
            },
            flagged: verdict.is_flagged(),
        }
    }
}

impl JsonFormatter {
    pub const fn new(operation: &'static str) -> Self {
        Self { operation }
    }

    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_scan_result(&self, outcome: &ScanOutcome, notices: &Notices) -> Result<()> {
        #[derive(Serialize)]
        struct ScanOutput<'a> {
            report_path: String,
            duration_ms: u128,
            summary: SummaryOutput,
            files: Vec<FileOutput<'a>>,
        }

        let data = ScanOutput {
            report_path: outcome.output_path.display().to_string(),
            duration_ms: outcome.duration.as_millis(),
            summary: outcome.report.summary().into(),
            files: outcome
                .report
                .entries()
                .iter()
                .map(|e| FileOutput::new(e.file_name.clone(), &e.verdict))
                .collect(),
        };

        Self::output(&JsonOutput::with_notices(self.operation, data, notices))
    }

    fn format_verdict(&self, verdict: &Verdict, notices: &Notices) -> Result<()> {
        let data = FileOutput::new(verdict.path().display().to_string(), verdict);
        Self::output(&JsonOutput::with_notices(self.operation, data, notices))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error(self.operation, format!("{error:?}"));
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use imgward_core::Anomaly;
    use imgward_core::AvStatus;
    use imgward_core::DeclaredFormat;
    use imgward_core::Integrity;
    use serde_json::Value;

    #[test]
    fn test_file_output_for_flagged_verdict() {
        let verdict = Verdict::new(
            "images/x.jpg",
            DeclaredFormat::Unknown,
            Integrity::Failed("unsupported format".to_string()),
            vec![Anomaly::ContainsCode {
                tag: "Image Artist".to_string(),
                token: "php".to_string(),
            }],
            AvStatus::Malicious {
                signature: Some("Php.Webshell-1".to_string()),
            },
        );

        let value = serde_json::to_value(FileOutput::new("x.jpg".to_string(), &verdict)).unwrap();

        assert_eq!(value["file"], "x.jpg");
        assert_eq!(value["header"], "unknown");
        assert_eq!(value["integrity"]["valid"], false);
        assert_eq!(value["integrity"]["reason"], "unsupported format");
        assert_eq!(value["anomalies"][0]["kind"], "contains_code");
        assert_eq!(value["anomalies"][0]["tag"], "Image Artist");
        assert_eq!(value["antivirus"]["status"], "malicious");
        assert_eq!(value["antivirus"]["detail"], "Php.Webshell-1");
        assert_eq!(value["flagged"], true);
    }

    #[test]
    fn test_clean_verdict_has_no_anomalies() {
        let verdict = Verdict::new(
            "cat.png",
            DeclaredFormat::Png,
            Integrity::Ok,
            Vec::new(),
            AvStatus::Clean,
        );

        let value = serde_json::to_value(FileOutput::new("cat.png".to_string(), &verdict)).unwrap();

        assert_eq!(value["anomalies"], Value::Array(Vec::new()));
        assert!(value["integrity"].get("reason").is_none());
        assert!(value["antivirus"].get("detail").is_none());
        assert_eq!(value["flagged"], false);
    }

    #[test]
    fn test_error_envelope() {
        let output = JsonOutput::<()>::error("scan", "boom");
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["operation"], "scan");
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "boom");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_envelope_status_follows_notices() {
        let mut notices = Notices::default();
        let clean = serde_json::to_value(JsonOutput::with_notices("scan", 1, &notices)).unwrap();
        assert_eq!(clean["status"], "success");
        assert!(clean.get("warnings").is_none());
        assert!(clean.get("error").is_none());

        notices.warn("Antivirus could not scan 2 of 2 files");
        let warned = serde_json::to_value(JsonOutput::with_notices("scan", 1, &notices)).unwrap();
        assert_eq!(warned["status"], "warning");
        assert_eq!(warned["warnings"][0], "Antivirus could not scan 2 of 2 files");
        assert_eq!(warned["data"], 1);

        notices.fail("1 of 2 files flagged (--strict)");
        let failed = serde_json::to_value(JsonOutput::with_notices("scan", 1, &notices)).unwrap();
        assert_eq!(failed["status"], "error");
        assert_eq!(failed["error"], "1 of 2 files flagged (--strict)");
        assert_eq!(failed["warnings"].as_array().unwrap().len(), 1);
        assert_eq!(failed["data"], 1);
    }
}
