//! Markdown rendering.

use std::fmt::Write;

use super::Report;
use crate::types::AvStatus;
use crate::types::DeclaredFormat;
use crate::types::Verdict;

/// First line of every rendered report.
pub const REPORT_TITLE: &str = "# Image Security Scan Report";

const TABLE_HEADER: &str = "| File | Header | Metadata/Stego Check | ClamAV |\n\
                            |------|--------|----------------------|--------|\n";

/// Renders a report as a Markdown table, one row per file.
///
/// Output is a pure function of the report, so an unchanged scan renders to
/// identical bytes.
///
/// # Examples
///
/// ```
/// use imgward_core::Report;
/// use imgward_core::render_markdown;
///
/// let text = render_markdown(&Report::default());
/// assert!(text.starts_with("# Image Security Scan Report\n\n| File |"));
/// ```
#[must_use]
pub fn render_markdown(report: &Report) -> String {
    let mut out = String::with_capacity(128 + report.len() * 96);
    out.push_str(REPORT_TITLE);
    out.push_str("\n\n");
    out.push_str(TABLE_HEADER);

    for entry in report.entries() {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            escape_cell(&entry.file_name),
            header_cell(entry.verdict.declared_format),
            escape_cell(&metadata_cell(&entry.verdict)),
            escape_cell(&av_cell(&entry.verdict.av_status)),
        );
    }

    out
}

/// Header column text.
#[must_use]
pub const fn header_cell(format: DeclaredFormat) -> &'static str {
    match format {
        DeclaredFormat::Jpeg => "JPEG",
        DeclaredFormat::Png => "PNG",
        DeclaredFormat::Unknown => "⚠️ Not a standard image header",
    }
}

/// Metadata column text: the decode failure, if any, then the anomalies,
/// joined with `"; "`.
///
/// The "nothing found" sentinel is dropped when the decode failed, since the
/// cell is not clean in that case.
#[must_use]
pub fn metadata_cell(verdict: &Verdict) -> String {
    let mut parts = Vec::with_capacity(verdict.anomalies.len() + 1);
    if let Some(reason) = verdict.integrity.reason() {
        parts.push(format!("⚠️ Not a valid image: {reason}"));
    }
    for anomaly in &verdict.anomalies {
        if anomaly.is_finding() || verdict.integrity_ok() {
            parts.push(anomaly.to_string());
        }
    }
    parts.join("; ")
}

/// Antivirus column text.
#[must_use]
pub fn av_cell(status: &AvStatus) -> String {
    match status {
        AvStatus::Clean => "✅ Clean".to_string(),
        AvStatus::Malicious { signature: None } => "⚠️ Malicious".to_string(),
        AvStatus::Malicious {
            signature: Some(signature),
        } => format!("⚠️ Malicious ({signature})"),
        AvStatus::Unknown(raw) => format!("❓ Unknown ({raw})"),
        AvStatus::Error(reason) => format!("Error running ClamAV: {reason}"),
    }
}

/// Keeps arbitrary text inside a single table cell.
fn escape_cell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;
    for c in text.chars() {
        match c {
            '|' => {
                out.push_str("\\|");
                last_was_space = false;
            }
            '\r' | '\n' => {
                if !last_was_space {
                    out.push(' ');
                }
                last_was_space = true;
            }
            _ => {
                out.push(c);
                last_was_space = c == ' ';
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportEntry;
    use crate::types::Anomaly;
    use crate::types::Integrity;
    use crate::types::NO_INDICATORS;

    fn row(file_name: &str, verdict: Verdict) -> ReportEntry {
        ReportEntry {
            file_name: file_name.to_string(),
            verdict,
        }
    }

    #[test]
    fn test_empty_report_renders_header_only() {
        let text = render_markdown(&Report::default());
        assert_eq!(
            text,
            "# Image Security Scan Report\n\n\
             | File | Header | Metadata/Stego Check | ClamAV |\n\
             |------|--------|----------------------|--------|\n"
        );
    }

    #[test]
    fn test_clean_row() {
        let verdict = Verdict::new(
            "cat.jpg",
            DeclaredFormat::Jpeg,
            Integrity::Ok,
            Vec::new(),
            AvStatus::Clean,
        );
        let text = render_markdown(&Report::new(vec![row("cat.jpg", verdict)]));
        assert!(text.ends_with(&format!("| cat.jpg | JPEG | {NO_INDICATORS} | ✅ Clean |\n")));
    }

    #[test]
    fn test_anomalies_joined() {
        let verdict = Verdict::new(
            "x.png",
            DeclaredFormat::Png,
            Integrity::Ok,
            vec![
                Anomaly::SuspiciousLength {
                    tag: "EXIF UserComment".to_string(),
                    length: 900,
                },
                Anomaly::ContainsCode {
                    tag: "EXIF UserComment".to_string(),
                    token: "powershell".to_string(),
                },
            ],
            AvStatus::Malicious { signature: None },
        );
        assert_eq!(
            metadata_cell(&verdict),
            "EXIF UserComment: suspicious length; EXIF UserComment: contains code"
        );
        let text = render_markdown(&Report::new(vec![row("x.png", verdict)]));
        assert!(text.contains("| x.png | PNG | EXIF UserComment: suspicious length; "));
        assert!(text.contains("| ⚠️ Malicious |"));
    }

    #[test]
    fn test_integrity_failure_replaces_sentinel() {
        let verdict = Verdict::new(
            "fake.png",
            DeclaredFormat::Unknown,
            Integrity::Failed("Invalid PNG signature".to_string()),
            Vec::new(),
            AvStatus::Clean,
        );
        assert_eq!(
            metadata_cell(&verdict),
            "⚠️ Not a valid image: Invalid PNG signature"
        );
        assert_eq!(header_cell(verdict.declared_format), "⚠️ Not a standard image header");
    }

    #[test]
    fn test_integrity_failure_keeps_findings() {
        let verdict = Verdict::new(
            "odd.jpg",
            DeclaredFormat::Jpeg,
            Integrity::Failed("eof".to_string()),
            vec![Anomaly::ContainsCode {
                tag: "Image Artist".to_string(),
                token: "php".to_string(),
            }],
            AvStatus::Clean,
        );
        assert_eq!(
            metadata_cell(&verdict),
            "⚠️ Not a valid image: eof; Image Artist: contains code"
        );
    }

    #[test]
    fn test_av_cells() {
        assert_eq!(av_cell(&AvStatus::Clean), "✅ Clean");
        assert_eq!(
            av_cell(&AvStatus::Malicious {
                signature: Some("Eicar".to_string())
            }),
            "⚠️ Malicious (Eicar)"
        );
        assert_eq!(
            av_cell(&AvStatus::Unknown("LibClamAV Error".to_string())),
            "❓ Unknown (LibClamAV Error)"
        );
        assert_eq!(
            av_cell(&AvStatus::Error("no such file".to_string())),
            "Error running ClamAV: no such file"
        );
    }

    #[test]
    fn test_cells_are_escaped() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
        assert_eq!(escape_cell("line one\nline two\r\n\nend"), "line one line two end");
        assert_eq!(escape_cell("trailing \nspace"), "trailing space");
    }

    #[test]
    fn test_multiline_unknown_output_stays_on_one_row() {
        let verdict = Verdict::new(
            "a.jpg",
            DeclaredFormat::Jpeg,
            Integrity::Ok,
            Vec::new(),
            AvStatus::Unknown("first\nsecond | third".to_string()),
        );
        let text = render_markdown(&Report::new(vec![row("a.jpg", verdict)]));
        let rows: Vec<_> = text.lines().filter(|l| l.starts_with("| a.jpg")).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains("❓ Unknown (first second \\| third)"));
    }
}
