//! Human-readable output formatter with colors and styling.

use super::formatter::Notices;
use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use imgward_core::ReportSummary;
use imgward_core::ScanOutcome;
use imgward_core::Verdict;
use imgward_core::report::markdown::av_cell;
use imgward_core::report::markdown::header_cell;
use std::time::Duration;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err: Term::stderr(),
        }
    }

    fn summary_lines(summary: &ReportSummary) -> Vec<String> {
        vec![
            format!("  Files scanned:       {}", summary.total),
            format!("  Clean:               {}", summary.av_clean),
            format!("  Malicious:           {}", summary.malicious),
            format!("  Invalid images:      {}", summary.integrity_failures),
            format!("  Suspicious metadata: {}", summary.metadata_flagged),
            format!("  Scanner errors:      {}", summary.av_errors),
        ]
    }

    /// Indented description of one verdict, without the file name.
    fn verdict_lines(verdict: &Verdict) -> Vec<String> {
        let mut lines = vec![format!("    Header:    {}", header_cell(verdict.declared_format))];

        match verdict.integrity.reason() {
            None => lines.push("    Integrity: ok".to_string()),
            Some(reason) => lines.push(format!("    Integrity: not a valid image: {reason}")),
        }

        let mut findings = verdict.findings().peekable();
        if findings.peek().is_none() {
            lines.push("    Metadata:  no findings".to_string());
        } else {
            for anomaly in findings {
                lines.push(format!("    Metadata:  {anomaly}"));
            }
        }

        lines.push(format!("    ClamAV:    {}", av_cell(&verdict.av_status)));
        lines
    }

    fn format_duration(duration: Duration) -> String {
        let millis = duration.as_millis();
        if millis >= 1000 {
            format!("{:.1}s", duration.as_secs_f64())
        } else {
            format!("{millis}ms")
        }
    }

    fn write_file_heading(&self, name: &str, flagged: bool) {
        let line = match (self.use_colors, flagged) {
            (true, true) => format!("{} {}", style("⚠").yellow().bold(), style(name).bold()),
            (true, false) => format!("{} {name}", style("✓").green()),
            (false, true) => format!("[FLAGGED] {name}"),
            (false, false) => format!("[ok] {name}"),
        };
        let _ = self.term.write_line(&line);
    }

    fn write_notices(&self, notices: &Notices) {
        if !self.quiet {
            for warning in &notices.warnings {
                self.write_warning(warning);
            }
        }
        if let Some(failure) = &notices.failure {
            self.write_error(failure);
        }
    }

    fn write_warning(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .err
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err.write_line(&format!("WARNING: {message}"));
        }
    }

    fn write_error(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .err
                .write_line(&format!("{} {message}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err.write_line(&format!("ERROR: {message}"));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_scan_result(&self, outcome: &ScanOutcome, notices: &Notices) -> Result<()> {
        if self.quiet {
            self.write_notices(notices);
            return Ok(());
        }

        let path = outcome.output_path.display();
        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Report generated: {path}",
                style("✓").green().bold()
            ));
        } else {
            let _ = self.term.write_line(&format!("Report generated: {path}"));
        }

        let summary = outcome.report.summary();
        for line in Self::summary_lines(&summary) {
            let _ = self.term.write_line(&line);
        }

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Duration:            {}",
                Self::format_duration(outcome.duration)
            ));
            for entry in outcome.report.entries() {
                let _ = self.term.write_line("");
                self.write_file_heading(&entry.file_name, entry.verdict.is_flagged());
                for line in Self::verdict_lines(&entry.verdict) {
                    let _ = self.term.write_line(&line);
                }
            }
        }

        self.write_notices(notices);
        Ok(())
    }

    fn format_verdict(&self, verdict: &Verdict, notices: &Notices) -> Result<()> {
        if !self.quiet {
            self.write_file_heading(&verdict.path().display().to_string(), verdict.is_flagged());
            for line in Self::verdict_lines(verdict) {
                let _ = self.term.write_line(&line);
            }
        }

        self.write_notices(notices);
        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        self.write_error(&format!("{error:?}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgward_core::Anomaly;
    use imgward_core::AvStatus;
    use imgward_core::DeclaredFormat;
    use imgward_core::Integrity;

    #[test]
    fn test_verdict_lines_clean() {
        let verdict = Verdict::new(
            "cat.jpg",
            DeclaredFormat::Jpeg,
            Integrity::Ok,
            Vec::new(),
            AvStatus::Clean,
        );
        assert_eq!(
            HumanFormatter::verdict_lines(&verdict),
            vec![
                "    Header:    JPEG",
                "    Integrity: ok",
                "    Metadata:  no findings",
                "    ClamAV:    ✅ Clean",
            ]
        );
    }

    #[test]
    fn test_verdict_lines_flagged() {
        let verdict = Verdict::new(
            "x.png",
            DeclaredFormat::Unknown,
            Integrity::Failed("bad signature".to_string()),
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
            AvStatus::Error("failed to start clamscan".to_string()),
        );
        let lines = HumanFormatter::verdict_lines(&verdict);

        assert_eq!(lines[0], "    Header:    ⚠️ Not a standard image header");
        assert_eq!(lines[1], "    Integrity: not a valid image: bad signature");
        assert_eq!(lines[2], "    Metadata:  EXIF UserComment: suspicious length");
        assert_eq!(lines[3], "    Metadata:  EXIF UserComment: contains code");
        assert!(lines[4].contains("Error running ClamAV"));
    }

    #[test]
    fn test_summary_lines() {
        let summary = ReportSummary {
            total: 4,
            av_clean: 2,
            malicious: 1,
            av_errors: 1,
            integrity_failures: 1,
            metadata_flagged: 2,
            flagged: 3,
        };
        let lines = HumanFormatter::summary_lines(&summary);
        assert_eq!(lines[0], "  Files scanned:       4");
        assert_eq!(lines[2], "  Malicious:           1");
        assert_eq!(lines[5], "  Scanner errors:      1");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(HumanFormatter::format_duration(Duration::from_millis(42)), "42ms");
        assert_eq!(HumanFormatter::format_duration(Duration::from_millis(1500)), "1.5s");
    }
}
