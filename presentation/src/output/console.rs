//! Console output formatter for consensus reports

use colored::Colorize;
use council_domain::{ConsensusReport, Severity, Verdict};

/// Formats consensus reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report: verdict, reviewer outcomes, and every
    /// finding grouped by severity.
    pub fn format(report: &ConsensusReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Configuration Review Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Review:".cyan().bold(),
            report.correlation_id
        ));
        output.push_str(&format!(
            "{} {}\n\n",
            "Verdict:".cyan().bold(),
            Self::verdict_banner(&report.verdict)
        ));

        // Reviewer outcomes
        output.push_str(&Self::section_header("Reviewers"));
        for summary in &report.reviewers {
            match &summary.failure {
                None => output.push_str(&format!(
                    "  {} {} reported {} finding(s)\n",
                    "[ok]".green(),
                    summary.reviewer.bold(),
                    summary.reported
                )),
                Some(reason) => output.push_str(&format!(
                    "  {} {} {}\n",
                    "[failed]".red(),
                    summary.reviewer.bold(),
                    reason
                )),
            }
        }

        // Severity tally
        let counts = report.severity_counts();
        output.push_str(&Self::section_header("Issues"));
        output.push_str(&format!("  Total: {}\n", counts.total()));
        output.push_str(&format!("    Critical: {}\n", counts.critical));
        output.push_str(&format!("    High:     {}\n", counts.high));
        output.push_str(&format!("    Medium:   {}\n", counts.medium));
        output.push_str(&format!("    Low:      {}\n", counts.low));

        // Findings grouped by severity; the merged set is already sorted
        // by descending severity.
        let mut current_severity: Option<Severity> = None;
        for finding in &report.findings {
            if current_severity != Some(finding.severity) {
                current_severity = Some(finding.severity);
                output.push_str(&format!(
                    "\n{}\n",
                    format!("--- {} ---", finding.severity.as_str().to_uppercase()).bold()
                ));
            }

            let sources = finding
                .sources
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&format!(
                "\n[{}] {}\n",
                sources.yellow(),
                finding.message
            ));
            if !finding.location.path.is_empty() {
                output.push_str(&format!("   at {}\n", finding.location));
            }
            if let Some(fix) = &finding.suggested_fix {
                output.push_str(&format!("   fix: {}\n", fix.dimmed()));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &ConsensusReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Concise output: verdict, tally, and blocking findings only.
    pub fn format_summary(report: &ConsensusReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            "Verdict:".cyan().bold(),
            Self::verdict_banner(&report.verdict)
        ));

        let ok = report.succeeded_reviewers().count();
        output.push_str(&format!(
            "{} {}/{} responded\n",
            "Reviewers:".dimmed(),
            ok,
            report.reviewers.len()
        ));
        for summary in report.failed_reviewers() {
            let reason = summary
                .failure
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            output.push_str(&format!("  {} {} {}\n", "!".red(), summary.reviewer, reason));
        }

        let counts = report.severity_counts();
        output.push_str(&format!(
            "{} {} total ({} critical, {} high, {} medium, {} low)\n",
            "Issues:".dimmed(),
            counts.total(),
            counts.critical,
            counts.high,
            counts.medium,
            counts.low
        ));

        for finding in report.blocking_findings() {
            output.push_str(&format!(
                "  {} [{}] {}",
                "*".red().bold(),
                finding.severity.as_str().to_uppercase(),
                finding.message
            ));
            if !finding.location.path.is_empty() {
                output.push_str(&format!(" ({})", finding.location));
            }
            output.push('\n');
        }

        output
    }

    fn verdict_banner(verdict: &Verdict) -> String {
        match verdict {
            Verdict::Pass => "PASS".green().bold().to_string(),
            Verdict::Fail => "FAIL".red().bold().to_string(),
            Verdict::Indeterminate => "INDETERMINATE".yellow().bold().to_string(),
        }
    }

    fn header(title: &str) -> String {
        format!(
            "{}\n{}\n{}\n",
            "=".repeat(60),
            title.cyan().bold(),
            "=".repeat(60)
        )
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n", title.cyan().bold())
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60))
    }
}
