//! Markdown report generation

use anyhow::Result;

use super::ReplayReport;
use crate::model::TurnStatus;

/// Markdown report generator
pub struct MarkdownReporter;

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

impl MarkdownReporter {
    pub fn generate(report: &ReplayReport) -> Result<String> {
        let mut md = String::new();

        md.push_str(&format!(
            "# Replay #{}: {}\n\n",
            report.replay.id,
            cell(&report.scenario.name)
        ));

        md.push_str("## Overview\n\n");
        md.push_str(&format!("- **Bot**: {}\n", report.scenario.bot_key));
        md.push_str(&format!("- **Reference**: {}\n", report.version_label));
        md.push_str(&format!(
            "- **Run**: {}\n",
            report.replay.last_run.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        md.push_str(&format!("- **Status**: {}\n", report.replay.status));
        md.push_str(&format!("- **Errors**: {}\n\n", report.replay.error_count));

        md.push_str("## Turns\n\n");
        md.push_str("| # | Role | Text | Status |\n");
        md.push_str("|---|------|------|--------|\n");
        for (index, turn) in report.turns.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                index,
                turn.turn.role(),
                cell(turn.turn.text()),
                turn.status
            ));
        }

        md.push_str("\n## Answers\n\n");
        md.push_str("| Question | Expected | Current | |\n");
        md.push_str("|----------|----------|---------|---|\n");
        for row in &report.rows {
            let mark = match row.status {
                TurnStatus::Matched => "✅",
                TurnStatus::Mismatched => "❌",
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                cell(&row.question),
                cell(row.reference_answer.as_deref().unwrap_or("-")),
                cell(row.current_answer.as_deref().unwrap_or("-")),
                mark
            ));
        }

        Ok(md)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_report;

    #[test]
    fn test_markdown_report() {
        let md = MarkdownReporter::generate(&sample_report()).unwrap();
        assert!(md.starts_with("# Replay #8: Library hours"));
        assert!(md.contains("- **Reference**: recording #3"));
        assert!(md.contains("| 1 | bot | closed on sunday | diff |"));
        assert!(md.contains("| open on sunday? | yes, 10 to 4 | closed on sunday | ❌ |"));
    }

    #[test]
    fn test_pipes_are_escaped() {
        assert_eq!(cell("a|b\nc"), "a\\|b c");
    }
}
