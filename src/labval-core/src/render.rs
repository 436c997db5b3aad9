//! Console rendering of exchange outcomes.

use comfy_table::presets::ASCII_FULL;
use comfy_table::{ColumnConstraint, ContentArrangement, Table, Width};

use crate::types::Finding;

const HEADERS: [&str; 4] = ["TYPE", "ID", "FINDING", "SEVERITY"];
const FINDING_COLUMN: usize = 2;
const FINDING_WIDTH: u16 = 60;

/// Success text pointing the user at the follow-up URL.
#[must_use]
pub fn success_message(follow_up_url: &str, encoded_token: &str) -> String {
    format!(
        "labs validation success!\nVisit {url}?{token} or visit {url} and enter this token to continue:\n\n{token}\n\n",
        url = follow_up_url,
        token = encoded_token,
    )
}

/// Rejection text, followed by the findings table when findings were sent.
#[must_use]
pub fn rejection_report(subject: &str, message: &str, findings: Option<&[Finding]>) -> String {
    let mut out = format!(
        "There was an error validating your {}\nError message: '{}'\n",
        subject, message
    );
    if let Some(findings) = findings {
        out.push_str("\nOutstanding Findings:\n");
        out.push_str(&findings_table(findings));
    }
    out
}

/// Render findings as a bordered table.
///
/// Each finding contributes three rows (title, description, message). Type,
/// ID and severity are printed on the first row only, so the finding reads as
/// one merged block.
#[must_use]
pub fn findings_table(findings: &[Finding]) -> String {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(HEADERS);

    for finding in findings {
        for (i, text) in [&finding.title, &finding.description, &finding.message]
            .into_iter()
            .enumerate()
        {
            let (kind, id, severity) = if i == 0 {
                (finding.kind.as_str(), finding.id.as_str(), finding.severity.as_str())
            } else {
                ("", "", "")
            };
            table.add_row([kind, id, text.as_str(), severity]);
        }
    }

    if let Some(column) = table.column_mut(FINDING_COLUMN) {
        column.set_constraint(ColumnConstraint::UpperBoundary(Width::Fixed(FINDING_WIDTH)));
    }

    format!("{table}\n")
}
