use crate::service::SearchReport;
use anyhow::Result;
use serde_json::json;

const MAX_VALUE_CHARS: usize = 300;

/// Compact markdown listing of a report, one `### Result n` block per row.
pub fn render_markdown(report: &SearchReport) -> String {
    let mut lines = Vec::new();
    let mode = format!(" | **Mode:** {}", report.mode);
    match &report.stack {
        Some(stack) => {
            lines.push("## UI/UX Builder Stack Guidelines".to_string());
            lines.push(format!(
                "**Stack:** {stack} | **Query:** {}{mode}",
                report.query
            ));
        }
        None => {
            lines.push("## UI/UX Builder Search Results".to_string());
            lines.push(format!(
                "**Domain:** {} | **Query:** {}{mode}",
                report.domain, report.query
            ));
        }
    }
    lines.push(format!(
        "**Source:** {} | **Found:** {} results\n",
        report.file, report.count
    ));

    for (i, row) in report.results.iter().enumerate() {
        lines.push(format!("### Result {}", i + 1));
        for (field, value) in row.iter() {
            lines.push(format!("- **{field}:** {}", truncate_value(value)));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

pub fn render_json(report: &SearchReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Error text in the same format the report would have used.
pub fn render_error(err: &anyhow::Error, as_json: bool) -> String {
    let message = format!("{err:#}");
    if as_json {
        serde_json::to_string_pretty(&json!({ "error": message }))
            .unwrap_or_else(|_| format!("{{\"error\": {message:?}}}"))
    } else {
        format!("Error: {message}")
    }
}

fn truncate_value(value: &str) -> String {
    match value.char_indices().nth(MAX_VALUE_CHARS) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}
