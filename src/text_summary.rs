//! Text summary builder for CLI output.
//!
//! Formats a terminal outcome as human-readable lines for text mode.

use crate::model::OutcomeRecord;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build a text summary from the outcome record.
pub(crate) fn build_text_summary(record: &OutcomeRecord) -> TextSummary {
    let mut lines = Vec::new();
    lines.push("Container updated successfully".to_string());
    lines.push(format!(
        "Renamed: {}",
        if record.renamed { "yes" } else { "no" }
    ));
    lines.push(format!(
        "Labels updated: {}",
        if record.labels_updated { "yes" } else { "no" }
    ));
    if record.final_id != record.container_id {
        lines.push(format!(
            "Container reissued: {} -> {}",
            record.container_id, record.final_id
        ));
    } else {
        lines.push(format!("Container id: {}", record.final_id));
    }
    lines.push(format!("Server: {}", record.base_url));
    TextSummary { lines }
}
