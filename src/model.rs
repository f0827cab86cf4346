use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub user_agent: String,
}

/// Container as reported by the server. Field casing follows the engine
/// wire format the management API proxies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Names", default)]
    pub names: Vec<String>,
    #[serde(rename = "Labels", default)]
    pub labels: HashMap<String, String>,
}

impl Container {
    /// First reported name with the engine's single leading `/` stripped.
    /// Containers with no names yield an empty display name.
    pub fn display_name(&self) -> &str {
        let raw = self.names.first().map(String::as_str).unwrap_or("");
        raw.strip_prefix('/').unwrap_or(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateStep {
    Rename,
    LabelUpdate,
}

impl UpdateStep {
    /// Human-readable step name for messages and summaries.
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateStep::Rename => "rename",
            UpdateStep::LabelUpdate => "label update",
        }
    }
}

/// Progress events emitted by the orchestrator and consumed by CLI layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UpdateEvent {
    StepStarted { step: UpdateStep },
    StepCompleted { step: UpdateStep, container_id: String },
}

impl UpdateEvent {
    /// Render a human-readable message for CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            UpdateEvent::StepStarted { step } => format!("{}…", capitalize(step.as_str())),
            UpdateEvent::StepCompleted { step, container_id } => {
                format!("{} done ({})", capitalize(step.as_str()), container_id)
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Terminal result of one submit attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    /// Authoritative container id after all updates. Label updates may
    /// reissue the container under a new id; this reflects the server's answer.
    pub final_id: String,
    pub renamed: bool,
    pub labels_updated: bool,
}

/// Outcome enriched with session context, ready for output and scripting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRecord {
    #[serde(default)]
    pub timestamp_utc: String,
    pub base_url: String,
    /// Id the edit session started from.
    pub container_id: String,
    pub final_id: String,
    pub renamed: bool,
    pub labels_updated: bool,
}

impl OutcomeRecord {
    pub fn new(base_url: &str, container_id: &str, outcome: &Outcome) -> Self {
        Self {
            timestamp_utc: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "now".into()),
            base_url: base_url.to_string(),
            container_id: container_id.to_string(),
            final_id: outcome.final_id.clone(),
            renamed: outcome.renamed,
            labels_updated: outcome.labels_updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_strips_one_leading_slash() {
        let c = Container {
            id: "c1".into(),
            names: vec!["/web-1".into()],
            labels: HashMap::new(),
        };
        assert_eq!(c.display_name(), "web-1");
    }

    #[test]
    fn display_name_strips_at_most_one_slash() {
        let c = Container {
            id: "c1".into(),
            names: vec!["//odd".into()],
            labels: HashMap::new(),
        };
        assert_eq!(c.display_name(), "/odd");
    }

    #[test]
    fn display_name_empty_when_unnamed() {
        let c = Container {
            id: "c1".into(),
            names: vec![],
            labels: HashMap::new(),
        };
        assert_eq!(c.display_name(), "");
    }

    #[test]
    fn container_deserializes_engine_casing() {
        let c: Container = serde_json::from_str(
            r#"{"Id":"abc","Names":["/db"],"Labels":{"env":"staging"}}"#,
        )
        .unwrap();
        assert_eq!(c.id, "abc");
        assert_eq!(c.display_name(), "db");
        assert_eq!(c.labels.get("env").map(String::as_str), Some("staging"));
    }
}
