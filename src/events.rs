use serde::{Deserialize, Serialize};

/// One increment of generated documentation delivered over the stream.
///
/// At least one field is present on a well-formed event; an all-absent
/// record is treated as malformed by the parser. No ordering field is
/// carried in-band — ordering is arrival order over the single stream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocStreamEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}

impl DocStreamEvent {
    pub fn is_empty(&self) -> bool {
        self.step.is_none() && self.content.is_none() && self.complete.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.complete.unwrap_or(false)
    }
}

/// Running aggregate of a generation stream for callers that want the
/// assembled document rather than raw deltas.
#[derive(Debug, Clone, Default)]
pub struct DocEventAccumulator {
    pub steps: Vec<String>,
    pub content: String,
    pub completed: bool,
}

impl DocEventAccumulator {
    pub fn push(&mut self, event: &DocStreamEvent) {
        if let Some(step) = event.step.as_deref() {
            self.steps.push(step.to_owned());
        }
        if let Some(content) = event.content.as_deref() {
            self.content.push_str(content);
        }
        if event.is_complete() {
            self.completed = true;
        }
    }
}
