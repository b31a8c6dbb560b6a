// ============================================================
// Layer 3 — Example Domain Types
// ============================================================
// One JSON line of a dataset file maps onto one of these.
//
//   {"text": "good movie", "label": 1}
//   {"id": 17, "text": "bad film"}          ← prediction input
//
// The `id` field is optional on labelled records and required
// on records we only predict for, because the prediction file
// is keyed by it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A text with its binary class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledExample {
    /// Free text, tokenised later by the preprocessor
    pub text: String,

    /// 0 or 1; the loader rejects anything else
    pub label: u8,

    /// Carried through untouched when the source record has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

#[cfg(test)]
impl LabeledExample {
    pub fn new(text: impl Into<String>, label: u8) -> Self {
        Self {
            text:  text.into(),
            label,
            id:    None,
        }
    }
}

/// A record to score with the trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlabeledRecord {
    pub id:   Value,
    pub text: String,
}

impl UnlabeledRecord {
    /// Render the id the way it should appear in a prediction file:
    /// strings without their JSON quotes, everything else as JSON.
    pub fn id_string(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other            => other.to_string(),
        }
    }
}
