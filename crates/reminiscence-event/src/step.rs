//! Steps of an event's sequence

use serde::{Deserialize, Serialize};

/// One unit of event playback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStep {
    /// A character line; `text` is a key into the event's language map
    Dialog {
        name: String,
        text: String,
        icon: String,
    },
    /// Narration without a speaker
    Text(String),
}

impl EventStep {
    /// Create a dialog step
    pub fn dialog(name: impl Into<String>, text: impl Into<String>, icon: impl Into<String>) -> Self {
        EventStep::Dialog {
            name: name.into(),
            text: text.into(),
            icon: icon.into(),
        }
    }

    /// Create a narration step
    pub fn text(content: impl Into<String>) -> Self {
        EventStep::Text(content.into())
    }

    /// The language-map key of the displayed text
    pub fn text_key(&self) -> &str {
        match self {
            EventStep::Dialog { text, .. } => text,
            EventStep::Text(content) => content,
        }
    }
}
