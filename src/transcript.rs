/// Append-only conversation log shared by every turn of a run.
///
/// The transcript is the single piece of shared state in a pipeline run. It is
/// owned and mutated exclusively by the workflow driver; agents only ever see
/// an immutable snapshot of it.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Role identifier used for the seed message, scripted instructions, and
/// operator interventions.
pub const USER_ROLE: &str = "user";

/// Reference to an ingested input file, produced once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub path: PathBuf,
    pub media_type: String,
}

/// One conversation turn. Immutable once created; insertion order in the
/// transcript defines conversation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
    pub attachment: Option<Attachment>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: USER_ROLE.to_string(),
            content: content.into(),
            attachment: None,
        }
    }

    pub fn agent(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Append-only ordered message log. No API exists to remove or reorder
/// messages once pushed.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create a transcript holding only the seed message of a run.
    pub fn seeded(seed: Message) -> Self {
        Self {
            messages: vec![seed],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
