//! Boundary types shared with the platform adapter.
//!
//! The chat platform (command registration, embeds, attachments, acknowledge
//! plumbing) is an external collaborator. It hands the core one of three
//! event kinds and gets back a reply payload; both sides are plain data with
//! no I/O in this crate.

use serde::{Deserialize, Serialize};

/// An inbound interaction delivered by the platform adapter. `user` is the
/// acting user's opaque identifier; `token` is the string a previously issued
/// UI element carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum InteractionEvent {
    SlashCommand {
        user: String,
        command: String,
    },
    ButtonClick {
        user: String,
        token: String,
    },
    ModalSubmit {
        user: String,
        token: String,
        input: String,
    },
}

impl InteractionEvent {
    pub fn user(&self) -> &str {
        match self {
            InteractionEvent::SlashCommand { user, .. }
            | InteractionEvent::ButtonClick { user, .. }
            | InteractionEvent::ModalSubmit { user, .. } => user,
        }
    }
}

/// Kind of follow-up UI element a reply asks the adapter to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    Button,
    Modal,
}

/// A follow-up UI element: an encoded token plus a human-readable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPrompt {
    pub token: String,
    pub label: String,
    pub kind: PromptKind,
}

/// What the core hands back to the adapter for one interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reply", rename_all = "lowercase")]
pub enum Reply {
    /// Plain reply text; `ephemeral` replies are visible to the acting user
    /// only.
    Message { content: String, ephemeral: bool },
    /// Reply text plus follow-up UI elements to render.
    Prompt {
        content: String,
        prompts: Vec<UiPrompt>,
    },
    /// Drop the interaction without any visible response.
    Ignore,
}

impl Reply {
    pub fn message(content: impl Into<String>) -> Self {
        Reply::Message {
            content: content.into(),
            ephemeral: false,
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Reply::Message {
            content: content.into(),
            ephemeral: true,
        }
    }
}
