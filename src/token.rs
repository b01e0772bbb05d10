//! Interaction token codec.
//!
//! Buttons and modals can only carry an opaque string back to the bot, so the
//! composite interaction identity (command, owning user, session, game kind,
//! action) is flattened into one delimiter-separated token. Decoding is
//! strict: wrong arity is a `MalformedToken`, any field failing its
//! vocabulary check is an `InvalidField`. Staleness (a token referencing an
//! already-resolved session) is deliberately not detected here - that is the
//! session store's concern.

use crate::errors::{BotError, BotResult};
use crate::games::{GameAction, GameKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Field separator. Free-form fields are checked delimiter-free at
/// construction rather than trusting the controlled vocabularies alone.
pub const DELIMITER: char = ':';

const FIELD_COUNT: usize = 5;

/// The composite key every UI element carries, in fixed field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionToken {
    pub command: String,
    pub owner_id: String,
    pub session_id: Uuid,
    pub kind: GameKind,
    pub action: GameAction,
}

fn check_field(field: &'static str, value: &str) -> BotResult<()> {
    if value.is_empty() || value.contains(DELIMITER) {
        return Err(BotError::InvalidField {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

impl InteractionToken {
    /// Build a token, validating the free-form fields.
    pub fn new(
        command: impl Into<String>,
        owner_id: impl Into<String>,
        session_id: Uuid,
        kind: GameKind,
        action: GameAction,
    ) -> BotResult<Self> {
        let command = command.into();
        let owner_id = owner_id.into();
        check_field("command", &command)?;
        check_field("owner_id", &owner_id)?;
        Ok(Self {
            command,
            owner_id,
            session_id,
            kind,
            action,
        })
    }

    /// Flatten into the wire string: `command:owner:session:kind:action`.
    pub fn encode(&self) -> String {
        format!(
            "{}{d}{}{d}{}{d}{}{d}{}",
            self.command,
            self.owner_id,
            self.session_id,
            self.kind,
            self.action,
            d = DELIMITER
        )
    }

    /// Parse a wire string back into a token.
    pub fn decode(raw: &str) -> BotResult<Self> {
        let fields: Vec<&str> = raw.split(DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(BotError::MalformedToken(raw.to_string()));
        }

        check_field("command", fields[0])?;
        check_field("owner_id", fields[1])?;
        let session_id = Uuid::parse_str(fields[2]).map_err(|_| BotError::InvalidField {
            field: "session_id",
            value: fields[2].to_string(),
        })?;
        let kind = GameKind::parse(fields[3]).ok_or_else(|| BotError::InvalidField {
            field: "kind",
            value: fields[3].to_string(),
        })?;
        let action = GameAction::parse(fields[4]).ok_or_else(|| BotError::InvalidField {
            field: "action",
            value: fields[4].to_string(),
        })?;

        Ok(Self {
            command: fields[0].to_string(),
            owner_id: fields[1].to_string(),
            session_id,
            kind,
            action,
        })
    }

    /// Derive a follow-up token for the same session with a new action.
    pub fn with_action(&self, action: GameAction) -> Self {
        Self {
            action,
            ..self.clone()
        }
    }
}
