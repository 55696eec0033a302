//! Conversation turns
//!
//! A turn is either something the user said or something the bot
//! answered. The role is part of the value, so a turn can never be
//! both or neither.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ScenarioId, Version};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Human side of the conversation
    User,
    /// Bot side of the conversation
    Bot,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Bot => write!(f, "bot"),
        }
    }
}

/// One utterance in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "text", rename_all = "lowercase")]
pub enum Turn {
    /// User message
    User(String),
    /// Bot response
    Bot(String),
}

impl Turn {
    /// Create a user turn
    pub fn user(text: impl Into<String>) -> Self {
        Turn::User(text.into())
    }

    /// Create a bot turn
    pub fn bot(text: impl Into<String>) -> Self {
        Turn::Bot(text.into())
    }

    /// Build a turn from a role and its text
    pub fn from_role(role: Role, text: impl Into<String>) -> Self {
        match role {
            Role::User => Turn::User(text.into()),
            Role::Bot => Turn::Bot(text.into()),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Turn::User(_) => Role::User,
            Turn::Bot(_) => Role::Bot,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Turn::User(text) | Turn::Bot(text) => text,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Turn::User(_))
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, Turn::Bot(_))
    }

    /// Text of a user turn
    pub fn user_text(&self) -> Option<&str> {
        match self {
            Turn::User(text) => Some(text),
            Turn::Bot(_) => None,
        }
    }

    /// Text of a bot turn
    pub fn bot_text(&self) -> Option<&str> {
        match self {
            Turn::Bot(text) => Some(text),
            Turn::User(_) => None,
        }
    }
}

/// A persisted reference turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Store-wide creation id, used to order versions
    pub id: u64,

    /// Owning scenario
    pub scenario_id: ScenarioId,

    /// Version this turn belongs to
    pub version: Version,

    /// Position within (scenario, version), starting at 0
    pub seq: u64,

    /// The utterance itself
    pub turn: Turn,
}

/// Per-turn verdict assigned by the diff engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnStatus {
    /// Turn matches the reference
    #[default]
    Matched,
    /// Turn differs from, is missing from, or is extra to the reference
    Mismatched,
}

impl TurnStatus {
    /// Numeric code (0 = matched, 1 = mismatched)
    pub fn code(&self) -> u8 {
        match self {
            TurnStatus::Matched => 0,
            TurnStatus::Mismatched => 1,
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, TurnStatus::Mismatched)
    }
}

impl fmt::Display for TurnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnStatus::Matched => write!(f, "ok"),
            TurnStatus::Mismatched => write!(f, "diff"),
        }
    }
}
