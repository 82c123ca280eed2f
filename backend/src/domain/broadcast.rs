//! Admin broadcast messages shown to every signed-in user.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Document, DocumentId, Fields, UserId, UserValidationError};

/// Maximum broadcast length, in characters, after trimming.
pub const BROADCAST_MESSAGE_MAX: usize = 500;

/// Validation errors for broadcasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastValidationError {
    EmptyMessage,
    MessageTooLong { max: usize },
    Malformed { reason: String },
    InvalidAuthor(UserValidationError),
}

impl fmt::Display for BroadcastValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "broadcast message must not be empty"),
            Self::MessageTooLong { max } => {
                write!(f, "broadcast message must be at most {max} characters")
            }
            Self::Malformed { reason } => write!(f, "broadcast is malformed: {reason}"),
            Self::InvalidAuthor(err) => write!(f, "broadcast author is invalid: {err}"),
        }
    }
}

impl std::error::Error for BroadcastValidationError {}

/// Broadcast text, trimmed and between 1 and 500 characters.
///
/// # Examples
/// ```
/// use tracker::domain::BroadcastMessage;
///
/// let message = BroadcastMessage::new("  Maintenance at 18:00  ").expect("valid");
/// assert_eq!(message.as_ref(), "Maintenance at 18:00");
/// assert!(BroadcastMessage::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastMessage(String);

impl BroadcastMessage {
    /// Validate and construct a [`BroadcastMessage`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, BroadcastValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BroadcastValidationError::EmptyMessage);
        }
        if trimmed.chars().count() > BROADCAST_MESSAGE_MAX {
            return Err(BroadcastValidationError::MessageTooLong {
                max: BROADCAST_MESSAGE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for BroadcastMessage {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BroadcastFields {
    author_id: String,
    #[serde(default)]
    author_name: Option<String>,
    message: String,
    created_at: DateTime<Utc>,
}

/// A stored broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Broadcast {
    pub id: DocumentId,
    pub author_id: UserId,
    pub author_name: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Broadcast {
    /// Validate a stored document.
    pub fn try_from_document(document: &Document) -> Result<Self, BroadcastValidationError> {
        let raw: BroadcastFields = serde_json::from_value(Value::Object(document.fields.clone()))
            .map_err(|err| BroadcastValidationError::Malformed {
                reason: err.to_string(),
            })?;
        Ok(Self {
            id: document.id.clone(),
            author_id: UserId::new(raw.author_id).map_err(BroadcastValidationError::InvalidAuthor)?,
            author_name: raw.author_name,
            message: raw.message,
            created_at: raw.created_at,
        })
    }
}

/// A broadcast about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastDraft {
    pub author_id: UserId,
    pub author_name: String,
    pub message: BroadcastMessage,
    pub created_at: DateTime<Utc>,
}

impl BroadcastDraft {
    /// Stored field layout.
    pub fn into_fields(self) -> Result<Fields, BroadcastValidationError> {
        let fields = BroadcastFields {
            author_id: self.author_id.into(),
            author_name: Some(self.author_name),
            message: self.message.0,
            created_at: self.created_at,
        };
        match serde_json::to_value(fields) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(BroadcastValidationError::Malformed {
                reason: format!("expected an object, got {other}"),
            }),
            Err(err) => Err(BroadcastValidationError::Malformed {
                reason: err.to_string(),
            }),
        }
    }
}

/// Sort broadcasts newest first; ties keep their stored order.
pub fn newest_first(mut broadcasts: Vec<Broadcast>) -> Vec<Broadcast> {
    broadcasts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    broadcasts
}
