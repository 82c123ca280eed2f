//! Reviews and their moderation lifecycle.
//!
//! A review starts `Pending` and is decided exactly once, to `Approved` or
//! `Rejected`. The stored `approved` flag is kept in step with the decision so
//! public listings can filter on it, but `moderation` is authoritative.
//! Older documents that carry only `approved` read as approved when the flag
//! is set and pending otherwise.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Document, DocumentId, Fields, UserId, UserValidationError};

/// Maximum review message length, in characters.
pub const REVIEW_MESSAGE_MAX: usize = 2_000;

/// Moderation state of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Moderation {
    /// Awaiting an admin decision.
    #[default]
    Pending,
    /// Visible on the public reviews page.
    Approved,
    /// Declined; never shown publicly.
    Rejected,
}

impl Moderation {
    /// Stored representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether a decision has been made.
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for Moderation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An admin's verdict on a pending review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Terminal state this decision leads to.
    pub const fn outcome(self) -> Moderation {
        match self {
            Self::Approve => Moderation::Approved,
            Self::Reject => Moderation::Rejected,
        }
    }
}

impl From<bool> for Decision {
    fn from(approved: bool) -> Self {
        if approved { Self::Approve } else { Self::Reject }
    }
}

/// Error raised when a transition is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationError {
    /// The review was already decided.
    AlreadyDecided { current: Moderation },
}

impl fmt::Display for ModerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyDecided { current } => {
                write!(f, "review has already been {current}")
            }
        }
    }
}

impl std::error::Error for ModerationError {}

/// Rating scale used when the review was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingScale {
    /// One to five stars.
    #[default]
    Stars,
    /// One of four faces, from angry to delighted.
    Emoji,
}

impl RatingScale {
    /// Highest value on the scale.
    pub const fn max(self) -> u8 {
        match self {
            Self::Stars => 5,
            Self::Emoji => 4,
        }
    }
}

const EMOJI_FACES: [&str; 4] = ["😠", "😐", "🙂", "😍"];

/// A rating value checked against its scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rating {
    scale: RatingScale,
    value: u8,
}

impl Rating {
    /// Validate `value` against `scale`.
    ///
    /// # Examples
    /// ```
    /// use tracker::domain::{Rating, RatingScale};
    ///
    /// let rating = Rating::new(RatingScale::Emoji, 4).expect("in range");
    /// assert_eq!(rating.emoji(), Some("😍"));
    /// assert!(Rating::new(RatingScale::Emoji, 5).is_err());
    /// assert!(Rating::new(RatingScale::Stars, 5).is_ok());
    /// ```
    pub fn new(scale: RatingScale, value: i64) -> Result<Self, ReviewValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (1..=scale.max()).contains(v))
            .map(|value| Self { scale, value })
            .ok_or(ReviewValidationError::RatingOutOfRange { scale, value })
    }

    /// Scale of the rating.
    pub fn scale(self) -> RatingScale {
        self.scale
    }

    /// Numeric value within the scale.
    pub fn value(self) -> u8 {
        self.value
    }

    /// Face glyph for emoji ratings.
    pub fn emoji(self) -> Option<&'static str> {
        match self.scale {
            RatingScale::Emoji => EMOJI_FACES.get(usize::from(self.value) - 1).copied(),
            RatingScale::Stars => None,
        }
    }
}

/// Validation errors raised while reading or building reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewValidationError {
    Malformed { reason: String },
    RatingOutOfRange { scale: RatingScale, value: i64 },
    EmptyMessage,
    MessageTooLong { max: usize },
    InvalidAuthor(UserValidationError),
    MissingField { field: &'static str },
}

impl fmt::Display for ReviewValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { reason } => write!(f, "review is malformed: {reason}"),
            Self::RatingOutOfRange { scale, value } => write!(
                f,
                "rating must be between 1 and {} (got {value})",
                scale.max()
            ),
            Self::EmptyMessage => write!(f, "review message must not be empty"),
            Self::MessageTooLong { max } => {
                write!(f, "review message must be at most {max} characters")
            }
            Self::InvalidAuthor(err) => write!(f, "review author is invalid: {err}"),
            Self::MissingField { field } => write!(f, "review is missing {field}"),
        }
    }
}

impl std::error::Error for ReviewValidationError {}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    // Written by an older review dialog in place of `message`.
    #[serde(default, skip_serializing)]
    comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rating: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rating_scale: Option<RatingScale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    approved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    moderation: Option<Moderation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decided_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decided_by: Option<String>,
}

impl ReviewFields {
    fn into_fields(self) -> Result<Fields, ReviewValidationError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(ReviewValidationError::Malformed {
                reason: format!("expected an object, got {other}"),
            }),
            Err(err) => Err(ReviewValidationError::Malformed {
                reason: err.to_string(),
            }),
        }
    }
}

/// A validated review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: DocumentId,
    pub user_id: UserId,
    pub author_name: Option<String>,
    pub project_id: Option<DocumentId>,
    pub message: String,
    pub rating: Rating,
    pub moderation: Moderation,
    pub created_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decided_by: Option<UserId>,
}

impl Review {
    /// Validate a stored document.
    pub fn try_from_document(document: &Document) -> Result<Self, ReviewValidationError> {
        let raw: ReviewFields = serde_json::from_value(Value::Object(document.fields.clone()))
            .map_err(|err| ReviewValidationError::Malformed {
                reason: err.to_string(),
            })?;
        let user_id = raw
            .user_id
            .ok_or(ReviewValidationError::MissingField { field: "userId" })
            .and_then(|id| UserId::new(id).map_err(ReviewValidationError::InvalidAuthor))?;
        let rating = raw
            .rating
            .ok_or(ReviewValidationError::MissingField { field: "rating" })
            .and_then(|value| Rating::new(raw.rating_scale.unwrap_or_default(), value))?;
        let message = raw
            .message
            .or(raw.comment)
            .ok_or(ReviewValidationError::MissingField { field: "message" })?;
        let moderation = raw.moderation.unwrap_or(if raw.approved.unwrap_or(false) {
            Moderation::Approved
        } else {
            Moderation::Pending
        });
        let project_id = raw
            .project_id
            .map(DocumentId::new)
            .transpose()
            .map_err(|err| ReviewValidationError::Malformed {
                reason: format!("projectId: {err}"),
            })?;
        let decided_by = raw
            .decided_by
            .map(UserId::new)
            .transpose()
            .map_err(ReviewValidationError::InvalidAuthor)?;
        Ok(Self {
            id: document.id.clone(),
            user_id,
            author_name: raw.user_name,
            project_id,
            message,
            rating,
            moderation,
            created_at: raw.created_at,
            decided_at: raw.decided_at,
            decided_by,
        })
    }

    /// Whether the review still awaits a decision.
    pub fn is_pending(&self) -> bool {
        self.moderation == Moderation::Pending
    }

    /// Apply `decision` to a pending review.
    ///
    /// Returns the persisted change on success; a decided review is never
    /// re-opened.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use tracker::domain::{Decision, Document, DocumentId, Moderation, Review, UserId};
    ///
    /// let fields = json!({ "userId": "u1", "message": "Great", "rating": 5, "approved": false });
    /// let doc = Document::new(DocumentId::new("r1").unwrap(), fields.as_object().cloned().unwrap());
    /// let mut review = Review::try_from_document(&doc).unwrap();
    /// let admin = UserId::new("admin").unwrap();
    /// review.decide(Decision::Approve, &admin, chrono::Utc::now()).expect("pending");
    /// assert_eq!(review.moderation, Moderation::Approved);
    /// assert!(review.decide(Decision::Reject, &admin, chrono::Utc::now()).is_err());
    /// ```
    pub fn decide(
        &mut self,
        decision: Decision,
        decided_by: &UserId,
        decided_at: DateTime<Utc>,
    ) -> Result<ModerationChange, ModerationError> {
        if self.moderation.is_decided() {
            return Err(ModerationError::AlreadyDecided {
                current: self.moderation,
            });
        }
        self.moderation = decision.outcome();
        self.decided_at = Some(decided_at);
        self.decided_by = Some(decided_by.clone());
        Ok(ModerationChange {
            moderation: self.moderation,
            decided_at,
            decided_by: decided_by.clone(),
        })
    }
}

/// Fields written when a review is decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationChange {
    pub moderation: Moderation,
    pub decided_at: DateTime<Utc>,
    pub decided_by: UserId,
}

impl ModerationChange {
    /// Partial update: `moderation`, `approved`, `decidedAt` and `decidedBy`.
    pub fn into_fields(self) -> Result<Fields, ReviewValidationError> {
        ReviewFields {
            approved: Some(self.moderation == Moderation::Approved),
            moderation: Some(self.moderation),
            decided_at: Some(self.decided_at),
            decided_by: Some(self.decided_by.into()),
            ..ReviewFields::default()
        }
        .into_fields()
    }
}

/// A new review, validated and ready to store as pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    user_id: UserId,
    author_name: String,
    project_id: Option<DocumentId>,
    message: String,
    rating: Rating,
    created_at: DateTime<Utc>,
}

impl ReviewDraft {
    /// Validate a review before storing it. The message is trimmed.
    pub fn new(
        user_id: UserId,
        author_name: impl Into<String>,
        project_id: Option<DocumentId>,
        message: &str,
        rating: Rating,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ReviewValidationError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ReviewValidationError::EmptyMessage);
        }
        if message.chars().count() > REVIEW_MESSAGE_MAX {
            return Err(ReviewValidationError::MessageTooLong {
                max: REVIEW_MESSAGE_MAX,
            });
        }
        Ok(Self {
            user_id,
            author_name: author_name.into(),
            project_id,
            message: message.to_owned(),
            rating,
            created_at,
        })
    }

    /// Stored fields; the review starts pending and unapproved.
    pub fn into_fields(self) -> Result<Fields, ReviewValidationError> {
        ReviewFields {
            user_id: Some(self.user_id.into()),
            user_name: Some(self.author_name),
            project_id: self.project_id.map(String::from),
            message: Some(self.message),
            rating: Some(i64::from(self.rating.value())),
            rating_scale: Some(self.rating.scale()),
            approved: Some(false),
            moderation: Some(Moderation::Pending),
            created_at: Some(self.created_at),
            ..ReviewFields::default()
        }
        .into_fields()
    }
}
