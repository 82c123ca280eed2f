//! Customer/project records.
//!
//! Records arrive from the document store as loosely typed JSON. They are
//! validated once, in [`Record::try_from_document`], so the aggregation code
//! only ever sees well-formed values. Type mismatches and out-of-range
//! progress fail fast; absent optional fields become `None` and an unknown
//! status string is preserved as [`RecordStatus::Unrecognised`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Document, DocumentId, Fields, UserId, UserValidationError};

/// Upper bound of [`Progress`].
pub const PROGRESS_MAX: u8 = 100;

/// Validation errors raised while reading or building records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// A field had the wrong JSON type or shape.
    Malformed { reason: String },
    /// Progress fell outside `0..=100`.
    ProgressOutOfRange { value: i64 },
    /// The stored owner is not a valid user identifier.
    InvalidOwner(UserValidationError),
    /// A required field was blank.
    MissingField { field: &'static str },
    /// A status string did not name a known bucket.
    UnknownStatus(String),
}

impl fmt::Display for RecordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { reason } => write!(f, "record is malformed: {reason}"),
            Self::ProgressOutOfRange { value } => {
                write!(f, "progress must be between 0 and {PROGRESS_MAX} (got {value})")
            }
            Self::InvalidOwner(err) => write!(f, "record owner is invalid: {err}"),
            Self::MissingField { field } => write!(f, "{field} must not be empty"),
            Self::UnknownStatus(raw) => write!(f, "unknown status '{raw}'"),
        }
    }
}

impl std::error::Error for RecordValidationError {}

/// The four status buckets the dashboard counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusBucket {
    Active,
    Completed,
    Inactive,
    Submitted,
}

impl StatusBucket {
    /// Every bucket in display order.
    pub const ALL: [Self; 4] = [Self::Active, Self::Completed, Self::Inactive, Self::Submitted];

    /// Stored representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Inactive => "Inactive",
            Self::Submitted => "Submitted",
        }
    }
}

impl fmt::Display for StatusBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusBucket {
    type Err = RecordValidationError;

    /// Stored values are matched exactly; `"active"` is not `Active`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.as_str() == value)
            .ok_or_else(|| RecordValidationError::UnknownStatus(value.to_owned()))
    }
}

/// Status as read from storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordStatus {
    /// One of the four counted buckets.
    Bucket(StatusBucket),
    /// A string that names no known bucket, kept verbatim.
    Unrecognised(String),
    /// No status stored.
    Missing,
}

impl RecordStatus {
    /// Classify an optional stored status string.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Missing,
            Some(value) => value
                .parse()
                .map_or_else(|_| Self::Unrecognised(value.to_owned()), Self::Bucket),
        }
    }

    /// The bucket, when the status is a known one.
    pub fn bucket(&self) -> Option<StatusBucket> {
        match self {
            Self::Bucket(bucket) => Some(*bucket),
            Self::Unrecognised(_) | Self::Missing => None,
        }
    }

    /// Stored text, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Bucket(bucket) => Some(bucket.as_str()),
            Self::Unrecognised(raw) => Some(raw.as_str()),
            Self::Missing => None,
        }
    }
}

impl From<StatusBucket> for RecordStatus {
    fn from(value: StatusBucket) -> Self {
        Self::Bucket(value)
    }
}

/// Completion percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Progress(u8);

impl Progress {
    /// Validate and construct a [`Progress`].
    ///
    /// # Examples
    /// ```
    /// use tracker::domain::Progress;
    ///
    /// assert_eq!(Progress::new(10).expect("in range").value(), 10);
    /// assert!(Progress::new(101).is_err());
    /// assert!(Progress::new(-1).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, RecordValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= PROGRESS_MAX)
            .map(Self)
            .ok_or(RecordValidationError::ProgressOutOfRange { value })
    }

    /// Percentage value.
    pub fn value(self) -> u8 {
        self.0
    }
}

/// One line of a record's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the action happened.
    pub date: DateTime<Utc>,
    /// What happened, in prose.
    pub action: String,
}

impl HistoryEntry {
    /// Build an entry stamped `date`.
    pub fn new(date: DateTime<Utc>, action: impl Into<String>) -> Self {
        Self {
            date,
            action: action.into(),
        }
    }
}

/// Stored field layout shared by reads and writes.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    progress: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    history: Option<Vec<HistoryEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl RecordFields {
    fn into_fields(self) -> Result<Fields, RecordValidationError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(RecordValidationError::Malformed {
                reason: format!("expected an object, got {other}"),
            }),
            Err(err) => Err(RecordValidationError::Malformed {
                reason: err.to_string(),
            }),
        }
    }
}

/// A validated customer/project record.
///
/// ## Invariants
/// - `progress` is within `0..=100`.
/// - `created_by`, when present, is a valid [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: DocumentId,
    pub name: Option<String>,
    pub website: Option<String>,
    pub status: RecordStatus,
    pub created_by: Option<UserId>,
    pub progress: Progress,
    pub history: Vec<HistoryEntry>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record {
    /// Validate a stored document.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use tracker::domain::{Document, DocumentId, Record, StatusBucket};
    ///
    /// let fields = json!({ "name": "Tech Solutions Inc.", "status": "Active", "progress": 40 });
    /// let doc = Document::new(
    ///     DocumentId::new("r1").unwrap(),
    ///     fields.as_object().cloned().unwrap(),
    /// );
    /// let record = Record::try_from_document(&doc).expect("valid record");
    /// assert_eq!(record.status.bucket(), Some(StatusBucket::Active));
    /// assert_eq!(record.progress.value(), 40);
    /// ```
    pub fn try_from_document(document: &Document) -> Result<Self, RecordValidationError> {
        let raw: RecordFields = serde_json::from_value(Value::Object(document.fields.clone()))
            .map_err(|err| RecordValidationError::Malformed {
                reason: err.to_string(),
            })?;
        let progress = raw.progress.map(Progress::new).transpose()?.unwrap_or_default();
        let created_by = raw
            .created_by
            .map(UserId::new)
            .transpose()
            .map_err(RecordValidationError::InvalidOwner)?;
        Ok(Self {
            id: document.id.clone(),
            name: raw.name,
            website: raw.website,
            status: RecordStatus::from_stored(raw.status.as_deref()),
            created_by,
            progress,
            history: raw.history.unwrap_or_default(),
            email: raw.email,
            phone: raw.phone,
            description: raw.description,
            requirements: raw.requirements,
            notes: raw.notes,
            created_at: raw.created_at,
        })
    }

    /// Whether `uid` created this record.
    pub fn is_owned_by(&self, uid: &UserId) -> bool {
        self.created_by.as_ref() == Some(uid)
    }
}

/// A record about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub name: String,
    pub website: Option<String>,
    pub status: StatusBucket,
    pub created_by: UserId,
    pub progress: Progress,
    pub history: Vec<HistoryEntry>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RecordDraft {
    /// Stored field layout for the draft.
    pub fn into_fields(self) -> Result<Fields, RecordValidationError> {
        RecordFields {
            name: Some(self.name),
            website: self.website,
            status: Some(self.status.as_str().to_owned()),
            created_by: Some(self.created_by.into()),
            progress: Some(i64::from(self.progress.value())),
            history: Some(self.history),
            email: self.email,
            phone: self.phone,
            description: self.description,
            requirements: self.requirements,
            notes: self.notes,
            created_at: Some(self.created_at),
        }
        .into_fields()
    }
}

/// Partial update applied when an admin moves a record to a new status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: StatusBucket,
    pub progress: Option<Progress>,
    pub history: Vec<HistoryEntry>,
}

impl StatusUpdate {
    /// Fields to merge into the stored record.
    pub fn into_fields(self) -> Result<Fields, RecordValidationError> {
        RecordFields {
            status: Some(self.status.as_str().to_owned()),
            progress: self.progress.map(|p| i64::from(p.value())),
            history: Some(self.history),
            ..RecordFields::default()
        }
        .into_fields()
    }
}
