//! Raw documents exchanged with the document store.
//!
//! A document is an identifier plus a JSON object of fields. Domain types
//! (records, reviews, broadcasts) convert to and from this shape at the port
//! boundary; nothing past that boundary reads untyped fields.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON object holding a document's fields.
pub type Fields = Map<String, Value>;

/// Collections the application reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionName {
    /// Customer/project records.
    Records,
    /// User-submitted reviews awaiting or past moderation.
    Reviews,
    /// User profiles carrying display name and role.
    Users,
    /// Admin broadcast messages.
    Broadcasts,
}

impl CollectionName {
    /// Every collection, in a stable order.
    pub const ALL: [Self; 4] = [Self::Records, Self::Reviews, Self::Users, Self::Broadcasts];

    /// Storage name of the collection.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Records => "records",
            Self::Reviews => "reviews",
            Self::Users => "users",
            Self::Broadcasts => "broadcasts",
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a document identifier is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyDocumentId;

impl fmt::Display for EmptyDocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document id must not be empty")
    }
}

impl std::error::Error for EmptyDocumentId {}

/// Store-assigned document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Validate and construct a [`DocumentId`]; surrounding whitespace is trimmed.
    pub fn new(id: impl AsRef<str>) -> Result<Self, EmptyDocumentId> {
        let trimmed = id.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmptyDocumentId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.0
    }
}

impl TryFrom<String> for DocumentId {
    type Error = EmptyDocumentId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A stored document: identifier plus fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Field values as stored.
    pub fields: Fields,
}

impl Document {
    /// Build a document from its parts.
    pub fn new(id: DocumentId, fields: Fields) -> Self {
        Self { id, fields }
    }

    /// Borrow a field value by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
