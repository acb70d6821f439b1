//! Pipeline items and their decision state.

use super::IdentifierKind;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A scalar field value carried by an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit null. Treated as absent.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Integer above `i64::MAX`.
    Unsigned(u64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl FieldValue {
    /// Returns the canonical identifier text of this value.
    ///
    /// Only `Null` carries no identifier; empty text is a present value.
    /// Numbers use their display form, so `55` and `"55"` name the same
    /// identifier.
    #[must_use]
    pub fn identifier_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(s.clone()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Unsigned(u) => Some(u.to_string()),
            Self::Float(f) => Some(f.to_string()),
        }
    }

    /// Converts a JSON scalar into a field value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for arrays and objects.
    pub fn from_json(key: &str, value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::Bool(b) => Ok(Self::Bool(b)),
            serde_json::Value::Number(n) => Ok(if let Some(i) = n.as_i64() {
                Self::Integer(i)
            } else if let Some(u) = n.as_u64() {
                Self::Unsigned(u)
            } else {
                Self::Float(n.as_f64().unwrap_or(f64::NAN))
            }),
            serde_json::Value::String(s) => Ok(Self::Text(s)),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Err(
                Error::InvalidInput(format!("field `{key}` must be a scalar value")),
            ),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Unsigned(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Decision state of an item within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// No stage has settled the item yet.
    #[default]
    Undecided,
    /// Accepted by a stage. May still be rejected by a later stage.
    Accepted,
    /// Rejected. Final for the rest of the run.
    Rejected,
}

impl ItemStatus {
    /// Returns the status as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Undecided => "undecided",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A candidate item flowing through the pipeline.
///
/// Items carry a title for diagnostics, a map of scalar fields and the
/// decision taken on them so far. Rejection is sticky: once rejected, an item
/// cannot be accepted again and its first rejection reason is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    title: String,
    fields: BTreeMap<String, FieldValue>,
    status: ItemStatus,
    reason: Option<String>,
    decided_by: Option<String>,
}

impl Item {
    /// Creates an undecided item with no fields.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: BTreeMap::new(),
            status: ItemStatus::Undecided,
            reason: None,
            decided_by: None,
        }
    }

    /// Builder method to set a field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set_field(key, value);
        self
    }

    /// Builds an item from a JSON object.
    ///
    /// The object must contain a string `title`; every other key becomes a
    /// field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the value is not an object, the title
    /// is missing, or a field is not a scalar.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = value else {
            return Err(Error::InvalidInput("item must be a JSON object".to_string()));
        };

        let mut title = None;
        let mut fields = BTreeMap::new();
        for (key, value) in map {
            if key == "title" {
                match value {
                    serde_json::Value::String(s) => title = Some(s),
                    _ => {
                        return Err(Error::InvalidInput(
                            "item `title` must be a string".to_string(),
                        ));
                    },
                }
            } else {
                let field = FieldValue::from_json(&key, value)?;
                fields.insert(key, field);
            }
        }

        let title =
            title.ok_or_else(|| Error::InvalidInput("item is missing a `title`".to_string()))?;

        Ok(Self {
            title,
            fields,
            status: ItemStatus::Undecided,
            reason: None,
            decided_by: None,
        })
    }

    /// Returns the item title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Sets a field, replacing any previous value.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Returns a field value, if set.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Returns all fields in key order.
    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Returns the identifier value of the given kind, if present.
    #[must_use]
    pub fn identifier(&self, kind: &IdentifierKind) -> Option<String> {
        self.fields
            .get(kind.as_str())
            .and_then(FieldValue::identifier_text)
    }

    /// Returns true if any of the given identifier kinds is present.
    #[must_use]
    pub fn has_any_identifier(&self, kinds: &[IdentifierKind]) -> bool {
        kinds.iter().any(|kind| self.identifier(kind).is_some())
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> ItemStatus {
        self.status
    }

    /// Returns the reason attached to the last settled decision.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns the name of the stage that settled the item.
    #[must_use]
    pub fn decided_by(&self) -> Option<&str> {
        self.decided_by.as_deref()
    }

    /// Returns true if the item is accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.status == ItemStatus::Accepted
    }

    /// Returns true if the item is rejected.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.status == ItemStatus::Rejected
    }

    /// Returns true if no stage has settled the item.
    #[must_use]
    pub fn is_undecided(&self) -> bool {
        self.status == ItemStatus::Undecided
    }

    /// Accepts the item.
    ///
    /// Returns `false` without changing anything if the item is already
    /// accepted or rejected.
    pub fn accept(&mut self, stage: &str, reason: impl Into<String>) -> bool {
        if self.status != ItemStatus::Undecided {
            return false;
        }
        self.settle(ItemStatus::Accepted, stage, reason.into());
        true
    }

    /// Rejects the item.
    ///
    /// Returns `false` without changing anything if the item is already
    /// rejected.
    pub fn reject(&mut self, stage: &str, reason: impl Into<String>) -> bool {
        if self.status == ItemStatus::Rejected {
            return false;
        }
        self.settle(ItemStatus::Rejected, stage, reason.into());
        true
    }

    fn settle(&mut self, status: ItemStatus, stage: &str, reason: String) {
        self.status = status;
        self.reason = Some(reason);
        self.decided_by = Some(stage.to_string());
    }
}
