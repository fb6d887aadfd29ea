//! Submitted field snapshot model
//!
//! Host adapters intercept a submission event and forward a flat, ordered
//! list of [`FieldEntry`] pairs. Repeated names are expected for checkbox,
//! multi-select, and file groups. File inputs are reported as byte size
//! plus media-type metadata; the engine never reads file contents.

use serde::{Deserialize, Serialize};

use crate::error::{RegulateError, RegulateResult};

/// A single submitted value.
///
/// Only text participates in blank detection: a text value that trims to the
/// empty string signals an absent field. Numbers and file metadata pass
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
	Text(String),
	Number(f64),
	File {
		/// Reported size in bytes.
		size: u64,
		/// Reported media type, e.g. `image/png`. Absent when the host
		/// environment exposes no type metadata.
		file_type: Option<String>,
	},
}

impl FieldValue {
	/// True for a text value that is empty after trimming.
	pub fn is_blank(&self) -> bool {
		match self {
			Self::Text(s) => s.trim().is_empty(),
			_ => false,
		}
	}

	/// Copy of the value with text trimmed. Non-text values are unchanged.
	pub fn trimmed(&self) -> Self {
		match self {
			Self::Text(s) => Self::Text(s.trim().to_string()),
			other => other.clone(),
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}

	/// Numeric byte size, for size-bounded rules. A non-negative finite
	/// number is treated as a size; file metadata reports its own.
	pub fn byte_size(&self) -> Option<u64> {
		match self {
			Self::Number(n) if n.is_finite() && *n >= 0.0 => Some(*n as u64),
			Self::File { size, .. } => Some(*size),
			_ => None,
		}
	}

	pub fn file_type(&self) -> Option<&str> {
		match self {
			Self::File { file_type, .. } => file_type.as_deref(),
			_ => None,
		}
	}
}

/// One `{name, value}` pair from the submitted snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
	pub name: String,
	pub value: FieldValue,
}

impl FieldEntry {
	pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
		Self {
			name: name.into(),
			value,
		}
	}

	/// Convenience constructor for a text entry.
	///
	/// # Examples
	///
	/// ```
	/// use regulate::{FieldEntry, FieldValue};
	///
	/// let entry = FieldEntry::text("username", "ada");
	/// assert_eq!(entry.name, "username");
	/// assert_eq!(entry.value, FieldValue::Text("ada".to_string()));
	/// ```
	pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self::new(name, FieldValue::Text(value.into()))
	}

	/// Convenience constructor for a file entry.
	pub fn file(name: impl Into<String>, size: u64, file_type: Option<&str>) -> Self {
		Self::new(
			name,
			FieldValue::File {
				size,
				file_type: file_type.map(str::to_string),
			},
		)
	}

	/// Builds an entry from one serialized `{name, value}` object, the
	/// shape submission bindings produce. File inputs arrive as
	/// `{name, value: byteSize, fileType: mime}`.
	///
	/// # Examples
	///
	/// ```
	/// use regulate::FieldEntry;
	/// use serde_json::json;
	///
	/// let entry = FieldEntry::from_json(&json!({"name": "email", "value": "a@b.com"})).unwrap();
	/// assert_eq!(entry.name, "email");
	///
	/// let file = FieldEntry::from_json(&json!({
	/// 	"name": "resume", "value": 2048, "fileType": "application/pdf"
	/// })).unwrap();
	/// assert_eq!(file.value.byte_size(), Some(2048));
	/// ```
	pub fn from_json(entry: &serde_json::Value) -> RegulateResult<Self> {
		let object = entry
			.as_object()
			.ok_or_else(|| RegulateError::Config("field entry must be an object".to_string()))?;
		let name = object
			.get("name")
			.and_then(|v| v.as_str())
			.ok_or_else(|| RegulateError::Config("field entry is missing a name".to_string()))?;

		let value = if let Some(file_type) = object.get("fileType") {
			FieldValue::File {
				size: object.get("value").and_then(|v| v.as_u64()).unwrap_or(0),
				file_type: file_type.as_str().map(str::to_string),
			}
		} else {
			match object.get("value") {
				Some(serde_json::Value::String(s)) => FieldValue::Text(s.clone()),
				Some(v) if v.is_number() => FieldValue::Number(v.as_f64().unwrap_or(0.0)),
				Some(serde_json::Value::Bool(b)) => FieldValue::Text(b.to_string()),
				_ => FieldValue::Text(String::new()),
			}
		};

		Ok(Self::new(name, value))
	}

	/// Builds a whole snapshot from a serialized array of field objects.
	pub fn snapshot_from_json(snapshot: &serde_json::Value) -> RegulateResult<Vec<Self>> {
		snapshot
			.as_array()
			.ok_or_else(|| RegulateError::Config("snapshot must be an array".to_string()))?
			.iter()
			.map(Self::from_json)
			.collect()
	}
}
