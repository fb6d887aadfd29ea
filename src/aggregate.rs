//! Field-value aggregation over a submitted snapshot
//!
//! Restructures the flat `{name, value}` list into per-field value groups.
//! Blank text values are dropped, which is what makes "required" detection
//! possible: a declared field whose group is empty is absent. Every
//! declared field gets a group, possibly empty, so unchecked checkbox
//! groups are still seen by the required and count rules.

use std::collections::HashMap;

use crate::requirements::FieldRequirements;
use crate::value::{FieldEntry, FieldValue};

/// Groups the snapshot by field name. Text values are stored trimmed;
/// numbers and file metadata pass through untouched.
pub fn aggregate(
	snapshot: &[FieldEntry],
	declared: &[FieldRequirements],
) -> HashMap<String, Vec<FieldValue>> {
	let mut groups: HashMap<String, Vec<FieldValue>> = HashMap::new();

	for entry in snapshot {
		let group = groups.entry(entry.name.clone()).or_default();
		if !entry.value.is_blank() {
			group.push(entry.value.trimmed());
		}
	}

	// Compensate for missing form values (unchecked checkboxes,
	// empty multiselects).
	for field in declared {
		groups.entry(field.name().to_string()).or_default();
	}

	groups
}
