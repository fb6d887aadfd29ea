//! Rule registry and built-in validation rules
//!
//! A rule is a pure predicate over one aggregated value, the owning field's
//! requirement set, and the full submitted snapshot (for cross-field rules).
//! Rules are owned by the [`RuleRegistry`] and referenced by name from
//! requirement sets; registering a name twice is a programmer error.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::error::{RegulateError, RegulateResult};
use crate::requirements::FieldRequirements;
use crate::value::{FieldEntry, FieldValue};

/// Built-in rule names.
pub const MIN_LENGTH: &str = "min_length";
pub const MAX_LENGTH: &str = "max_length";
pub const EXACT_LENGTH: &str = "exact_length";
pub const EMAIL: &str = "email";
pub const MATCH_FIELD: &str = "match_field";
pub const MIN_CHECKED: &str = "min_checked";
pub const MAX_CHECKED: &str = "max_checked";
pub const EXACT_CHECKED: &str = "exact_checked";
pub const MIN_SELECTED: &str = "min_selected";
pub const MAX_SELECTED: &str = "max_selected";
pub const EXACT_SELECTED: &str = "exact_selected";
pub const MAX_SIZE: &str = "max_size";
pub const ACCEPTED_FILES: &str = "accepted_files";

/// Pseudo-rule name used for the mandatory empty-field message. It has no
/// predicate: an empty value group short-circuits rule evaluation.
pub const REQUIRED: &str = "required";

/// A rule predicate. Receives the value under test, the owning field's
/// requirement set, and the full submitted snapshot.
pub type RuleFn =
	Arc<dyn Fn(&FieldValue, &FieldRequirements, &[FieldEntry]) -> bool + Send + Sync>;

// ASCII email pattern: local part of [A-Za-z0-9_.-], one or more
// dot-separated domain labels, final label 2-4 alphanumerics. A pattern
// check, not RFC 5322 conformance.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[A-Za-z0-9_.\-]+@([A-Za-z0-9\-]+\.)+[A-Za-z0-9]{2,4}$")
		.expect("EMAIL_REGEX: invalid regex pattern")
});

fn check_length(value: &FieldValue, bound: Option<u64>, test: fn(usize, usize) -> bool) -> bool {
	match (value.as_text(), bound) {
		(Some(text), Some(bound)) => test(text.chars().count(), bound as usize),
		_ => false,
	}
}

fn at_least(have: usize, bound: usize) -> bool {
	have >= bound
}

fn at_most(have: usize, bound: usize) -> bool {
	have <= bound
}

fn exactly(have: usize, bound: usize) -> bool {
	have == bound
}

// The six checked/selected rules share one counter: count snapshot entries
// sharing the owning field's name and compare against the bound. The
// checked/selected naming is purely presentational.
fn count_rule(name: &'static str, test: fn(usize, usize) -> bool) -> RuleFn {
	Arc::new(move |_value, reqs, fields| {
		reqs.bound(name).is_some_and(|bound| {
			let have = fields.iter().filter(|f| f.name == reqs.name()).count();
			test(have, bound as usize)
		})
	})
}

fn builtins() -> HashMap<String, RuleFn> {
	let mut rules: HashMap<String, RuleFn> = HashMap::new();

	rules.insert(
		MIN_LENGTH.to_string(),
		Arc::new(|value, reqs, _| check_length(value, reqs.bound(MIN_LENGTH), at_least)),
	);
	rules.insert(
		MAX_LENGTH.to_string(),
		Arc::new(|value, reqs, _| check_length(value, reqs.bound(MAX_LENGTH), at_most)),
	);
	rules.insert(
		EXACT_LENGTH.to_string(),
		Arc::new(|value, reqs, _| check_length(value, reqs.bound(EXACT_LENGTH), exactly)),
	);

	rules.insert(
		EMAIL.to_string(),
		Arc::new(|value, _, _| {
			value
				.as_text()
				.is_some_and(|text| EMAIL_REGEX.is_match(text))
		}),
	);

	rules.insert(
		MATCH_FIELD.to_string(),
		Arc::new(|value, reqs, fields| {
			reqs.text(MATCH_FIELD).is_some_and(|target| {
				fields
					.iter()
					.any(|field| field.name == target && field.value == *value)
			})
		}),
	);

	for (name, test) in [
		(MIN_CHECKED, at_least as fn(usize, usize) -> bool),
		(MAX_CHECKED, at_most),
		(EXACT_CHECKED, exactly),
		(MIN_SELECTED, at_least),
		(MAX_SELECTED, at_most),
		(EXACT_SELECTED, exactly),
	] {
		rules.insert(name.to_string(), count_rule(name, test));
	}

	rules.insert(
		MAX_SIZE.to_string(),
		Arc::new(|value, reqs, _| {
			match (value.byte_size(), reqs.bound(MAX_SIZE)) {
				(Some(size), Some(limit)) => size <= limit,
				_ => false,
			}
		}),
	);

	rules.insert(
		ACCEPTED_FILES.to_string(),
		Arc::new(|_value, reqs, fields| {
			let Some(allow_list) = reqs.text(ACCEPTED_FILES) else {
				return false;
			};
			let allow_list = allow_list.to_ascii_lowercase();
			fields
				.iter()
				.filter(|field| field.name == reqs.name())
				.filter_map(|field| field.value.file_type())
				.any(|media_type| {
					let media_type = media_type.to_ascii_lowercase();
					allow_list
						.split('|')
						.any(|token| !token.is_empty() && media_type.contains(token))
				})
		}),
	);

	rules
}

/// Mapping from rule name to predicate, seeded with the built-in rules.
///
/// # Examples
///
/// ```
/// use regulate::RuleRegistry;
///
/// let mut registry = RuleRegistry::new();
/// assert!(registry.lookup("email").is_some());
///
/// registry
/// 	.register("shouty", |value, _, _| {
/// 		value.as_text().is_some_and(|s| s == s.to_uppercase())
/// 	})
/// 	.unwrap();
/// assert!(registry.register("email", |_, _, _| true).is_err());
/// ```
pub struct RuleRegistry {
	rules: HashMap<String, RuleFn>,
}

impl RuleRegistry {
	pub fn new() -> Self {
		Self { rules: builtins() }
	}

	/// Registers a custom rule. Fails when the name already exists;
	/// built-ins are never silently overridable.
	pub fn register<F>(&mut self, name: impl Into<String>, rule: F) -> RegulateResult<()>
	where
		F: Fn(&FieldValue, &FieldRequirements, &[FieldEntry]) -> bool + Send + Sync + 'static,
	{
		let name = name.into();
		if self.rules.contains_key(&name) {
			return Err(RegulateError::DuplicateRule(name));
		}
		self.rules.insert(name, Arc::new(rule));
		Ok(())
	}

	pub fn lookup(&self, name: &str) -> Option<&RuleFn> {
		self.rules.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.rules.contains_key(name)
	}
}

impl Default for RuleRegistry {
	fn default() -> Self {
		Self::new()
	}
}
