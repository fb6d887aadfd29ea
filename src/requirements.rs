//! Field requirement declarations and normalization
//!
//! Callers declare per-field requirements with the [`FieldSpec`] builder.
//! Registration normalizes the declarations into one [`FieldRequirements`]
//! per field and routes the presentation keys (display label, error target,
//! custom error text) into side tables, so the validation loop can never
//! mistake a presentation key for an active rule.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::rules;

/// Configuration value attached to a single rule.
///
/// A falsy configuration (`Flag(false)`, `Number(0)`, empty `Text`)
/// disables its rule entirely: the predicate reports failure rather than
/// being skipped, matching the documented bound semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuleConfig {
	Flag(bool),
	Number(u64),
	Text(String),
}

impl RuleConfig {
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Flag(b) => *b,
			Self::Number(n) => *n != 0,
			Self::Text(s) => !s.is_empty(),
		}
	}

	pub fn as_number(&self) -> Option<u64> {
		match self {
			Self::Number(n) => Some(*n),
			_ => None,
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}
}

/// Caller-facing declaration for one field.
///
/// Typed methods cover the built-in rule families; [`FieldSpec::rule`] is
/// the open escape hatch for custom rules registered on the engine.
///
/// # Examples
///
/// ```
/// use regulate::FieldSpec;
///
/// let spec = FieldSpec::new("username")
/// 	.min_length(6)
/// 	.max_length(18)
/// 	.display_as("Username");
/// assert_eq!(spec.name(), "username");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldSpec {
	name: String,
	display_as: Option<String>,
	display_error: Option<String>,
	custom_errors: CustomMessages,
	rules: Vec<(String, RuleConfig)>,
}

impl FieldSpec {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Human-facing label used in error messages instead of the raw name.
	pub fn display_as(mut self, label: impl Into<String>) -> Self {
		self.display_as = Some(label.into());
		self
	}

	/// Reference to the host element that should receive this field's
	/// rendered errors. Opaque to the engine; consumed by host adapters.
	pub fn display_error(mut self, target: impl Into<String>) -> Self {
		self.display_error = Some(target.into());
		self
	}

	/// Custom error text for every rule on this field, shadowing the
	/// registered message generators.
	pub fn error(mut self, message: impl Into<String>) -> Self {
		self.custom_errors.blanket = Some(message.into());
		self
	}

	/// Custom error text for one rule on this field.
	pub fn error_for(mut self, rule: impl Into<String>, message: impl Into<String>) -> Self {
		self.custom_errors
			.per_rule
			.insert(rule.into(), message.into());
		self
	}

	pub fn min_length(self, bound: u64) -> Self {
		self.rule(rules::MIN_LENGTH, RuleConfig::Number(bound))
	}

	pub fn max_length(self, bound: u64) -> Self {
		self.rule(rules::MAX_LENGTH, RuleConfig::Number(bound))
	}

	pub fn exact_length(self, bound: u64) -> Self {
		self.rule(rules::EXACT_LENGTH, RuleConfig::Number(bound))
	}

	pub fn email(self) -> Self {
		self.rule(rules::EMAIL, RuleConfig::Flag(true))
	}

	pub fn match_field(self, target: impl Into<String>) -> Self {
		self.rule(rules::MATCH_FIELD, RuleConfig::Text(target.into()))
	}

	pub fn min_checked(self, bound: u64) -> Self {
		self.rule(rules::MIN_CHECKED, RuleConfig::Number(bound))
	}

	pub fn max_checked(self, bound: u64) -> Self {
		self.rule(rules::MAX_CHECKED, RuleConfig::Number(bound))
	}

	pub fn exact_checked(self, bound: u64) -> Self {
		self.rule(rules::EXACT_CHECKED, RuleConfig::Number(bound))
	}

	pub fn min_selected(self, bound: u64) -> Self {
		self.rule(rules::MIN_SELECTED, RuleConfig::Number(bound))
	}

	pub fn max_selected(self, bound: u64) -> Self {
		self.rule(rules::MAX_SELECTED, RuleConfig::Number(bound))
	}

	pub fn exact_selected(self, bound: u64) -> Self {
		self.rule(rules::EXACT_SELECTED, RuleConfig::Number(bound))
	}

	/// Maximum file size in bytes.
	pub fn max_size(self, bytes: u64) -> Self {
		self.rule(rules::MAX_SIZE, RuleConfig::Number(bytes))
	}

	/// `|`-delimited, case-insensitive allow-list matched as substrings
	/// against the reported media type.
	pub fn accepted_files(self, allow_list: impl Into<String>) -> Self {
		self.rule(rules::ACCEPTED_FILES, RuleConfig::Text(allow_list.into()))
	}

	/// Attaches a rule by name. Later declarations of the same rule
	/// replace the earlier configuration.
	pub fn rule(mut self, name: impl Into<String>, config: RuleConfig) -> Self {
		let name = name.into();
		match self.rules.iter_mut().find(|(existing, _)| *existing == name) {
			Some((_, existing)) => *existing = config,
			None => self.rules.push((name, config)),
		}
		self
	}
}

/// Normalized requirement set for one field. Immutable after registration;
/// the owning field name is carried alongside the rules, never inside them.
#[derive(Debug, Clone)]
pub struct FieldRequirements {
	name: String,
	rules: Vec<(String, RuleConfig)>,
}

impl FieldRequirements {
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Rules in declaration order.
	pub fn rules(&self) -> impl Iterator<Item = (&str, &RuleConfig)> {
		self.rules
			.iter()
			.map(|(name, config)| (name.as_str(), config))
	}

	pub fn config(&self, rule: &str) -> Option<&RuleConfig> {
		self.rules
			.iter()
			.find(|(name, _)| name == rule)
			.map(|(_, config)| config)
	}

	/// Numeric bound for a rule, present only when the configuration is
	/// truthy. A zero or missing bound disables the rule.
	pub fn bound(&self, rule: &str) -> Option<u64> {
		self.config(rule)
			.filter(|config| config.is_truthy())
			.and_then(RuleConfig::as_number)
	}

	pub fn text(&self, rule: &str) -> Option<&str> {
		self.config(rule).and_then(RuleConfig::as_text)
	}
}

/// Custom error text declared on a field, shadowing message generators.
#[derive(Debug, Clone, Default)]
pub struct CustomMessages {
	blanket: Option<String>,
	per_rule: HashMap<String, String>,
}

impl CustomMessages {
	/// Per-rule text wins over the blanket text.
	pub fn resolve(&self, rule: &str) -> Option<&str> {
		self.per_rule
			.get(rule)
			.map(String::as_str)
			.or(self.blanket.as_deref())
	}

	fn is_empty(&self) -> bool {
		self.blanket.is_none() && self.per_rule.is_empty()
	}
}

/// Output of requirement normalization: pure rule sets in declaration
/// order, presentation keys routed into side tables.
#[derive(Debug, Default)]
pub(crate) struct NormalizedRequirements {
	pub(crate) fields: Vec<FieldRequirements>,
	pub(crate) labels: HashMap<String, String>,
	pub(crate) error_targets: HashMap<String, String>,
	pub(crate) custom_errors: HashMap<String, CustomMessages>,
}

/// Converts caller declarations into the internal shape. A declaration
/// with a blank field name is skipped, not fatal; the remaining fields
/// still register.
pub(crate) fn normalize(specs: Vec<FieldSpec>) -> NormalizedRequirements {
	let mut normalized = NormalizedRequirements::default();

	for spec in specs {
		if spec.name.trim().is_empty() {
			tracing::warn!("skipping field declaration without a name");
			continue;
		}

		if let Some(label) = spec.display_as {
			normalized.labels.insert(spec.name.clone(), label);
		}
		if let Some(target) = spec.display_error {
			normalized.error_targets.insert(spec.name.clone(), target);
		}
		if !spec.custom_errors.is_empty() {
			normalized
				.custom_errors
				.insert(spec.name.clone(), spec.custom_errors);
		}

		let requirements = FieldRequirements {
			name: spec.name,
			rules: spec.rules,
		};
		match normalized
			.fields
			.iter_mut()
			.find(|existing| existing.name == requirements.name)
		{
			Some(existing) => *existing = requirements,
			None => normalized.fields.push(requirements),
		}
	}

	normalized
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_presentation_keys_are_routed_out_of_rule_sets() {
		// Arrange
		let specs = vec![
			FieldSpec::new("title")
				.max_length(50)
				.display_as("Job title")
				.display_error("#title-errors"),
		];

		// Act
		let normalized = normalize(specs);

		// Assert: only the real rule survives in the requirement set
		let field = &normalized.fields[0];
		assert_eq!(field.rules().count(), 1);
		assert_eq!(field.bound(rules::MAX_LENGTH), Some(50));
		assert_eq!(normalized.labels.get("title").map(String::as_str), Some("Job title"));
		assert_eq!(
			normalized.error_targets.get("title").map(String::as_str),
			Some("#title-errors")
		);
	}

	#[rstest]
	fn test_blank_named_declaration_is_skipped() {
		// Arrange
		let specs = vec![
			FieldSpec::new("").min_length(1),
			FieldSpec::new("company").min_length(1),
		];

		// Act
		let normalized = normalize(specs);

		// Assert: the nameless declaration is dropped, the rest register
		assert_eq!(normalized.fields.len(), 1);
		assert_eq!(normalized.fields[0].name(), "company");
	}

	#[rstest]
	fn test_duplicate_field_declaration_replaces_earlier_one() {
		// Arrange
		let specs = vec![
			FieldSpec::new("title").min_length(2),
			FieldSpec::new("title").max_length(10),
		];

		// Act
		let normalized = normalize(specs);

		// Assert
		assert_eq!(normalized.fields.len(), 1);
		assert_eq!(normalized.fields[0].bound(rules::MAX_LENGTH), Some(10));
		assert_eq!(normalized.fields[0].bound(rules::MIN_LENGTH), None);
	}

	#[rstest]
	fn test_zero_bound_is_falsy() {
		// Arrange
		let normalized = normalize(vec![FieldSpec::new("title").min_length(0)]);

		// Act + Assert: the configuration exists but the bound is disabled
		let field = &normalized.fields[0];
		assert!(field.config(rules::MIN_LENGTH).is_some());
		assert_eq!(field.bound(rules::MIN_LENGTH), None);
	}

	#[rstest]
	fn test_custom_error_resolution_order() {
		// Arrange
		let spec = FieldSpec::new("email")
			.email()
			.error("Something is off with this field.")
			.error_for(rules::EMAIL, "That does not look like an email.");
		let normalized = normalize(vec![spec]);

		// Act
		let custom = normalized.custom_errors.get("email").unwrap();

		// Assert: per-rule text wins, blanket covers everything else
		assert_eq!(
			custom.resolve(rules::EMAIL),
			Some("That does not look like an email.")
		);
		assert_eq!(
			custom.resolve(rules::REQUIRED),
			Some("Something is off with this field.")
		);
	}

	#[rstest]
	fn test_redeclared_rule_replaces_config_in_place() {
		// Arrange
		let spec = FieldSpec::new("title").min_length(2).min_length(5);

		// Act
		let normalized = normalize(vec![spec]);

		// Assert
		assert_eq!(normalized.fields[0].bound(rules::MIN_LENGTH), Some(5));
		assert_eq!(normalized.fields[0].rules().count(), 1);
	}
}
