//! Engine owning the rule, message, and form registries
//!
//! There is no implicit global state: callers construct a [`Regulate`]
//! engine at process start and register forms, rules, and translations on
//! it. Isolated engines make isolated tests.

use std::collections::HashMap;

use crate::error::{RegulateError, RegulateResult};
use crate::form::{FormOptions, FormValidator, Validation};
use crate::messages::{MessageContext, MessageRegistry, MessageTable};
use crate::requirements::{FieldRequirements, FieldSpec};
use crate::rules::RuleRegistry;
use crate::value::{FieldEntry, FieldValue};

/// The validation engine: a form registry plus the rule and message
/// registries every form shares.
///
/// # Examples
///
/// ```
/// use regulate::{FieldEntry, FieldSpec, Regulate};
///
/// let mut engine = Regulate::new();
/// engine
/// 	.regulate("register", vec![
/// 		FieldSpec::new("username").min_length(6).max_length(18),
/// 		FieldSpec::new("email").email(),
/// 	])
/// 	.unwrap();
///
/// let snapshot = vec![
/// 	FieldEntry::text("username", "johndoe"),
/// 	FieldEntry::text("email", "john@example.com"),
/// ];
/// let outcome = engine.validate("register", &snapshot).unwrap();
/// assert!(outcome.passed());
/// ```
pub struct Regulate {
	rules: RuleRegistry,
	messages: MessageRegistry,
	forms: HashMap<String, FormValidator>,
}

impl Regulate {
	pub fn new() -> Self {
		Self {
			rules: RuleRegistry::new(),
			messages: MessageRegistry::new(),
			forms: HashMap::new(),
		}
	}

	/// Registers a form and its validation requirements. Exactly one
	/// registration per identifier; re-registration is a programmer error.
	pub fn regulate(
		&mut self,
		name: impl Into<String>,
		specs: Vec<FieldSpec>,
	) -> RegulateResult<()> {
		self.regulate_with_options(name, specs, FormOptions::default())
	}

	pub fn regulate_with_options(
		&mut self,
		name: impl Into<String>,
		specs: Vec<FieldSpec>,
		options: FormOptions,
	) -> RegulateResult<()> {
		let name = name.into();
		if self.forms.contains_key(&name) {
			return Err(RegulateError::DuplicateForm(name));
		}
		let validator = FormValidator::new(name.clone(), specs, options);
		self.forms.insert(name, validator);
		Ok(())
	}

	pub fn form(&self, name: &str) -> Option<&FormValidator> {
		self.forms.get(name)
	}

	pub fn form_mut(&mut self, name: &str) -> Option<&mut FormValidator> {
		self.forms.get_mut(name)
	}

	/// Registers a custom validation rule shared by every form.
	pub fn register_rule<F>(&mut self, name: impl Into<String>, rule: F) -> RegulateResult<()>
	where
		F: Fn(&FieldValue, &FieldRequirements, &[FieldEntry]) -> bool + Send + Sync + 'static,
	{
		self.rules.register(name, rule)
	}

	/// Registers a message generator in the persistent overlay, typically
	/// paired with [`Regulate::register_rule`].
	pub fn register_message<F>(&mut self, rule: impl Into<String>, generator: F)
	where
		F: Fn(&MessageContext<'_>) -> String + Send + Sync + 'static,
	{
		self.messages.register(rule, generator);
	}

	/// Registers a locale's message table. One registration per locale;
	/// built-in tables are never silently overwritten.
	pub fn add_translation(
		&mut self,
		locale: impl Into<String>,
		table: MessageTable,
	) -> RegulateResult<()> {
		self.messages.add_translation(locale, table)
	}

	pub fn add_translations(&mut self, tables: HashMap<String, MessageTable>) -> RegulateResult<()> {
		self.messages.add_translations(tables)
	}

	/// Switches the active message locale for every form on this engine.
	pub fn use_translation(&mut self, locale: &str) -> RegulateResult<()> {
		self.messages.use_translation(locale)
	}

	pub fn rules(&self) -> &RuleRegistry {
		&self.rules
	}

	pub fn messages(&self) -> &MessageRegistry {
		&self.messages
	}

	/// Validates a snapshot against a registered form, invoking the form's
	/// submission callbacks with the outcome.
	pub fn validate(&self, form: &str, snapshot: &[FieldEntry]) -> RegulateResult<Validation> {
		let validator = self
			.forms
			.get(form)
			.ok_or_else(|| RegulateError::UnknownForm(form.to_string()))?;
		Ok(validator.validate(snapshot, &self.rules, &self.messages))
	}

	/// Submission-binding entry point. Host adapters forward the extracted
	/// snapshot here; forwarding nothing is a fatal [`RegulateError::MissingInput`],
	/// never an empty success.
	pub fn submit(
		&self,
		form: &str,
		snapshot: Option<&[FieldEntry]>,
	) -> RegulateResult<Validation> {
		let snapshot = snapshot.ok_or(RegulateError::MissingInput)?;
		self.validate(form, snapshot)
	}
}

impl Default for Regulate {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_duplicate_form_registration_fails() {
		// Arrange
		let mut engine = Regulate::new();
		engine.regulate("signup", vec![FieldSpec::new("email").email()]).unwrap();

		// Act
		let result = engine.regulate("signup", vec![FieldSpec::new("email")]);

		// Assert: never silently overwrites
		assert!(matches!(result, Err(RegulateError::DuplicateForm(_))));
		assert!(engine.form("signup").is_some());
	}

	#[rstest]
	fn test_unknown_form_fails() {
		let engine = Regulate::new();

		let result = engine.validate("ghost", &[]);

		assert!(matches!(result, Err(RegulateError::UnknownForm(_))));
	}

	#[rstest]
	fn test_submit_without_snapshot_is_missing_input() {
		// Arrange
		let mut engine = Regulate::new();
		engine.regulate("signup", vec![FieldSpec::new("email")]).unwrap();

		// Act
		let result = engine.submit("signup", None);

		// Assert
		assert!(matches!(result, Err(RegulateError::MissingInput)));
	}

	#[rstest]
	fn test_submit_with_snapshot_matches_validate() {
		// Arrange
		let mut engine = Regulate::new();
		engine.regulate("signup", vec![FieldSpec::new("email").email()]).unwrap();
		let snapshot = vec![FieldEntry::text("email", "a@b.com")];

		// Act
		let submitted = engine.submit("signup", Some(&snapshot)).unwrap();
		let validated = engine.validate("signup", &snapshot).unwrap();

		// Assert
		assert_eq!(submitted, validated);
	}

	#[rstest]
	fn test_forms_persist_for_the_engine_lifetime() {
		// Arrange
		let mut engine = Regulate::new();
		engine
			.regulate_with_options(
				"live",
				vec![FieldSpec::new("q")],
				FormOptions {
					validate_on_change: true,
				},
			)
			.unwrap();

		// Act
		let form = engine.form("live").unwrap();

		// Assert
		assert_eq!(form.name(), "live");
		assert!(form.options().validate_on_change);
	}
}
