//! Form validator: the per-form validation orchestrator
//!
//! A [`FormValidator`] owns one normalized requirement mapping plus the
//! presentation side tables and submission callbacks. Validation is a pure
//! pass over the submitted snapshot: display names are resolved into a
//! per-call table, so repeated validation of the same snapshot always
//! produces the same result.

use std::collections::HashMap;

use crate::aggregate::aggregate;
use crate::messages::{DisplayNames, MessageContext, MessageRegistry};
use crate::requirements::{CustomMessages, FieldRequirements, FieldSpec, normalize};
use crate::rules::RuleRegistry;
use crate::value::FieldEntry;

/// Behavioral options recognized at form registration.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormOptions {
	/// Host adapters should re-validate on field change events, not only
	/// on submission.
	pub validate_on_change: bool,
}

/// Outcome of one validation pass.
///
/// Field failures are data, not errors: a failing form is an expected
/// outcome. `Passed` echoes the original snapshot for the caller's
/// convenience.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
	Passed { data: Vec<FieldEntry> },
	Failed { errors: HashMap<String, Vec<String>> },
}

impl Validation {
	pub fn passed(&self) -> bool {
		matches!(self, Self::Passed { .. })
	}

	/// Per-field error messages, ordered and de-duplicated within each
	/// field. `None` when validation passed.
	pub fn errors(&self) -> Option<&HashMap<String, Vec<String>>> {
		match self {
			Self::Failed { errors } => Some(errors),
			Self::Passed { .. } => None,
		}
	}

	/// The original snapshot. `None` when validation failed.
	pub fn data(&self) -> Option<&[FieldEntry]> {
		match self {
			Self::Passed { data } => Some(data),
			Self::Failed { .. } => None,
		}
	}

	pub fn field_errors(&self, field: &str) -> Option<&[String]> {
		self.errors()?.get(field).map(Vec::as_slice)
	}
}

type SubmissionCallback = Box<dyn Fn(&Validation) + Send + Sync>;

/// A registered form and its validation requirements.
///
/// Created through [`Regulate::regulate`](crate::Regulate::regulate) and
/// retrieved by form identifier. Requirement state is immutable after
/// registration; only callbacks and display-name translations accumulate.
pub struct FormValidator {
	name: String,
	fields: Vec<FieldRequirements>,
	labels: HashMap<String, String>,
	error_targets: HashMap<String, String>,
	custom_errors: HashMap<String, CustomMessages>,
	/// Per-locale display-name overrides: locale -> field -> display name.
	translations: HashMap<String, HashMap<String, String>>,
	callbacks: Vec<SubmissionCallback>,
	options: FormOptions,
}

impl FormValidator {
	pub(crate) fn new(name: impl Into<String>, specs: Vec<FieldSpec>, options: FormOptions) -> Self {
		let normalized = normalize(specs);
		Self {
			name: name.into(),
			fields: normalized.fields,
			labels: normalized.labels,
			error_targets: normalized.error_targets,
			custom_errors: normalized.custom_errors,
			translations: HashMap::new(),
			callbacks: Vec::new(),
			options,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn options(&self) -> FormOptions {
		self.options
	}

	/// Requirement sets in declaration order.
	pub fn requirements(&self) -> &[FieldRequirements] {
		&self.fields
	}

	pub fn requirement(&self, field: &str) -> Option<&FieldRequirements> {
		self.fields.iter().find(|f| f.name() == field)
	}

	/// Host-element reference registered for a field's rendered errors.
	pub fn error_target(&self, field: &str) -> Option<&str> {
		self.error_targets.get(field).map(String::as_str)
	}

	/// Registers a callback invoked after every validation pass.
	pub fn on_submission<F>(&mut self, callback: F)
	where
		F: Fn(&Validation) + Send + Sync + 'static,
	{
		self.callbacks.push(Box::new(callback));
	}

	/// Adds display-name overrides for one locale. Overrides translate
	/// field names only, never message text.
	pub fn add_translation(
		&mut self,
		locale: impl Into<String>,
		names: HashMap<String, String>,
	) {
		self.translations
			.entry(locale.into())
			.or_default()
			.extend(names);
	}

	pub fn add_translations(&mut self, tables: HashMap<String, HashMap<String, String>>) {
		for (locale, names) in tables {
			self.add_translation(locale, names);
		}
	}

	/// Resolves display names for the given locale into a per-call table:
	/// locale override, else declared label, else the raw field name.
	fn display_names(&self, locale: &str) -> DisplayNames {
		let overrides = self.translations.get(locale);
		let mut names = DisplayNames::default();
		for field in &self.fields {
			let resolved = overrides
				.and_then(|table| table.get(field.name()))
				.or_else(|| self.labels.get(field.name()));
			if let Some(display) = resolved {
				names.insert(field.name(), display);
			}
		}
		names
	}

	fn resolve_message(
		&self,
		rule_name: &str,
		field: &FieldRequirements,
		display_name: &str,
		names: &DisplayNames,
		messages: &MessageRegistry,
	) -> String {
		if let Some(text) = self
			.custom_errors
			.get(field.name())
			.and_then(|custom| custom.resolve(rule_name))
		{
			return text.to_string();
		}
		let ctx = MessageContext {
			display_name,
			reqs: field,
			form: &self.fields,
			names,
		};
		match messages.lookup(rule_name) {
			Some(generator) => (**generator)(&ctx),
			// No generator registered: surface the bare rule name.
			None => rule_name.to_string(),
		}
	}

	fn required_message(
		&self,
		field: &FieldRequirements,
		display_name: &str,
		names: &DisplayNames,
		messages: &MessageRegistry,
	) -> String {
		if let Some(text) = self
			.custom_errors
			.get(field.name())
			.and_then(|custom| custom.resolve(crate::rules::REQUIRED))
		{
			return text.to_string();
		}
		let ctx = MessageContext {
			display_name,
			reqs: field,
			form: &self.fields,
			names,
		};
		messages.required_message(&ctx)
	}

	/// Runs one validation pass over the snapshot and notifies every
	/// registered submission callback with the outcome.
	pub(crate) fn validate(
		&self,
		snapshot: &[FieldEntry],
		rules: &RuleRegistry,
		messages: &MessageRegistry,
	) -> Validation {
		let groups = aggregate(snapshot, &self.fields);
		let names = self.display_names(messages.active_locale());
		let mut errors: HashMap<String, Vec<String>> = HashMap::new();

		for field in &self.fields {
			let display_name = names.resolve(field.name());
			let group = groups
				.get(field.name())
				.map(Vec::as_slice)
				.unwrap_or_default();
			let mut field_errors: Vec<String> = Vec::new();

			if group.is_empty() {
				// An absent field produces exactly one error and is never
				// further rule-checked.
				field_errors.push(self.required_message(field, display_name, &names, messages));
			} else {
				for (rule_name, _) in field.rules() {
					let Some(rule) = rules.lookup(rule_name) else {
						tracing::debug!(rule = rule_name, field = field.name(), "ignoring unregistered rule");
						continue;
					};
					for value in group {
						if (**rule)(value, field, snapshot) {
							continue;
						}
						let message =
							self.resolve_message(rule_name, field, display_name, &names, messages);
						if !field_errors.contains(&message) {
							field_errors.push(message);
						}
					}
				}
			}

			if !field_errors.is_empty() {
				errors.insert(field.name().to_string(), field_errors);
			}
		}

		let outcome = if errors.is_empty() {
			Validation::Passed {
				data: snapshot.to_vec(),
			}
		} else {
			Validation::Failed { errors }
		};

		for callback in &self.callbacks {
			callback(&outcome);
		}

		outcome
	}
}
