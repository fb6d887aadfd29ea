//! Message generation and locale tables
//!
//! A message generator turns a failed rule into human-readable text. The
//! registry partitions generators by locale, seeded with built-in English
//! and Spanish tables, plus a process-wide overlay for generators
//! registered outside the translation tables (custom-rule messages that
//! must survive locale switches).

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{RegulateError, RegulateResult};
use crate::requirements::FieldRequirements;
use crate::rules;

/// Locale the registry starts in. Always carries the full built-in table.
pub const DEFAULT_LOCALE: &str = "en";

/// Per-call display-name table, resolved before rule evaluation.
///
/// Built fresh on every validation pass so that locale switches and
/// per-form overrides never mutate long-lived requirement state.
#[derive(Debug, Clone, Default)]
pub struct DisplayNames {
	names: HashMap<String, String>,
}

impl DisplayNames {
	pub(crate) fn insert(&mut self, field: &str, display: &str) {
		self.names.insert(field.to_string(), display.to_string());
	}

	/// Resolved display name, falling back to the raw field name.
	pub fn resolve<'a>(&'a self, field: &'a str) -> &'a str {
		self.names.get(field).map(String::as_str).unwrap_or(field)
	}
}

/// Context handed to message generators for one failed rule.
pub struct MessageContext<'a> {
	/// Resolved display name of the failing field.
	pub display_name: &'a str,
	/// The failing field's requirement set.
	pub reqs: &'a FieldRequirements,
	/// Every requirement set on the form, for cross-field messages.
	pub form: &'a [FieldRequirements],
	/// Resolved display names for every declared field.
	pub names: &'a DisplayNames,
}

pub type MessageFn = Arc<dyn Fn(&MessageContext<'_>) -> String + Send + Sync>;

/// Message generators for one locale, keyed by rule name.
#[derive(Clone, Default)]
pub struct MessageTable {
	generators: HashMap<String, MessageFn>,
}

impl MessageTable {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set<F>(&mut self, rule: impl Into<String>, generator: F)
	where
		F: Fn(&MessageContext<'_>) -> String + Send + Sync + 'static,
	{
		self.generators.insert(rule.into(), Arc::new(generator));
	}

	/// Builder-style [`MessageTable::set`].
	pub fn with<F>(mut self, rule: impl Into<String>, generator: F) -> Self
	where
		F: Fn(&MessageContext<'_>) -> String + Send + Sync + 'static,
	{
		self.set(rule, generator);
		self
	}

	pub fn get(&self, rule: &str) -> Option<&MessageFn> {
		self.generators.get(rule)
	}
}

fn count_message(prefix: &str, singular: &str, plural: &str, count: u64) -> String {
	let noun = if count == 1 { singular } else { plural };
	format!("{prefix} {count} {noun}.")
}

/// Built-in English messages.
///
/// The `required` verb is chosen by checking whether the display name ends
/// in `s` ("Skills are required." vs "Name is required."). A heuristic,
/// not grammatical analysis; callers who need better grammar override the
/// generator.
pub fn english() -> MessageTable {
	MessageTable::new()
		.with(rules::REQUIRED, |ctx| {
			let verb = if ctx.display_name.ends_with('s') {
				"are"
			} else {
				"is"
			};
			format!("{} {} required.", ctx.display_name, verb)
		})
		.with(rules::EMAIL, |ctx| {
			format!("{} must be a valid email.", ctx.display_name)
		})
		.with(rules::MATCH_FIELD, |ctx| {
			let target = ctx.reqs.text(rules::MATCH_FIELD).unwrap_or_default();
			format!(
				"{} must match {}.",
				ctx.display_name,
				ctx.names.resolve(target)
			)
		})
		.with(rules::MIN_LENGTH, |ctx| {
			format!(
				"{} must have a minimum length of {}.",
				ctx.display_name,
				ctx.reqs.bound(rules::MIN_LENGTH).unwrap_or(0)
			)
		})
		.with(rules::MAX_LENGTH, |ctx| {
			format!(
				"{} must have a maximum length of {}.",
				ctx.display_name,
				ctx.reqs.bound(rules::MAX_LENGTH).unwrap_or(0)
			)
		})
		.with(rules::EXACT_LENGTH, |ctx| {
			format!(
				"{} must have an exact length of {}.",
				ctx.display_name,
				ctx.reqs.bound(rules::EXACT_LENGTH).unwrap_or(0)
			)
		})
		.with(rules::MIN_CHECKED, |ctx| {
			count_message(
				"Check at least",
				"checkbox",
				"checkboxes",
				ctx.reqs.bound(rules::MIN_CHECKED).unwrap_or(0),
			)
		})
		.with(rules::MAX_CHECKED, |ctx| {
			count_message(
				"Check a maximum of",
				"checkbox",
				"checkboxes",
				ctx.reqs.bound(rules::MAX_CHECKED).unwrap_or(0),
			)
		})
		.with(rules::EXACT_CHECKED, |ctx| {
			count_message(
				"Check exactly",
				"checkbox",
				"checkboxes",
				ctx.reqs.bound(rules::EXACT_CHECKED).unwrap_or(0),
			)
		})
		.with(rules::MIN_SELECTED, |ctx| {
			count_message(
				"Select at least",
				"option",
				"options",
				ctx.reqs.bound(rules::MIN_SELECTED).unwrap_or(0),
			)
		})
		.with(rules::MAX_SELECTED, |ctx| {
			count_message(
				"Select a maximum of",
				"option",
				"options",
				ctx.reqs.bound(rules::MAX_SELECTED).unwrap_or(0),
			)
		})
		.with(rules::EXACT_SELECTED, |ctx| {
			count_message(
				"Select exactly",
				"option",
				"options",
				ctx.reqs.bound(rules::EXACT_SELECTED).unwrap_or(0),
			)
		})
		.with(rules::MAX_SIZE, |ctx| {
			format!(
				"{} must not exceed {} bytes.",
				ctx.display_name,
				ctx.reqs.bound(rules::MAX_SIZE).unwrap_or(0)
			)
		})
		.with(rules::ACCEPTED_FILES, |ctx| {
			format!(
				"{} must be one of the accepted file types.",
				ctx.display_name
			)
		})
}

/// Built-in Spanish messages.
pub fn spanish() -> MessageTable {
	MessageTable::new()
		.with(rules::REQUIRED, |ctx| {
			if ctx.display_name.ends_with('s') {
				format!("{} estan requeridos.", ctx.display_name)
			} else {
				format!("{} esta requerido.", ctx.display_name)
			}
		})
		.with(rules::EMAIL, |ctx| {
			format!("{} debe ser valido.", ctx.display_name)
		})
		.with(rules::MATCH_FIELD, |ctx| {
			let target = ctx.reqs.text(rules::MATCH_FIELD).unwrap_or_default();
			format!(
				"{} debe coincidir con {}.",
				ctx.display_name,
				ctx.names.resolve(target)
			)
		})
		.with(rules::MIN_LENGTH, |ctx| {
			format!(
				"{} debe tener un mínimo de {} caracteres.",
				ctx.display_name,
				ctx.reqs.bound(rules::MIN_LENGTH).unwrap_or(0)
			)
		})
		.with(rules::MAX_LENGTH, |ctx| {
			format!(
				"{} debe tener un máximo de {} caracteres.",
				ctx.display_name,
				ctx.reqs.bound(rules::MAX_LENGTH).unwrap_or(0)
			)
		})
		.with(rules::EXACT_LENGTH, |ctx| {
			format!(
				"{} debe tener exactamente {} caracteres.",
				ctx.display_name,
				ctx.reqs.bound(rules::EXACT_LENGTH).unwrap_or(0)
			)
		})
		.with(rules::MIN_CHECKED, |ctx| {
			count_message(
				"Marca al menos",
				"casilla",
				"casillas",
				ctx.reqs.bound(rules::MIN_CHECKED).unwrap_or(0),
			)
		})
		.with(rules::MAX_CHECKED, |ctx| {
			count_message(
				"Marca un máximo de",
				"casilla",
				"casillas",
				ctx.reqs.bound(rules::MAX_CHECKED).unwrap_or(0),
			)
		})
		.with(rules::EXACT_CHECKED, |ctx| {
			count_message(
				"Marca exactamente",
				"casilla",
				"casillas",
				ctx.reqs.bound(rules::EXACT_CHECKED).unwrap_or(0),
			)
		})
		.with(rules::MIN_SELECTED, |ctx| {
			count_message(
				"Selecciona al menos",
				"opción",
				"opciones",
				ctx.reqs.bound(rules::MIN_SELECTED).unwrap_or(0),
			)
		})
		.with(rules::MAX_SELECTED, |ctx| {
			count_message(
				"Selecciona un máximo de",
				"opción",
				"opciones",
				ctx.reqs.bound(rules::MAX_SELECTED).unwrap_or(0),
			)
		})
		.with(rules::EXACT_SELECTED, |ctx| {
			count_message(
				"Selecciona exactamente",
				"opción",
				"opciones",
				ctx.reqs.bound(rules::EXACT_SELECTED).unwrap_or(0),
			)
		})
}

/// Locale-partitioned message generators with a persistent overlay.
///
/// Lookup order: overlay first (generators registered via
/// [`MessageRegistry::register`] persist across locale switches), then the
/// active locale's table. A rule with no generator anywhere surfaces its
/// bare name as the error token.
pub struct MessageRegistry {
	locales: HashMap<String, MessageTable>,
	overlay: MessageTable,
	active: String,
}

impl MessageRegistry {
	pub fn new() -> Self {
		let mut locales = HashMap::new();
		locales.insert(DEFAULT_LOCALE.to_string(), english());
		locales.insert("es".to_string(), spanish());
		Self {
			locales,
			overlay: MessageTable::new(),
			active: DEFAULT_LOCALE.to_string(),
		}
	}

	pub fn active_locale(&self) -> &str {
		&self.active
	}

	/// Registers a locale's message table. Registering an existing locale
	/// (built-in or custom) is a programmer error, never an overwrite.
	pub fn add_translation(
		&mut self,
		locale: impl Into<String>,
		table: MessageTable,
	) -> RegulateResult<()> {
		let locale = locale.into();
		if self.locales.contains_key(&locale) {
			return Err(RegulateError::DuplicateLocale(locale));
		}
		self.locales.insert(locale, table);
		Ok(())
	}

	pub fn add_translations(&mut self, tables: HashMap<String, MessageTable>) -> RegulateResult<()> {
		for (locale, table) in tables {
			self.add_translation(locale, table)?;
		}
		Ok(())
	}

	/// Switches the active locale. Fails when the locale was never
	/// registered; the overlay is unaffected by switches.
	pub fn use_translation(&mut self, locale: &str) -> RegulateResult<()> {
		if !self.locales.contains_key(locale) {
			return Err(RegulateError::LocaleNotFound(locale.to_string()));
		}
		self.active = locale.to_string();
		Ok(())
	}

	/// Registers a process-wide generator in the overlay, typically the
	/// message for a custom rule.
	pub fn register<F>(&mut self, rule: impl Into<String>, generator: F)
	where
		F: Fn(&MessageContext<'_>) -> String + Send + Sync + 'static,
	{
		self.overlay.set(rule, generator);
	}

	pub fn lookup(&self, rule: &str) -> Option<&MessageFn> {
		self.overlay.get(rule).or_else(|| {
			self.locales
				.get(&self.active)
				.and_then(|table| table.get(rule))
		})
	}

	/// The empty-field message. A `required` generator is mandatory: when
	/// a caller-supplied locale table lacks one, the default locale's
	/// generator is used rather than a bare token.
	pub fn required_message(&self, ctx: &MessageContext<'_>) -> String {
		if let Some(generator) = self.lookup(rules::REQUIRED) {
			return (**generator)(ctx);
		}
		self.locales
			.get(DEFAULT_LOCALE)
			.and_then(|table| table.get(rules::REQUIRED))
			.map(|generator| (**generator)(ctx))
			.unwrap_or_else(|| rules::REQUIRED.to_string())
	}
}

impl Default for MessageRegistry {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::requirements::{FieldSpec, normalize};
	use rstest::rstest;

	fn context_fixture(spec: FieldSpec) -> (Vec<FieldRequirements>, DisplayNames) {
		let normalized = normalize(vec![spec]);
		(normalized.fields, DisplayNames::default())
	}

	fn render(registry: &MessageRegistry, rule: &str, display_name: &str, spec: FieldSpec) -> String {
		let (fields, names) = context_fixture(spec);
		let ctx = MessageContext {
			display_name,
			reqs: &fields[0],
			form: &fields,
			names: &names,
		};
		match registry.lookup(rule) {
			Some(generator) => (**generator)(&ctx),
			None => rule.to_string(),
		}
	}

	#[rstest]
	#[case("Name", "Name is required.")]
	#[case("Skills", "Skills are required.")]
	fn test_required_pluralization_heuristic(#[case] display: &str, #[case] expected: &str) {
		// Arrange
		let registry = MessageRegistry::new();

		// Act
		let message = render(&registry, rules::REQUIRED, display, FieldSpec::new("f"));

		// Assert
		assert_eq!(message, expected);
	}

	#[rstest]
	fn test_match_field_resolves_target_display_name() {
		// Arrange
		let registry = MessageRegistry::new();
		let normalized = normalize(vec![
			FieldSpec::new("email1").match_field("email2"),
			FieldSpec::new("email2"),
		]);
		let mut names = DisplayNames::default();
		names.insert("email2", "Confirmation email");
		let ctx = MessageContext {
			display_name: "Email",
			reqs: &normalized.fields[0],
			form: &normalized.fields,
			names: &names,
		};

		// Act
		let generator = registry.lookup(rules::MATCH_FIELD).unwrap();
		let message = (**generator)(&ctx);

		// Assert
		assert_eq!(message, "Email must match Confirmation email.");
	}

	#[rstest]
	fn test_match_field_falls_back_to_raw_target_name() {
		let registry = MessageRegistry::new();
		let message = render(
			&registry,
			rules::MATCH_FIELD,
			"Email",
			FieldSpec::new("email1").match_field("email2"),
		);

		assert_eq!(message, "Email must match email2.");
	}

	#[rstest]
	#[case(1, "Check at least 1 checkbox.")]
	#[case(2, "Check at least 2 checkboxes.")]
	fn test_count_message_pluralization(#[case] bound: u64, #[case] expected: &str) {
		let registry = MessageRegistry::new();
		let message = render(
			&registry,
			rules::MIN_CHECKED,
			"cbs",
			FieldSpec::new("cbs").min_checked(bound),
		);

		assert_eq!(message, expected);
	}

	#[rstest]
	fn test_use_translation_unknown_locale_fails() {
		// Arrange
		let mut registry = MessageRegistry::new();

		// Act
		let result = registry.use_translation("pirate");

		// Assert: no silent fallback
		assert!(matches!(result, Err(RegulateError::LocaleNotFound(_))));
		assert_eq!(registry.active_locale(), DEFAULT_LOCALE);
	}

	#[rstest]
	fn test_spanish_required_message() {
		// Arrange
		let mut registry = MessageRegistry::new();
		registry.use_translation("es").unwrap();

		// Act
		let message = render(&registry, rules::REQUIRED, "Nombre", FieldSpec::new("f"));

		// Assert
		assert_eq!(message, "Nombre esta requerido.");
	}

	#[rstest]
	fn test_overlay_persists_across_locale_switches() {
		// Arrange
		let mut registry = MessageRegistry::new();
		registry.register("all_caps", |ctx| {
			format!("{} must be shouted.", ctx.display_name)
		});

		// Act
		registry.use_translation("es").unwrap();
		let message = render(&registry, "all_caps", "Slogan", FieldSpec::new("f"));

		// Assert: the custom-rule message survives the switch
		assert_eq!(message, "Slogan must be shouted.");
	}

	#[rstest]
	fn test_overlay_wins_over_locale_table() {
		// Arrange
		let mut registry = MessageRegistry::new();
		registry.register(rules::EMAIL, |ctx| {
			format!("{}: bad email.", ctx.display_name)
		});

		// Act
		let message = render(
			&registry,
			rules::EMAIL,
			"Email",
			FieldSpec::new("f").email(),
		);

		// Assert
		assert_eq!(message, "Email: bad email.");
	}

	#[rstest]
	fn test_missing_required_generator_falls_back_to_default_locale() {
		// Arrange: a caller-supplied locale without a required generator
		let mut registry = MessageRegistry::new();
		registry
			.add_translation(
				"xx",
				MessageTable::new().with(rules::EMAIL, |_| "bad email".to_string()),
			)
			.unwrap();
		registry.use_translation("xx").unwrap();
		let (fields, names) = context_fixture(FieldSpec::new("f"));
		let ctx = MessageContext {
			display_name: "Name",
			reqs: &fields[0],
			form: &fields,
			names: &names,
		};

		// Act
		let message = registry.required_message(&ctx);

		// Assert
		assert_eq!(message, "Name is required.");
	}

	#[rstest]
	fn test_unknown_rule_has_no_generator() {
		let registry = MessageRegistry::new();

		assert!(registry.lookup("no_such_rule").is_none());
	}
}
