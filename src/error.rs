//! Error taxonomy for registration and validation entry points
//!
//! Per-field validation failures are never errors: "the form has errors" is
//! an expected outcome carried as data by
//! [`Validation::Failed`](crate::form::Validation). The variants here cover
//! configuration mistakes and misuse of the entry points.

/// Errors raised by the registration, translation, and validation APIs.
#[derive(Debug, thiserror::Error)]
pub enum RegulateError {
	/// Malformed registration input at the adapter boundary.
	///
	/// A declaration without a field name is not reported through this
	/// variant; the normalizer skips it and keeps going (a recoverable
	/// skip, logged at `warn`).
	#[error("Malformed input: {0}")]
	Config(String),

	/// A form identifier was registered twice.
	#[error("Form '{0}' is already being validated")]
	DuplicateForm(String),

	/// A rule name collided with an existing built-in or custom rule.
	/// Built-ins are never silently overridable.
	#[error("'{0}' is already defined as a rule")]
	DuplicateRule(String),

	/// A form identifier was never registered.
	#[error("No form registered under '{0}'")]
	UnknownForm(String),

	/// A locale's message table was registered twice. Built-in tables are
	/// never silently overwritable; custom-rule messages that must apply
	/// everywhere belong in the overlay instead.
	#[error("Locale '{0}' already has a registered translation")]
	DuplicateLocale(String),

	/// `use_translation` was called for a locale that was never added.
	/// There is no silent fallback.
	#[error("No translation registered for locale '{0}'")]
	LocaleNotFound(String),

	/// A submission binding forwarded no field snapshot. Validating
	/// nothing must never silently pass.
	#[error("Field values must be supplied in order to validate")]
	MissingInput,
}

pub type RegulateResult<T> = Result<T, RegulateError>;
