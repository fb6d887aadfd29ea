//! Declarative form validation with pluggable rules and localized messages
//!
//! Given a set of named field requirements and a submitted snapshot of
//! `{name, value}` pairs, the engine decides pass/fail per field and
//! produces structured, human-readable error messages. The crate provides:
//! - A rule registry seeded with length, email, cross-field match, checkbox
//!   and multi-select count, and file rules, extensible with custom rules
//! - Locale-partitioned message generation with per-form display-name
//!   translation overrides
//! - Tolerant aggregation of repeated-name field groups (checkboxes,
//!   multi-selects, file inputs) with required-field detection
//! - A process-wide form registry with one-time registration per identifier
//!
//! DOM and event binding are host-adapter concerns: adapters intercept the
//! submission event, extract the snapshot, and call [`Regulate::validate`]
//! (or [`Regulate::submit`]); the engine never touches a page.
//!
//! # Examples
//!
//! ```
//! use regulate::{FieldEntry, FieldSpec, Regulate};
//!
//! let mut engine = Regulate::new();
//! engine
//! 	.regulate("jobPost", vec![
//! 		FieldSpec::new("title").max_length(50).display_as("Job title"),
//! 		FieldSpec::new("company").min_length(1),
//! 		FieldSpec::new("email1").match_field("email2"),
//! 		FieldSpec::new("email2"),
//! 	])
//! 	.unwrap();
//!
//! let snapshot = vec![
//! 	FieldEntry::text("title", "Volcano research assistant"),
//! 	FieldEntry::text("company", "Acme"),
//! 	FieldEntry::text("email1", "hr@acme.com"),
//! 	FieldEntry::text("email2", "hr@acme.com"),
//! ];
//! let outcome = engine.validate("jobPost", &snapshot).unwrap();
//! assert!(outcome.passed());
//! ```

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod form;
pub mod messages;
pub mod requirements;
pub mod rules;
pub mod value;

pub use aggregate::aggregate;
pub use engine::Regulate;
pub use error::{RegulateError, RegulateResult};
pub use form::{FormOptions, FormValidator, Validation};
pub use messages::{
	DEFAULT_LOCALE, DisplayNames, MessageContext, MessageFn, MessageRegistry, MessageTable,
};
pub use requirements::{CustomMessages, FieldRequirements, FieldSpec, RuleConfig};
pub use rules::{RuleFn, RuleRegistry};
pub use value::{FieldEntry, FieldValue};
