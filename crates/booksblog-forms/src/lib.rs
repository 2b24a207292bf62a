//! Form handling for booksblog.
//!
//! Fields clean raw submitted strings into typed values and report
//! [`FieldError`]s; [`FormErrors`] collects them per field so a page can be
//! re-rendered next to the submitted input.
//!
//! ```
//! use booksblog_forms::{CharField, FormErrors, IntegerField};
//!
//! let mut errors = FormErrors::new();
//! let title = errors.capture("title", CharField::new("title").required().with_max_length(128).clean(Some("Dune")));
//! let rating = errors.capture("rating", IntegerField::new("rating").with_range(0, 5).clean(Some("7")));
//!
//! assert_eq!(title.as_deref(), Some("Dune"));
//! assert!(rating.is_none());
//! assert!(errors.has_field("rating"));
//! ```

pub mod errors;
pub mod field;
pub mod fields;
pub mod validators;

pub use errors::FormErrors;
pub use field::{FieldError, FieldResult};
pub use fields::{BooleanField, CharField, ChoiceField, IntegerField};
pub use validators::{EmailValidator, UsernameValidator};
