//! Phone enrollment form state: country selection, search filtering,
//! phone formatting and length validation, submission lifecycle.
//!
//! Pure and synchronous; no I/O. The async side (token, catalog,
//! submission) lives in `softpoint-client`.

mod error;
mod form;
mod format;

pub use error::FormError;
pub use form::{EnrollmentForm, Phase};
pub use format::{format_phone, strip_digits, validation_message};
