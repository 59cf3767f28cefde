//! Form errors.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("No country selected")]
    NoCountrySelected,

    #[error("Phone number is empty")]
    EmptyPhoneNumber,

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("No country at position {0}")]
    InvalidSelection(usize),
}
