//! Typed client for the Softpoint two-factor enrollment API.

mod client;
mod error;
mod session;
mod types;

pub use client::SoftpointClient;
pub use error::SoftpointError;
pub use session::EnrollmentSession;
pub use types::*;
