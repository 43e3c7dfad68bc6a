//! Test utilities for outbound ports
//!
//! `mockall` mocks cover call expectations; these recording fakes cover the
//! cases where tests assert on the order of UI effects or on the exact frames
//! written. Available in unit tests and with the `testing` feature enabled.
//!
//! # Usage
//!
//! ```ignore
//! use crate::ports::outbound::testing::{RecordingSink, RecordingUi, UiCall};
//! ```

#[cfg(any(test, feature = "testing"))]
mod recording;

#[cfg(any(test, feature = "testing"))]
pub use recording::{RecordingSink, RecordingUi, UiCall};
