#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Typed Rust client for the Scribe transcription relay
//!
//! [`ScribeClient`] talks to the relay's credential and transcription
//! endpoints. [`SubmissionFlow`] layers the single-submission state machine
//! and user-facing notices on top of it.

mod client;
pub mod clipboard;
pub mod error;
pub mod notice;
pub mod submission;
pub mod types;

pub use client::{DEFAULT_CSRF_HEADER, ScribeClient};
pub use clipboard::Clipboard;
pub use error::{ClientError, FailureCategory, Result};
pub use notice::{Notice, Severity};
pub use submission::{CANCELLED, Outcome, SubmissionEvent, SubmissionFlow, SubmissionState, reduce};
pub use types::{AudioInput, KeyStatus, Transcription};

#[cfg(feature = "clipboard")]
pub use clipboard::SystemClipboard;
