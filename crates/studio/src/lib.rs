//! Orchestration between the sealed credential and the speech provider.
//!
//! [`Studio`] opens the stored API key once per request, hands it to the
//! provider (which owns retries), and returns framed audio. Failures keep
//! their kind so the UI layer can pick a message via
//! [`StudioError::user_message`].

pub mod error;
pub mod studio;

pub use {
    error::{ErrorKind, StudioError},
    studio::Studio,
};
