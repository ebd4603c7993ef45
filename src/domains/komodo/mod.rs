//! Komodo domain module.
//!
//! Everything needed to reach a Komodo core: the [`KomodoApi`] trait with
//! its read/write/execute primitives, the HTTP [`KomodoClient`], the
//! process-wide [`ClientAccessor`], and [`KomodoError`] with the message
//! extraction used for remote failures.

mod accessor;
mod client;
mod error;

#[cfg(test)]
pub(crate) mod testing;

pub use accessor::ClientAccessor;
pub use client::{KomodoApi, KomodoClient, Verb};
pub use error::{KomodoError, extract_message};
