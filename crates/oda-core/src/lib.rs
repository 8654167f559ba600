//! OneDragon-Agent Core — foundation types shared across the runtime.
//!
//! This crate provides:
//! - Session identity (`SessionTriple`, `SessionId`)
//! - Reserved id constants, centralized so every mutation path checks the same source
//! - The shared [`OdaError`] kinds, composed into crate-local error types via `#[from]`

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod error;
pub mod ids;
pub mod reserved;

pub use error::{OdaError, OdaResult};
pub use ids::{SessionId, SessionTriple};
