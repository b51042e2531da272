//! Error handling for segmented inflate operations
//!
//! This module re-exports the error types used throughout the crate. They are
//! built with thiserror and grouped by [`ErrorKind`] so callers can tell capacity,
//! protocol-state and data-format faults apart.

pub use crate::common::ErrorKind;
pub use crate::common::Result;
pub use crate::common::SegflateError;
