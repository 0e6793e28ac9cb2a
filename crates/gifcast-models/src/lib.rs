//! Shared data models for the gifcast backend.
//!
//! This crate provides Serde-serializable types for:
//! - Upload requests and conversion outcomes
//! - User records resolved by the access gate

pub mod convert;
pub mod user;

// Re-export common types
pub use convert::{ConvertOutcome, ConvertResponse, UploadRequest};
pub use user::UserRecord;
