// Security module for storage key validation
//
// Prompt identifiers arrive from clients and end up as file names inside the
// storage root. Every key is checked here before it touches the file system.

pub mod key_validator;

pub use key_validator::{validate_key, KeySecurityError};
