// src/security/mod.rs
//! Secret handling: environment-sourced credentials, the gas wallet signer,
//! and redaction helpers for logs.

pub mod env_manager;
pub mod redaction;
pub mod secret;
pub mod signer;

pub use env_manager::Credentials;
pub use redaction::redact_url;
pub use secret::{PrivateKey, SecretVec};
