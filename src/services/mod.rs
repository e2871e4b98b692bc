//! Business logic services layer

pub mod credential_service;

pub use credential_service::{AuthOutcome, CredentialService, CredentialStore};
