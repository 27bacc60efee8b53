mod client;
mod credentials;
pub mod models;

pub use client::{HttpAssetStore, status_error};
pub use credentials::{CredentialProvider, NoCredentials, SharedToken, StaticToken};
