//! Template-storage service client.
//!
//! Blocking reqwest client (no async runtime required). The storage
//! service is the only asynchronous boundary of the editor: templates are
//! fetched at session start and pushed on explicit save. A failed push
//! surfaces an error and consumes nothing, so the caller's in-memory grid
//! is unchanged and the save can be retried.

pub mod auth;
pub mod client;

pub use auth::{auth_file_path, delete_auth, load_auth, save_auth, AuthCredentials};
pub use client::{StoreClient, StoreError};
