//! Clients for external collaborators
//!
//! Blob storage and webhook notification sit behind object-safe traits so the
//! submission handlers can run against fakes.

pub mod blob_store;
pub mod github;
pub mod notifier;

pub use blob_store::{BlobError, BlobStore, DisabledBlobStore, HttpBlobStore};
pub use github::{GithubClient, GithubError, GithubStats};
pub use notifier::{DisabledNotifier, Notification, Notifier, NotifyError, SlackNotifier};
