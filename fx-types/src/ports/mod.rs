//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod notifier;
mod provider;
mod store;

pub use notifier::{AlertNotifier, NotifyError};
pub use provider::{ProviderError, RateProvider};
pub use store::SnapshotStore;
