// Input side of the hook: parsing ref update records and sorting them into namespaces.
pub mod classify;
pub mod commands;

/// Re-exports for crate users.
pub use classify::{RefClassifier, RefKind};
pub use commands::{RefUpdate, RefUpdateList};
