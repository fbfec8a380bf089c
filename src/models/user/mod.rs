mod queries;
mod types;

pub use queries::*;
pub use types::*;

/// Every permission code known to the service. The seed admin gets all of
/// them; regular accounts carry a subset in their `permissions` CSV column.
pub const ALL_PERMISSIONS: &[&str] = &[
    "suggestion.view",
    "suggestion.create",
    "suggestion.update",
    "suggestion.review",
    "suggestion.delete",
    "messages.view",
    "users.manage",
    "audit.view",
];
