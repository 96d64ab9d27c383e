//! The API endpoints URIs.

/// The route to list, create and delete transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to get and set the savings target.
pub const SETTINGS: &str = "/settings";
/// The route to get the totals and the progress towards the savings target.
pub const SUMMARY: &str = "/summary";
/// The route to get the personalized content for a user.
pub const PROFILE: &str = "/profiles/{name}";
