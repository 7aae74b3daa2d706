/// Session endpoints
pub mod auth;
/// Volunteer registry endpoints
pub mod volunteer;
