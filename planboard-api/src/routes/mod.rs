/// HTTP route handlers
pub mod auth;
pub mod health;
pub mod members;
pub mod notifications;
pub mod plans;
pub mod sections;
pub mod summary;
