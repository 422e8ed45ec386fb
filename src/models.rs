pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod invites;
pub mod notifications;
pub mod org;
pub mod sales;
