pub mod auth;
pub mod dashboard;
pub mod deliveries;
pub mod invites;
pub mod members;
pub mod notifications;
pub mod orgs;
pub mod products;
pub mod sales;
pub mod tags;
