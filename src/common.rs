pub mod contact;
pub mod error;
