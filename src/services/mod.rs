pub mod auth;
pub mod respond;
