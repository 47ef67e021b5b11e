pub mod address;
pub mod auth;
pub mod event;
pub mod participation;
pub mod profile;
pub mod user;
