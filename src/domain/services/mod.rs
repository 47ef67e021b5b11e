pub mod auth_service;
pub mod capacity;
pub mod lifecycle;
pub mod participation;
pub mod roster;
