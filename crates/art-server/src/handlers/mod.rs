pub mod collections;
pub mod health;
pub mod sessions;
pub mod strategies;
