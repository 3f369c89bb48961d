pub mod actions;
pub mod blob;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod store;
pub mod validation;

#[cfg(test)]
pub mod testing;
