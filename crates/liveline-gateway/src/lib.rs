//! Liveline Gateway — HTTP boundary over the desk engine

pub mod assist;
pub mod server;

pub use server::{app, start_gateway, AppState};
