//! Route handlers module.

pub mod activity;
pub mod config;
pub mod health;
pub mod notifications;
pub mod session;
