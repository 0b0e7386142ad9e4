//! Core inactivity monitoring logic.
//!
//! This module contains the qualifying-activity definitions and the
//! session monitor that warns and then forces a logout after the user has
//! been idle for too long.

pub mod activity;
pub mod countdown;
pub mod inactivity;

pub use activity::*;
pub use countdown::*;
pub use inactivity::*;
