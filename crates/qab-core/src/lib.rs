//! Core domain + application logic for the quiz activation bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and Supabase live
//! behind ports (traits) implemented in adapter crates.

pub mod admin;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod replies;
pub mod security;
pub mod store;

pub use errors::{Error, Result};
