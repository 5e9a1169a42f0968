//! Core types and operations for the Roster contact-sharing service.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement [`store::UserStore`]; the repository, sharing and
//! notification modules express every operation in terms of that trait.

pub mod error;
pub mod model;
pub mod notifications;
pub mod repository;
pub mod sharing;
pub mod store;
pub mod update;

pub use error::{Error, Result};
