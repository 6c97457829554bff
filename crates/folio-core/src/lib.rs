//! Core types, validation and use cases for the Folio content service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod content;
pub mod error;
pub mod filter;
pub mod service;
pub mod store;
pub mod user;

mod text;

pub use error::{Error, Result, ValidationError};
