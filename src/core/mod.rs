//! Core library components.
//!
//! The resolution pipeline (document store, cipher gateway, resolver,
//! writer) and the lifecycle adapter that drives it.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod document;
pub mod domain;
pub mod lifecycle;
pub mod resolver;
pub mod writer;
