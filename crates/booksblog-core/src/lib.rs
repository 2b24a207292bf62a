//! Core types shared by every booksblog crate.
//!
//! The only thing living here is the framework-level [`exception::Error`]
//! every view and middleware returns. Domain crates define their own error
//! enums and convert into it with `From`, so handlers can use `?` freely.

pub mod exception;

pub use exception::{Error, Result};
