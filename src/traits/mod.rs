//! Core traits for the container.

pub mod injectable;

pub use injectable::{Arguments, Injectable};
