//! # Service Layer
//!
//! Use-case services wrap the repositories in transaction boundaries and
//! translate storage conflicts into domain errors before they reach the
//! HTTP layer.

pub mod category;

pub use category::CategoryService;
