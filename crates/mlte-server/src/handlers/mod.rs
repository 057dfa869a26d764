//! Request handlers, one module per resource.

pub mod artifacts;
pub mod health;
pub mod models;
pub mod namespaces;
pub mod versions;
