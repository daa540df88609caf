//! Single-user expense tracking: validated records kept in a local
//! key-value store, with search, sorting, statistics and JSON import/export.

pub mod app;
pub mod models;
pub mod search;
pub mod storage;
pub mod store;
pub mod types;
pub mod validation;
