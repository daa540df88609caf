mod engine;

pub use engine::{compile_query, filter, highlight, sort};
