pub mod models;
pub mod queries;
pub mod source;

pub use source::{open_pool, AggregateSource, SqliteSource};
