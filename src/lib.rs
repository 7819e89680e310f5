pub mod config;
pub mod datetime;
pub mod error;
pub mod loader;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod outcome;
pub mod pipeline;
pub mod raw;
pub mod reference;
pub mod schema;
pub mod sources;
pub mod warnings;
