pub mod args;
pub mod config;
pub mod model;
pub mod report;
pub mod store;
pub mod utils;
