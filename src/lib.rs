pub mod config;
pub mod error;
pub mod fetch;
pub mod kml;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod station;
