pub mod analyzers;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod records;
pub mod session;
