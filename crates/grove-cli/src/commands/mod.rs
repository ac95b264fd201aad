pub mod completions;
pub mod config;
pub mod grow;
pub mod stats;
