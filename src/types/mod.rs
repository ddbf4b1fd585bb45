pub mod config;
pub mod scoring;
pub mod suggestion;
pub mod target;
