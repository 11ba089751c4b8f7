pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod theme;
pub mod upload;
pub mod utils;
