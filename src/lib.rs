pub mod config;
pub mod engine;
pub mod error;
pub mod hpc;
pub mod launch;
pub mod logger;
pub mod resources;
pub mod utils;

pub use launch::LaunchOptions;
