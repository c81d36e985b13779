// src/models/mod.rs

//! Domain models for the asset hunter.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod asset;
mod company;
mod config;
mod progress;

// Re-export all public types
pub use asset::{Asset, QueryResult};
pub use company::Company;
pub use config::{
    API_KEY_ENV, Config, FilterConfig, HunterConfig, NamesConfig, PathsConfig, QueryConfig,
    ThrottleConfig,
};
pub use progress::RunProgress;
