//! Shared types, error model, and configuration for docsteps.
//!
//! This crate is the foundation depended on by all other docsteps crates.
//! It provides:
//! - [`DocStepsError`], the unified error type
//! - Domain types ([`TutorialId`], [`Topic`], [`Meta`], [`Step`], [`NavigationState`])
//! - Configuration ([`AppConfig`], [`RouteConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ContentConfig, RouteConfig, RoutesConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{DocStepsError, Result};
pub use types::{Meta, NavigationState, Step, Topic, TutorialId};
