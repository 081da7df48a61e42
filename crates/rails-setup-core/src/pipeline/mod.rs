//! The two pipelines: scaffold a new app, configure an existing one
//!
//! Both are fixed sequences of steps. Each step either succeeds and the
//! pipeline moves on, or fails and the whole run stops with that error.

pub mod configure;
pub mod files;
pub mod scaffold;

pub use configure::Configurer;
pub use scaffold::{Scaffolder, BOURBON_COMMIT, INITIAL_COMMIT, RAILS_CONFIG_COMMIT};
