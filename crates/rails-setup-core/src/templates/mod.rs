//! Config templates and secret tokens
//!
//! This module provides:
//! - Template seeding (copy a `*.template.yml` to its real file only when absent)
//! - Placeholder substitution with freshly generated secret tokens

pub mod secret;
pub mod seeder;

pub use secret::{generate_secret, SECRET_TOKEN_BYTES};
pub use seeder::{
    discover_templates, render, seed, seed_all, template_target, SeedResult, SeededFile,
    Substitution, SECRET_TOKEN_PLACEHOLDER, TEMPLATE_SUFFIX,
};
