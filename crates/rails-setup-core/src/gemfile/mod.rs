//! Gemfile editing and gem version resolution

pub mod editor;
pub mod version;

pub use editor::{declaration, insert_declaration, GemfileEditor};
pub use version::{highest_version, listed_versions, parse_version, resolve_version};
