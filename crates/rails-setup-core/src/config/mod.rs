//! Run configuration
//!
//! Everything a pipeline needs is passed in explicitly: the toolchain of
//! external programs and the per-run options.

pub mod options;
pub mod toolchain;

pub use options::{
    AppName, ConfigureOptions, ScaffoldOptions, DEFAULT_GEM_ANCHOR, NORMALIZE_CSS_URL,
    NORMALIZE_URL_ENV,
};
pub use toolchain::Toolchain;
