//! CLI command implementations.
//!
//! Each submodule handles one command with its configuration and execution
//! logic:
//! - **build**: run the full pipeline from a study request JSON to rendered
//!   documents on disk
//! - **formats**: list the rendering backends this binary carries

pub mod build;
pub mod formats;

pub use build::{build_documents, BuildConfig};
pub use formats::list_formats;
