//! `docex_core` is the core library for [docex](https://github.com/ifiokjr/docex). It turns the
//! fenced code blocks under an `## Example` heading in markdown documentation into standalone
//! source files, so every documented example is compiled and tested as part of a build.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Markdown document
//!   → Scanner (single pass, yields headings, paragraphs and code blocks)
//!   → Extractor (keeps code blocks of one language inside the example section)
//!   → Materializer (names the output, adds a provenance header, applies wrappers)
//!   → Writer / checker (writes changed files or reports stale ones)
//!   → Autogen (lists documents with examples inside a build file region)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `docex.toml`.
//! - [`project`]: Discovery of markdown documents below a directory.
//! - [`autogen`]: Regeneration of the marked region of a build file.
//!
//! ## Key Types
//!
//! - [`Element`]: A heading, paragraph or code block produced by [`scan`].
//! - [`ExampleExtractor`]: Selects the example code blocks of a document.
//! - [`Materializer`]: Plans the generated files for documents.
//! - [`DocexConfig`]: Configuration loaded from `docex.toml`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docex_core::DocexConfig;
//! use docex_core::Materializer;
//! use docex_core::project::ScanOptions;
//! use docex_core::write_generated;
//! use std::path::Path;
//!
//! let config = DocexConfig::load_or_default(Path::new(".")).unwrap();
//! let options = ScanOptions::from_config(&config).unwrap();
//! let materializer = Materializer::from_config(&config);
//!
//! let files = materializer
//! 	.plan_directory(Path::new("docs"), Path::new("build/examples"), &options)
//! 	.unwrap();
//! write_generated(&files).unwrap();
//! ```

pub use config::*;
pub use error::*;
pub use extractor::*;
pub use materialize::*;
pub use scanner::*;

pub mod autogen;
pub mod config;
#[allow(unused_assignments)]
mod error;
mod extractor;
mod materialize;
pub mod project;
mod scanner;
