//! Courseware compile pipeline.
//!
//! A module compile runs parse → extract → resolve → export:
//!
//! 1. [`cw_parser::parse_module`] builds a tree of raw source blocks
//! 2. the extraction pass turns quiz blocks into questions and video lines
//!    into resolved references, recording warnings for what it drops
//! 3. the exporters render HTML, the quiz bank, the video list and, when
//!    requested, the IMS and EDX archives
//!
//! [`Compiler::compile_course`] compiles independent modules in parallel.
//!
//! # Example
//!
//! ```
//! use cw_compiler::{CompileOptions, Compiler, ModuleSource};
//!
//! let compiler = Compiler::new(CompileOptions::default());
//! let compiled = compiler
//!     .compile_module(&ModuleSource::new("module1", "# Intro\n## Quiz\n{{Q: 2+2=? | *4 | 3}}\n"))
//!     .unwrap();
//! assert!(compiled.gift.contains("2+2\\=?"));
//! assert!(compiled.warnings.is_empty());
//! ```

mod compiler;
mod error;
mod extract;
mod options;

pub use compiler::{CompiledCourse, CompiledModule, Compiler, ModuleSource};
pub use error::CompileError;
pub use options::CompileOptions;
