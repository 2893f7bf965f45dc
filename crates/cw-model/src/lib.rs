//! Shared document model for the courseware compiler.
//!
//! A module's source text is parsed once into a [`Module`] tree
//! (Module → [`Section`] → [`Subsection`] → [`ContentBlock`]) that every
//! exporter reads without mutating.
//!
//! # Architecture
//!
//! - [`document`]: the tree itself, generic over its block type so that the
//!   parser can build a tree of raw source blocks which the extraction pass
//!   later maps into resolved [`ContentBlock`]s
//! - [`question`]: quiz questions and their invariants
//! - [`video`]: resolved video references
//! - [`numbering`]: position tags, anchors and quiz-bank categories
//! - [`diagnostics`]: non-fatal warnings returned next to compiled output
//! - [`media`]: named media blobs supplied by the caller
//!
//! # Example
//!
//! ```
//! use cw_model::{ContentBlock, Module, Section, Subsection};
//!
//! let mut module: Module = Module::new("module1");
//! let mut section = Section::new("1", "Introduction");
//! let mut subsection = Subsection::new("1.1", "Welcome");
//! subsection.blocks.push(ContentBlock::Prose("Hello".to_owned()));
//! section.subsections.push(subsection);
//! module.sections.push(section);
//!
//! assert_eq!(module.subsections().count(), 1);
//! assert_eq!(module.title(), "module1");
//! ```

pub mod diagnostics;
pub mod document;
pub mod media;
pub mod numbering;
pub mod question;
pub mod video;

pub use diagnostics::{Warning, WarningKind};
pub use document::{
    ActivityKind, ContentBlock, CourseProgram, Logo, LogoAlreadyAssigned, Module, ModuleMeta,
    Section, Subsection,
};
pub use media::MediaSet;
pub use question::{Answer, Question, QuestionError, QuestionKind};
pub use video::{Provider, VideoReference};
