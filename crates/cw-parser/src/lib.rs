//! Source parser and quiz extractor for course modules.
//!
//! [`parse_module`] turns a module's extended-markdown text into a
//! [`Module`](cw_model::Module) tree of raw [`SourceBlock`]s.
//! [`extract_question`] turns a quiz block's source into a validated
//! [`Question`](cw_model::Question).
//!
//! # Example
//!
//! ```
//! use cw_parser::{SourceBlock, extract_question, parse_module};
//!
//! let module = parse_module("# Intro\n## Warm-up\n{{Q: 2+2=? | *4 | 3}}\n", "module1", "")
//!     .unwrap();
//! let (_, block) = module.blocks().next().unwrap();
//! let SourceBlock::Quiz { source, .. } = block else { panic!() };
//! let question = extract_question(source).unwrap();
//! assert_eq!(question.answers.len(), 2);
//! ```

mod fence;
mod quiz;
mod source;

pub use quiz::{QuizError, extract_question};
pub use source::{SourceBlock, StructureError, parse_module};
