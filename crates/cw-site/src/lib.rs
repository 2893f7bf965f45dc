//! Course repository loading and static site assembly.
//!
//! [`Repository::load`] discovers the `moduleN/` folders of a course
//! repository together with its title, home page and logo.
//! [`SiteBuilder::build`] writes a compiled course as a static site: one
//! page per module, the quiz bank and video list next to it, media, and the
//! IMS/EDX archives when they were built.

mod builder;
mod error;
mod repository;
mod templates;

pub use builder::SiteBuilder;
pub use error::SiteError;
pub use repository::{DEFAULT_TITLE, ModuleFolder, Repository, Sources, UnreadableModule};
pub use templates::SiteTemplates;
