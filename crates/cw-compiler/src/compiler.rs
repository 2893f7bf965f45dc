//! Module and course compilation.

use cw_archive::{ArchiveError, ArchiveOutput};
use cw_export::{HtmlOptions, render_module, to_gift, to_video_list};
use cw_model::numbering::slugify;
use cw_model::{CourseProgram, Logo, MediaSet, Module, Warning};
use cw_parser::parse_module;
use cw_video::VideoResolver;
use rayon::prelude::*;

use crate::error::CompileError;
use crate::extract::extract;
use crate::options::CompileOptions;

/// One module's source as handed over by the caller.
#[derive(Clone, Debug)]
pub struct ModuleSource {
    /// Stable identifier (`module1`).
    pub name: String,
    /// Extended-markdown text.
    pub text: String,
    /// Media blobs referenced as `media/…`.
    pub media: MediaSet,
}

impl ModuleSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            media: MediaSet::new(),
        }
    }

    #[must_use]
    pub fn with_media(mut self, media: MediaSet) -> Self {
        self.media = media;
        self
    }
}

/// Every output of a compiled module.
#[derive(Clone, Debug)]
pub struct CompiledModule {
    pub name: String,
    /// URL-safe form of the title.
    pub slug: String,
    pub title: String,
    /// The resolved document tree.
    pub module: Module,
    pub html: String,
    pub gift: String,
    pub video_list: String,
    /// IMS archive bytes, when requested and packaging succeeded.
    pub ims: Option<Vec<u8>>,
    /// EDX archive bytes, when requested and packaging succeeded.
    pub edx: Option<Vec<u8>>,
    /// Warnings in source order, then archive warnings.
    pub warnings: Vec<Warning>,
}

/// Result of compiling a whole course.
///
/// Modules that fail are reported in `failures`; the others are compiled
/// regardless.
#[derive(Debug)]
pub struct CompiledCourse {
    /// Course title, logo and the module trees, in source order.
    pub program: CourseProgram,
    /// Compiled modules, in the same order as `program.modules`.
    pub modules: Vec<CompiledModule>,
    pub failures: Vec<CompileError>,
}

/// Compiles module sources into HTML, quiz bank, video list and archives.
pub struct Compiler {
    options: CompileOptions,
    resolver: VideoResolver,
}

impl Compiler {
    /// Compiler with an offline video resolver.
    pub fn new(options: CompileOptions) -> Self {
        Self {
            options,
            resolver: VideoResolver::offline(),
        }
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: VideoResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile one module.
    ///
    /// Only a structurally unusable source fails; every other problem is a
    /// warning on the result.
    pub fn compile_module(&self, source: &ModuleSource) -> Result<CompiledModule, CompileError> {
        let parsed = parse_module(&source.text, &source.name, &self.options.base_url)
            .map_err(|e| CompileError::Structure {
                module: source.name.clone(),
                source: e,
            })?;
        tracing::debug!(module = %source.name, sections = parsed.sections.len(), "Parsed module");

        let (mut module, mut warnings) = extract(parsed, &self.resolver);
        for name in source.media.rejected() {
            tracing::warn!(module = %source.name, name = %name, "Unsafe media name rejected");
            warnings.push(
                Warning::resource(format!("media file {name} rejected: path leaves the media folder"))
                    .at(&source.name),
            );
        }
        if let Some(logo) = source.media.logo()
            && let Err(e) = module.assign_logo(format!("media/{logo}"))
        {
            tracing::warn!(module = %source.name, error = %e, "Logo not assigned");
        }
        tracing::debug!(
            module = %source.name,
            questions = module.questions().count(),
            videos = module.videos().count(),
            "Extracted blocks"
        );

        let html = render_module(
            &module,
            &HtmlOptions::default().with_feedback(self.options.feedback),
        );
        let gift = to_gift(&module);
        let video_list = to_video_list(&module);

        let ims = self.options.ims.as_ref().and_then(|exporter| {
            archive_bytes(
                "IMS",
                &module,
                exporter.export(&module, &source.media),
                &mut warnings,
            )
        });
        let edx = self.options.edx.as_ref().and_then(|exporter| {
            archive_bytes(
                "EDX",
                &module,
                exporter.export(&module, &source.media),
                &mut warnings,
            )
        });

        tracing::debug!(module = %source.name, warnings = warnings.len(), "Compiled module");
        Ok(CompiledModule {
            name: module.name.clone(),
            slug: slugify(module.title()),
            title: module.title().to_owned(),
            module,
            html,
            gift,
            video_list,
            ims,
            edx,
            warnings,
        })
    }

    /// Compile every module of a course in parallel.
    ///
    /// Title and logo are fixed before any module is compiled.
    pub fn compile_course(
        &self,
        title: impl Into<String>,
        logo: Logo,
        sources: &[ModuleSource],
    ) -> CompiledCourse {
        let mut program = CourseProgram::new(title);
        program.logo = logo;

        let results: Vec<Result<CompiledModule, CompileError>> = sources
            .par_iter()
            .map(|source| self.compile_module(source))
            .collect();

        let mut modules = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(compiled) => {
                    program.modules.push(compiled.module.clone());
                    modules.push(compiled);
                }
                Err(error) => {
                    tracing::warn!(module = %error.module(), %error, "Module failed to compile");
                    failures.push(error);
                }
            }
        }

        tracing::info!(
            course = %program.title,
            modules = modules.len(),
            failed = failures.len(),
            "Compiled course"
        );
        CompiledCourse {
            program,
            modules,
            failures,
        }
    }
}

/// Keep archive bytes, or record the packaging failure as a warning.
fn archive_bytes(
    archive: &str,
    module: &Module,
    result: Result<ArchiveOutput, ArchiveError>,
    warnings: &mut Vec<Warning>,
) -> Option<Vec<u8>> {
    match result {
        Ok(output) => {
            warnings.extend(output.warnings);
            Some(output.bytes)
        }
        Err(e) => {
            tracing::warn!(module = %module.name, archive, error = %e, "Archive failed");
            warnings.push(
                Warning::resource(format!("{archive} archive failed: {e}")).at(&module.name),
            );
            None
        }
    }
}
