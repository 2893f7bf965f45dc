//! `cw build` command implementation.

use std::path::PathBuf;

use clap::Args;
use cw_archive::{EdxExporter, ImsExporter};
use cw_compiler::{CompileOptions, Compiler};
use cw_config::{CliSettings, Config};
use cw_site::{Repository, SiteBuilder, SiteTemplates};
use cw_video::{VideoResolver, VimeoThumbnails};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct BuildArgs {
    /// Repository holding the moduleN folders (overrides config).
    #[arg(short, long)]
    repository: Option<PathBuf>,

    /// Output directory for the site (overrides config).
    #[arg(short, long)]
    destination: Option<PathBuf>,

    /// Module folders to build (default: all).
    #[arg(short, long, num_args = 1..)]
    pub(crate) modules: Vec<String>,

    /// Base URL for absolute media links (overrides config).
    #[arg(short = 'u', long)]
    base_url: Option<String>,

    /// Show answer feedback in HTML pages.
    #[arg(short, long)]
    feedback: bool,

    /// Also build an IMS Common Cartridge per module.
    #[arg(short, long)]
    ims: bool,

    /// Also build an EDX archive per module.
    #[arg(short, long)]
    edx: bool,

    /// Skip Vimeo thumbnail lookups.
    #[arg(long)]
    no_thumbnails: bool,

    /// Path to configuration file (default: auto-discover courseware.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (show INFO logs).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            repository: self.repository,
            destination: self.destination,
            base_url: self.base_url,
            feedback: self.feedback.then_some(true),
            ims: self.ims.then_some(true),
            edx: self.edx.then_some(true),
            thumbnails: self.no_thumbnails.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let course_config = &config.course_resolved;

        output.info(&format!(
            "Repository: {}",
            course_config.repository.display()
        ));
        output.info(&format!(
            "Destination: {}",
            course_config.destination.display()
        ));

        let repository = Repository::load(&course_config.repository)?.select(&self.modules);
        if repository.modules.is_empty() {
            return Err(CliError::Validation(format!(
                "No module folders found in {}",
                course_config.repository.display()
            )));
        }
        let sources = repository.sources();
        for unreadable in &sources.unreadable {
            output.error(&format!("{}: {}", unreadable.name, unreadable.error));
        }

        let compiler =
            Compiler::new(compile_options(&config)).with_resolver(video_resolver(&config));
        let course = compiler.compile_course(
            &repository.title,
            repository.logo_identity(),
            &sources.modules,
        );

        for compiled in &course.modules {
            output.highlight(&format!("{}: {}", compiled.name, compiled.title));
            for warning in &compiled.warnings {
                output.warning(&format!("  {warning}"));
            }
        }
        for failure in &course.failures {
            output.error(&failure.to_string());
        }

        let builder = SiteBuilder::new(SiteTemplates::new()?);
        builder.build(
            &repository,
            &sources.modules,
            &course,
            &course_config.destination,
        )?;

        let failed = course.failures.len() + sources.unreadable.len();
        if failed > 0 {
            return Err(CliError::ModulesFailed(failed));
        }
        output.success(&format!(
            "Site built successfully to {}",
            course_config.destination.display()
        ));
        Ok(())
    }
}

fn compile_options(config: &Config) -> CompileOptions {
    let mut options = CompileOptions::default()
        .with_base_url(config.course_resolved.base_url.clone())
        .with_feedback(config.course_resolved.feedback);
    if config.archives.ims {
        options = options.with_ims(ImsExporter::new());
    }
    if config.archives.edx {
        options = options.with_edx(
            EdxExporter::new()
                .with_org(config.archives.edx_org.clone())
                .with_run(config.archives.edx_run.clone())
                .with_advanced_modules(config.archives.edx_advanced_modules.clone()),
        );
    }
    options
}

fn video_resolver(config: &Config) -> VideoResolver {
    let video = &config.video;
    let resolver = if video.thumbnails {
        VideoResolver::new(VimeoThumbnails::with_config(
            video.thumbnail_api_url.clone(),
            video.timeout(),
        ))
    } else {
        tracing::info!("Thumbnail lookups disabled");
        VideoResolver::offline()
    };
    resolver.with_default_thumbnail(video.default_thumbnail_url.clone())
}
