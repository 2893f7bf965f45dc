//! Static site writer.

use std::fs;
use std::path::Path;

use cw_compiler::{CompiledCourse, CompiledModule, ModuleSource};
use cw_renderer::{HtmlBackend, MarkdownRenderer};

use crate::error::SiteError;
use crate::repository::Repository;
use crate::templates::{DEFAULT_HOME, SiteTemplates};

/// Writes a compiled course as a static site.
///
/// Output layout:
///
/// ```text
/// build/
/// ├── index.html
/// ├── logo.png
/// ├── module1.html
/// ├── module1_imscc.zip
/// ├── module1_edx.tar.gz
/// └── module1/
///     ├── module1.questions_bank.gift.txt
///     ├── module1.video_iframe_list.txt
///     └── media/
/// ```
pub struct SiteBuilder {
    templates: SiteTemplates,
}

impl SiteBuilder {
    pub fn new(templates: SiteTemplates) -> Self {
        Self { templates }
    }

    /// Write the site into `destination`, replacing whatever it held.
    ///
    /// `sources` supply the media copied next to each module page.
    pub fn build(
        &self,
        repository: &Repository,
        sources: &[ModuleSource],
        course: &CompiledCourse,
        destination: &Path,
    ) -> Result<(), SiteError> {
        check_destination(&repository.root, destination)?;
        if destination.exists() {
            fs::remove_dir_all(destination)?;
        }
        fs::create_dir_all(destination)?;

        if let Some(logo) = &repository.logo
            && let Some(name) = logo.file_name()
            && let Err(e) = fs::copy(logo, destination.join(name))
        {
            tracing::warn!(logo = %logo.display(), error = %e, "Failed to copy logo");
        }

        let (home_html, custom_home) = match &repository.home {
            Some(markdown) => (
                MarkdownRenderer::<HtmlBackend>::new().render_markdown(markdown),
                true,
            ),
            None => (DEFAULT_HOME.to_owned(), false),
        };
        let index = self
            .templates
            .render_index(&course.program, &home_html, custom_home)?;
        fs::write(destination.join("index.html"), index)?;

        for compiled in &course.modules {
            let source = sources.iter().find(|s| s.name == compiled.name);
            self.write_module(course, compiled, source, destination)?;
        }

        tracing::info!(
            destination = %destination.display(),
            modules = course.modules.len(),
            "Site built"
        );
        Ok(())
    }

    fn write_module(
        &self,
        course: &CompiledCourse,
        compiled: &CompiledModule,
        source: Option<&ModuleSource>,
        destination: &Path,
    ) -> Result<(), SiteError> {
        let name = &compiled.name;
        let page = self.templates.render_module(
            &course.program,
            &compiled.module,
            &compiled.html,
            compiled.ims.is_some(),
            compiled.edx.is_some(),
        )?;
        fs::write(destination.join(format!("{name}.html")), page)?;

        let module_dir = destination.join(name);
        fs::create_dir_all(&module_dir)?;
        fs::write(
            module_dir.join(format!("{name}.questions_bank.gift.txt")),
            &compiled.gift,
        )?;
        fs::write(
            module_dir.join(format!("{name}.video_iframe_list.txt")),
            &compiled.video_list,
        )?;

        if let Some(source) = source {
            for (file, bytes) in source.media.iter() {
                let path = module_dir.join("media").join(file);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, bytes)?;
            }
        }

        if let Some(ims) = &compiled.ims {
            fs::write(destination.join(format!("{name}_imscc.zip")), ims)?;
        }
        if let Some(edx) = &compiled.edx {
            fs::write(destination.join(format!("{name}_edx.tar.gz")), edx)?;
        }

        tracing::debug!(module = %name, "Module written");
        Ok(())
    }
}

/// Refuse destinations whose removal would delete the repository.
fn check_destination(repository: &Path, destination: &Path) -> Result<(), SiteError> {
    let Ok(destination) = destination.canonicalize() else {
        // Does not exist yet, so it cannot contain the repository.
        return Ok(());
    };
    let repository = repository.canonicalize()?;
    if repository.starts_with(&destination) {
        return Err(SiteError::DestinationIsRepository(destination));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_inside_repository_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let build = dir.path().join("build");
        fs::create_dir(&build).unwrap();
        assert!(check_destination(dir.path(), &build).is_ok());
    }

    #[test]
    fn test_destination_is_repository_refused() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_destination(dir.path(), dir.path());
        assert!(matches!(result, Err(SiteError::DestinationIsRepository(_))));
    }

    #[test]
    fn test_destination_above_repository_refused() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("course");
        fs::create_dir(&repo).unwrap();
        let result = check_destination(&repo, dir.path());
        assert!(matches!(result, Err(SiteError::DestinationIsRepository(_))));
    }

    #[test]
    fn test_missing_destination_allowed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_destination(dir.path(), &dir.path().join("out")).is_ok());
    }
}
