//! Course repository discovery.
//!
//! A repository is a directory holding `moduleN/` folders plus optional
//! `title.md`, `home.md` and `logo.*` files:
//!
//! ```text
//! course/
//! ├── title.md
//! ├── home.md
//! ├── logo.png
//! ├── module1/
//! │   ├── intro.md
//! │   └── media/
//! │       └── chart.png
//! └── module2/
//!     └── basics.md
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use cw_compiler::ModuleSource;
use cw_model::{Logo, MediaSet};
use glob::Pattern;

use crate::error::SiteError;

/// Course title used when `title.md` is missing or empty.
pub const DEFAULT_TITLE: &str = "Course";

/// One `moduleN/` folder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleFolder {
    /// Folder name (`module3`), used as the module identifier.
    pub name: String,
    pub number: u32,
    pub dir: PathBuf,
    /// First markdown file of the folder in name order.
    pub markdown: PathBuf,
}

/// A course repository on disk.
#[derive(Clone, Debug)]
pub struct Repository {
    pub root: PathBuf,
    pub title: String,
    /// Raw markdown of `home.md`.
    pub home: Option<String>,
    pub logo: Option<PathBuf>,
    /// Module folders in numeric order.
    pub modules: Vec<ModuleFolder>,
}

impl Repository {
    /// Scan `root` for module folders and course-level files.
    ///
    /// Module folders without a markdown file are skipped. Missing title,
    /// home page or logo fall back to defaults.
    pub fn load(root: &Path) -> Result<Self, SiteError> {
        if !root.is_dir() {
            return Err(SiteError::RepositoryNotFound(root.to_path_buf()));
        }

        let mut modules = Vec::new();
        for dir in glob_in(root, "module*")? {
            if !dir.is_dir() {
                continue;
            }
            let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(number) = module_number(name) else {
                continue;
            };
            let Some(markdown) = glob_in(&dir, "*.md")?.into_iter().find(|p| p.is_file()) else {
                tracing::warn!(module = %name, "No markdown file in module folder, skipping");
                continue;
            };
            modules.push(ModuleFolder {
                name: name.to_owned(),
                number,
                dir,
                markdown,
            });
        }
        modules.sort_by_key(|m| m.number);

        let title = read_optional(&root.join("title.md"))
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_owned());
        let home = read_optional(&root.join("home.md"));
        let logo = glob_in(root, "logo.*")?.into_iter().find(|p| p.is_file());

        tracing::debug!(
            root = %root.display(),
            modules = modules.len(),
            logo = logo.is_some(),
            "Loaded repository"
        );

        Ok(Self {
            root: root.to_path_buf(),
            title,
            home,
            logo,
            modules,
        })
    }

    /// Keep only the named modules. An empty selection keeps every module.
    #[must_use]
    pub fn select(mut self, names: &[String]) -> Self {
        if !names.is_empty() {
            for name in names {
                if !self.modules.iter().any(|m| &m.name == name) {
                    tracing::warn!(module = %name, "Selected module not found in repository");
                }
            }
            self.modules.retain(|m| names.contains(&m.name));
        }
        self
    }

    /// Logo identity for site templates: the logo's file name, or the
    /// default sentinel.
    pub fn logo_identity(&self) -> Logo {
        self.logo
            .as_ref()
            .and_then(|path| path.file_name())
            .map_or(Logo::Default, |name| {
                Logo::File(name.to_string_lossy().into_owned())
            })
    }

    /// Read every module's markdown and media.
    ///
    /// A folder that cannot be read (I/O error, markdown that is not UTF-8)
    /// lands in [`Sources::unreadable`] without stopping the others.
    pub fn sources(&self) -> Sources {
        let mut sources = Sources::default();
        for folder in &self.modules {
            match read_module(folder) {
                Ok(source) => sources.modules.push(source),
                Err(error) => {
                    tracing::warn!(
                        module = %folder.name,
                        error = %error,
                        "Module folder unreadable, skipping"
                    );
                    sources.unreadable.push(UnreadableModule {
                        name: folder.name.clone(),
                        error,
                    });
                }
            }
        }
        sources
    }
}

/// Module sources in repository order.
#[derive(Debug, Default)]
pub struct Sources {
    pub modules: Vec<ModuleSource>,
    pub unreadable: Vec<UnreadableModule>,
}

/// A module folder whose files could not be read.
#[derive(Debug)]
pub struct UnreadableModule {
    pub name: String,
    pub error: SiteError,
}

fn read_module(folder: &ModuleFolder) -> Result<ModuleSource, SiteError> {
    let bytes = fs::read(&folder.markdown)?;
    let text =
        String::from_utf8(bytes).map_err(|_| SiteError::NotUtf8(folder.markdown.clone()))?;
    let media = load_media(&folder.dir.join("media"))?;
    Ok(ModuleSource::new(&folder.name, text).with_media(media))
}

/// `module12` → 12. Zero and non-numeric suffixes are not modules.
fn module_number(name: &str) -> Option<u32> {
    name.strip_prefix("module")?
        .parse()
        .ok()
        .filter(|n| *n > 0)
}

/// Entries of `dir` matching `pattern`, in path order.
fn glob_in(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, SiteError> {
    let full = format!("{}/{pattern}", Pattern::escape(&dir.to_string_lossy()));
    let paths = glob::glob(&full)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable path skipped");
                None
            }
        })
        .collect();
    Ok(paths)
}

fn load_media(media_dir: &Path) -> Result<MediaSet, SiteError> {
    let mut media = MediaSet::new();
    if !media_dir.is_dir() {
        return Ok(media);
    }
    for path in glob_in(media_dir, "**/*")? {
        if !path.is_file() {
            continue;
        }
        let Ok(relative) = path.strip_prefix(media_dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        media.insert(&name, fs::read(&path)?);
    }
    Ok(media)
}

fn read_optional(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read course file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write(root: &Path, path: &str, content: &[u8]) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_module_number() {
        assert_eq!(module_number("module1"), Some(1));
        assert_eq!(module_number("module12"), Some(12));
        assert_eq!(module_number("module0"), None);
        assert_eq!(module_number("modules"), None);
        assert_eq!(module_number("other3"), None);
    }

    #[test]
    fn test_load_orders_modules_numerically() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "module10/b.md", b"# Ten");
        write(dir.path(), "module2/a.md", b"# Two");
        write(dir.path(), "module1/z.md", b"# One");
        write(dir.path(), "module1/a.md", b"# One first");
        write(dir.path(), "module3/notes.txt", b"no markdown");

        let repo = Repository::load(dir.path()).unwrap();
        let names: Vec<_> = repo.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["module1", "module2", "module10"]);
        assert_eq!(repo.modules[0].markdown, dir.path().join("module1/a.md"));
    }

    #[test]
    fn test_load_course_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "title.md", b"  My Course\n");
        write(dir.path(), "home.md", b"Welcome!");
        write(dir.path(), "logo.svg", b"<svg/>");

        let repo = Repository::load(dir.path()).unwrap();
        assert_eq!(repo.title, "My Course");
        assert_eq!(repo.home.as_deref(), Some("Welcome!"));
        assert_eq!(repo.logo_identity(), Logo::File("logo.svg".to_owned()));
    }

    #[test]
    fn test_load_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::load(dir.path()).unwrap();
        assert_eq!(repo.title, DEFAULT_TITLE);
        assert!(repo.home.is_none());
        assert_eq!(repo.logo_identity(), Logo::Default);
        assert!(repo.modules.is_empty());
    }

    #[test]
    fn test_missing_repository() {
        let result = Repository::load(Path::new("/nonexistent/course"));
        assert!(matches!(result, Err(SiteError::RepositoryNotFound(_))));
    }

    #[test]
    fn test_select() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "module1/a.md", b"# One");
        write(dir.path(), "module2/a.md", b"# Two");

        let repo = Repository::load(dir.path())
            .unwrap()
            .select(&["module2".to_owned(), "module9".to_owned()]);
        let names: Vec<_> = repo.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["module2"]);
    }

    #[test]
    fn test_sources_read_nested_media() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "module1/a.md", b"# One\ntext\n");
        write(dir.path(), "module1/media/chart.png", &[1, 2]);
        write(dir.path(), "module1/media/img/photo.jpg", &[3]);

        let sources = Repository::load(dir.path()).unwrap().sources().modules;
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name, "module1");
        assert_eq!(sources[0].text, "# One\ntext\n");
        let names: Vec<_> = sources[0].media.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["chart.png", "img/photo.jpg"]);
    }

    #[test]
    fn test_sources_skip_non_utf8_module() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "module1/a.md", b"# One\ntext\n");
        write(dir.path(), "module2/a.md", &[0xff, 0xfe, b'#']);
        write(dir.path(), "module3/a.md", b"# Three\ntext\n");

        let sources = Repository::load(dir.path()).unwrap().sources();
        let names: Vec<_> = sources.modules.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["module1", "module3"]);
        assert_eq!(sources.unreadable.len(), 1);
        assert_eq!(sources.unreadable[0].name, "module2");
        assert!(matches!(sources.unreadable[0].error, SiteError::NotUtf8(_)));
    }
}
