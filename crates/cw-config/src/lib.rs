//! Configuration management for the courseware compiler.
//!
//! Parses `courseware.toml` with serde and discovers it in the current
//! directory or its parents. CLI settings are applied on top during load via
//! [`CliSettings`].
//!
//! ```toml
//! [course]
//! repository = "."
//! destination = "build"
//! base_url = "http://culturenumerique.univ-lille3.fr"
//! feedback = false
//!
//! [video]
//! thumbnails = true
//! timeout_secs = 5
//!
//! [archives]
//! ims = true
//! edx = true
//! edx_org = "culturenumerique"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `${VAR}` and `${VAR:-default}` are expanded in:
//! - `course.base_url`
//! - `video.thumbnail_api_url`
//! - `video.default_thumbnail_url`
//! - `archives.edx_org`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::expand::EnvExpansion;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "courseware.toml";

const DEFAULT_BASE_URL: &str = "http://culturenumerique.univ-lille3.fr";
const DEFAULT_THUMBNAIL_API_URL: &str = "https://vimeo.com/api/v2/video/";
const DEFAULT_THUMBNAIL_URL: &str = "https://i.vimeocdn.com/video/536038298_640.jpg";

/// CLI settings that override configuration file values.
///
/// Only `Some` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub repository: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub base_url: Option<String>,
    pub feedback: Option<bool>,
    pub ims: Option<bool>,
    pub edx: Option<bool>,
    pub thumbnails: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Course paths and rendering options as written in TOML.
    course: CourseConfigRaw,
    pub video: VideoConfig,
    pub archives: ArchivesConfig,

    /// Resolved course configuration (set after loading).
    #[serde(skip)]
    pub course_resolved: CourseConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CourseConfigRaw {
    repository: Option<String>,
    destination: Option<String>,
    base_url: Option<String>,
    feedback: Option<bool>,
}

/// Resolved course configuration with absolute paths.
#[derive(Debug, Default)]
pub struct CourseConfig {
    /// Directory holding `moduleN/` folders, `title.md`, `home.md` and the logo.
    pub repository: PathBuf,
    /// Site output directory.
    pub destination: PathBuf,
    /// Base URL media references are absolutized against; empty keeps them
    /// relative.
    pub base_url: String,
    /// Include quiz feedback in HTML pages.
    pub feedback: bool,
}

/// Video resolution configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Look Vimeo thumbnails up over HTTP.
    pub thumbnails: bool,
    pub thumbnail_api_url: String,
    pub default_thumbnail_url: String,
    /// Thumbnail request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            thumbnails: true,
            thumbnail_api_url: DEFAULT_THUMBNAIL_API_URL.to_owned(),
            default_thumbnail_url: DEFAULT_THUMBNAIL_URL.to_owned(),
            timeout_secs: 5,
        }
    }
}

impl VideoConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Archive export configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ArchivesConfig {
    /// Build an IMS Common Cartridge per module.
    pub ims: bool,
    /// Build an EDX tarball per module.
    pub edx: bool,
    pub edx_org: String,
    pub edx_run: String,
    pub edx_advanced_modules: Vec<String>,
}

impl Default for ArchivesConfig {
    fn default() -> Self {
        Self {
            ims: false,
            edx: false,
            edx_org: "culturenumerique".to_owned(),
            edx_run: "course".to_owned(),
            edx_advanced_modules: vec!["cnvideo".to_owned(), "library_content".to_owned()],
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`course.base_url`").
        field: String,
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration with optional CLI settings.
    ///
    /// Loads `config_path` when given, otherwise the first `courseware.toml`
    /// found in the current directory or its parents, otherwise defaults
    /// relative to the current directory. CLI settings win over file values.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(repository) = &settings.repository {
            self.course_resolved.repository.clone_from(repository);
        }
        if let Some(destination) = &settings.destination {
            self.course_resolved.destination.clone_from(destination);
        }
        if let Some(base_url) = &settings.base_url {
            self.course_resolved.base_url.clone_from(base_url);
        }
        if let Some(feedback) = settings.feedback {
            self.course_resolved.feedback = feedback;
        }
        if let Some(ims) = settings.ims {
            self.archives.ims = ims;
        }
        if let Some(edx) = settings.edx {
            self.archives.edx = edx;
        }
        if let Some(thumbnails) = settings.thumbnails {
            self.video.thumbnails = thumbnails;
        }
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            course: CourseConfigRaw::default(),
            video: VideoConfig::default(),
            archives: ArchivesConfig::default(),
            course_resolved: CourseConfig {
                repository: base.to_path_buf(),
                destination: base.join("build"),
                base_url: DEFAULT_BASE_URL.to_owned(),
                feedback: false,
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values. Called automatically after loading
    /// from file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = &self.course_resolved.base_url;
        if !base_url.is_empty() {
            require_http_url(base_url, "course.base_url")?;
        }

        require_http_url(&self.video.thumbnail_api_url, "video.thumbnail_api_url")?;
        require_non_empty(&self.video.default_thumbnail_url, "video.default_thumbnail_url")?;
        if self.video.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "video.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        require_non_empty(&self.archives.edx_org, "archives.edx_org")?;
        require_non_empty(&self.archives.edx_run, "archives.edx_run")?;
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let mut expansion = EnvExpansion::new();
        if let Some(url) = self.course.base_url.as_mut() {
            expansion.field("course.base_url", url);
        }
        expansion.field("video.thumbnail_api_url", &mut self.video.thumbnail_api_url);
        expansion.field(
            "video.default_thumbnail_url",
            &mut self.video.default_thumbnail_url,
        );
        expansion.field("archives.edx_org", &mut self.archives.edx_org);
        expansion.finish()
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.course_resolved = CourseConfig {
            repository: resolve(self.course.repository.as_deref(), "."),
            destination: resolve(self.course.destination.as_deref(), "build"),
            base_url: self
                .course
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            feedback: self.course.feedback.unwrap_or(false),
        };
    }
}
