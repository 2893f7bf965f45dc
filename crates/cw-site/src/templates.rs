//! Page templates for the course site.

use cw_model::numbering::slugify;
use cw_model::{CourseProgram, Logo, Module};
use minijinja::{Environment, context};

use crate::error::SiteError;

const SITE_LAYOUT: &str = include_str!("../templates/site_layout.html");
const INDEX: &str = include_str!("../templates/index.html");
const MODULE: &str = include_str!("../templates/module.html");
pub(crate) const DEFAULT_HOME: &str = include_str!("../templates/default_home.html");

/// The minijinja environment holding `site_layout.html`, `index.html` and
/// `module.html`.
///
/// Templates see the course as `course` (title, logo, modules). The layout
/// also receives `content`, `body_class` and `logo`.
pub struct SiteTemplates {
    env: Environment<'static>,
}

impl SiteTemplates {
    /// Environment with the built-in templates and the `slugify` filter.
    pub fn new() -> Result<Self, SiteError> {
        let mut env = Environment::new();
        env.add_filter("slugify", slugify);
        env.add_template("site_layout.html", SITE_LAYOUT)?;
        env.add_template("index.html", INDEX)?;
        env.add_template("module.html", MODULE)?;
        Ok(Self { env })
    }

    /// Replace one of the templates.
    pub fn with_template(
        mut self,
        name: &'static str,
        source: &'static str,
    ) -> Result<Self, SiteError> {
        self.env.add_template(name, source)?;
        Ok(self)
    }

    /// Render the home page from already rendered home HTML.
    pub fn render_index(
        &self,
        course: &CourseProgram,
        home_html: &str,
        custom_home: bool,
    ) -> Result<String, SiteError> {
        let content = self.env.get_template("index.html")?.render(context! {
            course,
            home => home_html,
            custom_home,
        })?;
        self.render_layout(course, &content, "home")
    }

    /// Render a module page around the module's compiled HTML.
    pub fn render_module(
        &self,
        course: &CourseProgram,
        module: &Module,
        module_html: &str,
        ims: bool,
        edx: bool,
    ) -> Result<String, SiteError> {
        let content = self.env.get_template("module.html")?.render(context! {
            course,
            module,
            content => module_html,
            ims,
            edx,
        })?;
        self.render_layout(course, &content, "modules")
    }

    fn render_layout(
        &self,
        course: &CourseProgram,
        content: &str,
        body_class: &str,
    ) -> Result<String, SiteError> {
        let logo = match &course.logo {
            Logo::File(name) => name.as_str(),
            Logo::Default => "default",
        };
        let html = self.env.get_template("site_layout.html")?.render(context! {
            course,
            content,
            body_class,
            logo,
        })?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use cw_model::ModuleMeta;

    use super::*;

    fn course() -> CourseProgram {
        let mut course = CourseProgram::new("Digital Culture");
        let mut module = Module::new("module1");
        module.meta = ModuleMeta {
            title: Some("Numbers & Co".to_owned()),
            menu_title: Some("Numbers".to_owned()),
            ..Default::default()
        };
        course.modules.push(module);
        course
    }

    #[test]
    fn test_render_index() {
        let templates = SiteTemplates::new().unwrap();
        let html = templates
            .render_index(&course(), "<p>Hello</p>", true)
            .unwrap();

        assert!(html.contains("<title>Digital Culture</title>"));
        assert!(html.contains(r#"<body class="home">"#));
        assert!(html.contains(r#"id="digital-culture""#));
        assert!(html.contains("<p>Hello</p>"));
        assert!(html.contains(r#"<a href="module1.html">Numbers</a>"#));
        assert!(html.contains("logo-default"));
    }

    #[test]
    fn test_render_module_escapes_meta() {
        let course = course();
        let html = SiteTemplates::new()
            .unwrap()
            .render_module(&course, &course.modules[0], "<div>body</div>", true, false)
            .unwrap();

        assert!(html.contains("<h1>Numbers &amp; Co</h1>"));
        assert!(html.contains("<div>body</div>"));
        assert!(html.contains("module1_imscc.zip"));
        assert!(!html.contains("module1_edx.tar.gz"));
        assert!(html.contains("module1/module1.questions_bank.gift.txt"));
    }

    #[test]
    fn test_logo_file() {
        let mut course = course();
        course.logo = Logo::File("logo.png".to_owned());
        let html = SiteTemplates::new()
            .unwrap()
            .render_index(&course, "", false)
            .unwrap();
        assert!(html.contains(r#"<img src="logo.png""#));
        assert!(html.contains("home-default"));
    }

    #[test]
    fn test_with_template_override() {
        let templates = SiteTemplates::new()
            .unwrap()
            .with_template("index.html", "<p>{{ course.title|slugify }}</p>")
            .unwrap();
        let html = templates.render_index(&course(), "", false).unwrap();
        assert!(html.contains("<p>digital-culture</p>"));
    }
}
