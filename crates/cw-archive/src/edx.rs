//! Open edX OLX exporter.
//!
//! Sections map to chapters, subsections to sequentials holding a single
//! vertical, and each item to an `html`, `problem` or `video` component.
//! Graded activities set the sequential's assignment format; the grading
//! policy lists one assignment type per activity kind present.
//!
//! Every entry of the tarball lives under `course/`.

use cw_model::numbering::{category, slugify};
use cw_model::{
    ActivityKind, Answer, MediaSet, Module, Question, QuestionKind, Section, Subsection,
    VideoReference, Warning,
};
use cw_renderer::{HtmlBackend, MarkdownRenderer, XhtmlBackend};
use serde_json::json;

use crate::boilerplate::Boilerplate;
use crate::error::ArchiveError;
use crate::items::{Item, items};
use crate::package::{Package, TarGzPackage};
use crate::xml::XmlDoc;
use crate::{ArchiveOutput, DEFAULT_LANGUAGE, check_question};

const ROOT: &str = "course";
const STATIC_BASE: &str = "/static/";

/// Advanced modules enabled in the course policy by default.
pub const DEFAULT_ADVANCED_MODULES: &[&str] = &["cnvideo", "library_content"];

/// Assignment type of a graded activity; web content is not graded.
fn grader(activity: ActivityKind) -> Option<(&'static str, &'static str)> {
    match activity {
        ActivityKind::WebContent => None,
        ActivityKind::Comprehension => Some(("Comprehension", "C")),
        ActivityKind::Activity => Some(("Activite", "A")),
        ActivityKind::AdvancedActivity => Some(("Activite Avancee", "AA")),
    }
}

/// Builds OLX course tarballs.
#[derive(Clone, Debug)]
pub struct EdxExporter {
    org: String,
    run: String,
    advanced_modules: Vec<String>,
    boilerplate: Boilerplate,
    language: Option<String>,
}

impl Default for EdxExporter {
    fn default() -> Self {
        Self {
            org: "cw".to_owned(),
            run: "course".to_owned(),
            advanced_modules: DEFAULT_ADVANCED_MODULES
                .iter()
                .map(|m| (*m).to_owned())
                .collect(),
            boilerplate: Boilerplate::default(),
            language: None,
        }
    }
}

impl EdxExporter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = org.into();
        self
    }

    /// Course run name, used as the course `url_name`.
    #[must_use]
    pub fn with_run(mut self, run: impl Into<String>) -> Self {
        self.run = run.into();
        self
    }

    #[must_use]
    pub fn with_advanced_modules(mut self, modules: Vec<String>) -> Self {
        self.advanced_modules = modules;
        self
    }

    #[must_use]
    pub fn with_boilerplate(mut self, boilerplate: Boilerplate) -> Self {
        self.boilerplate = boilerplate;
        self
    }

    /// Course language when the module does not declare one.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Export one module with its media.
    pub fn export(&self, module: &Module, media: &MediaSet) -> Result<ArchiveOutput, ArchiveError> {
        let mut package = TarGzPackage::new(ROOT);
        let mut warnings = Vec::new();
        let language = module
            .meta
            .language
            .as_deref()
            .or(self.language.as_deref())
            .unwrap_or(DEFAULT_LANGUAGE);

        let mut doc = XmlDoc::bare();
        doc.empty(
            "course",
            &[
                ("url_name", self.run.as_str()),
                ("org", self.org.as_str()),
                ("course", slugify(&module.name).as_str()),
            ],
        )?;
        package.add_file("course.xml", &doc.finish())?;

        let mut doc = XmlDoc::bare();
        doc.start(
            "course",
            &[("display_name", module.title()), ("language", language)],
        )?;
        for section in &module.sections {
            doc.empty("chapter", &[("url_name", section.anchor().as_str())])?;
        }
        doc.end("course")?;
        package.add_file(&format!("course/{}.xml", self.run), &doc.finish())?;

        for section in &module.sections {
            export_section(module, section, &mut package, &mut warnings)?;
        }

        let policy = json!({
            format!("course/{}", self.run): {
                "display_name": module.title(),
                "language": language,
                "advanced_modules": self.advanced_modules,
            }
        });
        package.add_file(
            &format!("policies/{}/policy.json", self.run),
            &serde_json::to_vec_pretty(&policy)?,
        )?;
        package.add_file(
            &format!("policies/{}/grading_policy.json", self.run),
            &serde_json::to_vec_pretty(&grading_policy(module))?,
        )?;

        for (name, bytes) in media.iter() {
            package.add_file(&format!("static/{name}"), bytes)?;
        }
        for (path, bytes) in self.boilerplate.iter() {
            package.add_file(path, bytes)?;
        }

        tracing::debug!(
            module = %module.name,
            run = %self.run,
            warnings = warnings.len(),
            "Built EDX archive"
        );
        Ok(ArchiveOutput {
            bytes: package.finish()?,
            warnings,
        })
    }
}

fn export_section(
    module: &Module,
    section: &Section,
    package: &mut TarGzPackage,
    warnings: &mut Vec<Warning>,
) -> Result<(), ArchiveError> {
    let heading = section.heading();
    let mut doc = XmlDoc::bare();
    doc.start(
        "chapter",
        &[("display_name", display_name_for(&section.title, &heading, module))],
    )?;
    for subsection in &section.subsections {
        doc.empty("sequential", &[("url_name", subsection.anchor().as_str())])?;
        export_subsection(module, subsection, package, warnings)?;
    }
    doc.end("chapter")?;
    package.add_file(&format!("chapter/{}.xml", section.anchor()), &doc.finish())
}

/// Numbered heading, or the module title for an implicit node.
fn display_name_for<'a>(title: &str, heading: &'a str, module: &'a Module) -> &'a str {
    if title.is_empty() {
        module.title()
    } else {
        heading
    }
}

fn export_subsection(
    module: &Module,
    subsection: &Subsection,
    package: &mut TarGzPackage,
    warnings: &mut Vec<Warning>,
) -> Result<(), ArchiveError> {
    let anchor = subsection.anchor();
    let heading = subsection.heading();
    let title = display_name_for(&subsection.title, &heading, module);
    let vertical = format!("{anchor}_vert");

    let mut doc = XmlDoc::bare();
    let mut attrs = vec![("display_name", title)];
    if let Some((format, _)) = grader(subsection.activity) {
        attrs.push(("format", format));
        attrs.push(("graded", "true"));
    }
    doc.start("sequential", &attrs)?;
    doc.empty("vertical", &[("url_name", vertical.as_str())])?;
    doc.end("sequential")?;
    package.add_file(&format!("sequential/{anchor}.xml"), &doc.finish())?;

    let mut doc = XmlDoc::bare();
    doc.start("vertical", &[("display_name", title)])?;
    for item in items(subsection) {
        let component = match &item {
            Item::Page { id, markdown } => {
                let html = MarkdownRenderer::<HtmlBackend>::new()
                    .with_media_base(STATIC_BASE)
                    .render_markdown(markdown);
                package.add_file(&format!("html/{id}.html"), html.as_bytes())?;
                let mut component = XmlDoc::bare();
                component.empty(
                    "html",
                    &[("filename", id.as_str()), ("display_name", title)],
                )?;
                package.add_file(&format!("html/{id}.xml"), &component.finish())?;
                "html"
            }
            Item::Question {
                id,
                label,
                question,
            } => {
                if let Err(reason) = check_question(question) {
                    tracing::warn!(
                        module = %module.name,
                        item = %id,
                        %reason,
                        "Skipping question in EDX archive"
                    );
                    warnings.push(
                        Warning::content(format!(
                            "question {id} skipped in EDX archive: {reason}"
                        ))
                        .at(category(&module.name, &subsection.num)),
                    );
                    continue;
                }
                package.add_file(&format!("problem/{id}.xml"), &problem(label, question)?)?;
                "problem"
            }
            Item::Video { id, video } => {
                package.add_file(&format!("video/{id}.xml"), &video_component(video)?)?;
                "video"
            }
        };
        doc.empty(component, &[("url_name", item.id())])?;
    }
    doc.end("vertical")?;
    package.add_file(&format!("vertical/{vertical}.xml"), &doc.finish())
}

fn grading_policy(module: &Module) -> serde_json::Value {
    let kinds = [
        ActivityKind::Comprehension,
        ActivityKind::Activity,
        ActivityKind::AdvancedActivity,
    ];
    let counts: Vec<(ActivityKind, usize)> = kinds
        .into_iter()
        .map(|kind| {
            let count = module
                .subsections()
                .filter(|sub| sub.activity == kind)
                .count();
            (kind, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let weight = if counts.is_empty() {
        0.0
    } else {
        1.0 / counts.len() as f64
    };
    let graders: Vec<serde_json::Value> = counts
        .iter()
        .filter_map(|(kind, count)| {
            grader(*kind).map(|(name, short_label)| {
                json!({
                    "type": name,
                    "short_label": short_label,
                    "min_count": count,
                    "drop_count": 0,
                    "weight": weight,
                })
            })
        })
        .collect();

    json!({
        "GRADER": graders,
        "GRADE_CUTOFFS": { "Pass": 0.5 },
    })
}

fn choice(
    doc: &mut XmlDoc,
    answer: &Answer,
    hint_attrs: &[(&str, &str)],
) -> Result<(), ArchiveError> {
    let correct = if answer.correct { "true" } else { "false" };
    doc.start("choice", &[("correct", correct)])?;
    doc.text(&answer.text)?;
    if let Some(feedback) = &answer.feedback {
        doc.element("choicehint", hint_attrs, feedback)?;
    }
    doc.end("choice")
}

/// Problem component. The prompt is rendered as XHTML so it can sit inside
/// the response element.
fn problem(label: &str, question: &Question) -> Result<Vec<u8>, ArchiveError> {
    let prompt = MarkdownRenderer::<XhtmlBackend>::new()
        .with_media_base(STATIC_BASE)
        .render_markdown(&question.prompt);

    let mut doc = XmlDoc::bare();
    doc.start("problem", &[("display_name", label), ("max_attempts", "1")])?;
    match question.kind {
        QuestionKind::SingleChoice | QuestionKind::TrueFalse => {
            doc.start("multiplechoiceresponse", &[])?;
            doc.markup(&prompt)?;
            doc.start("choicegroup", &[("type", "MultipleChoice")])?;
            for answer in &question.answers {
                choice(&mut doc, answer, &[])?;
            }
            doc.end("choicegroup")?;
            doc.end("multiplechoiceresponse")?;
        }
        QuestionKind::MultipleChoice => {
            doc.start("choiceresponse", &[])?;
            doc.markup(&prompt)?;
            doc.start("checkboxgroup", &[])?;
            for answer in &question.answers {
                choice(&mut doc, answer, &[("selected", "true")])?;
            }
            doc.end("checkboxgroup")?;
            doc.end("choiceresponse")?;
        }
        QuestionKind::ShortAnswer => {
            // validated: at least one answer
            let (first, rest) = question
                .answers
                .split_first()
                .ok_or_else(|| std::io::Error::other("short answer without answers"))?;
            doc.start(
                "stringresponse",
                &[("answer", first.text.as_str()), ("type", "ci")],
            )?;
            doc.markup(&prompt)?;
            for answer in rest {
                doc.empty("additional_answer", &[("answer", answer.text.as_str())])?;
            }
            if let Some(feedback) = &first.feedback {
                doc.element("correcthint", &[], feedback)?;
            }
            doc.empty("textline", &[("size", "20")])?;
            doc.end("stringresponse")?;
        }
    }
    doc.end("problem")?;
    Ok(doc.finish())
}

fn video_component(video: &VideoReference) -> Result<Vec<u8>, ArchiveError> {
    let url = video.playback_url();
    let sources = serde_json::to_string(&[url])?;
    let title = if video.title.is_empty() {
        "Video"
    } else {
        video.title.as_str()
    };

    let mut doc = XmlDoc::bare();
    doc.start(
        "video",
        &[
            ("display_name", title),
            ("html5_sources", sources.as_str()),
            ("download_video", "false"),
            ("youtube_id_1_0", ""),
        ],
    )?;
    doc.empty("source", &[("src", url)])?;
    doc.end("video")?;
    Ok(doc.finish())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn text(bytes: &[u8]) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_single_choice_problem() {
        let question = Question::new(QuestionKind::SingleChoice, "2+2=?")
            .with_answer(Answer::new("4", true).with_feedback("right"))
            .with_answer(Answer::new("3", false));
        let xml = text(&problem("Q1", &question).unwrap());

        assert!(xml.starts_with(r#"<problem display_name="Q1" max_attempts="1">"#));
        assert!(xml.contains("<p>2+2=?</p>"));
        assert!(xml.contains(r#"<choicegroup type="MultipleChoice">"#));
        assert!(xml.contains("<choicehint>right</choicehint>"));
        assert_eq!(xml.matches("<choice ").count(), 2);
    }

    #[test]
    fn test_checkbox_problem() {
        let question = Question::new(QuestionKind::MultipleChoice, "Primes")
            .with_answer(Answer::new("2", true).with_feedback("prime"))
            .with_answer(Answer::new("4", false));
        let xml = text(&problem("Q1", &question).unwrap());
        assert!(xml.contains("<checkboxgroup>"));
        assert!(xml.contains(r#"<choicehint selected="true">prime</choicehint>"#));
    }

    #[test]
    fn test_string_response() {
        let question = Question::new(QuestionKind::ShortAnswer, "Capital?")
            .with_answer(Answer::new("Paris", true))
            .with_answer(Answer::new("paris", true));
        let xml = text(&problem("Q1", &question).unwrap());
        assert!(xml.contains(r#"<stringresponse answer="Paris" type="ci">"#));
        assert!(xml.contains(r#"<additional_answer answer="paris"/>"#));
        assert!(xml.contains(r#"<textline size="20"/>"#));
    }

    #[test]
    fn test_prompt_media_rewritten() {
        let question = Question::new(QuestionKind::SingleChoice, "![c](media/c.png)")
            .with_answer(Answer::new("a", true));
        let xml = text(&problem("Q1", &question).unwrap());
        assert!(xml.contains(r#"src="/static/c.png""#));
    }

    #[test]
    fn test_video_component() {
        let video = VideoReference {
            url: "https://vimeo.com/1".to_owned(),
            title: String::new(),
            provider: cw_model::Provider::Vimeo,
            embed: String::new(),
            src: Some("https://player.vimeo.com/video/1".to_owned()),
            thumbnail: String::new(),
        };
        let xml = text(&video_component(&video).unwrap());
        assert!(xml.contains(r#"display_name="Video""#));
        assert!(xml.contains(r#"html5_sources="[&quot;https://player.vimeo.com/video/1&quot;]""#));
        assert!(xml.contains(r#"<source src="https://player.vimeo.com/video/1"/>"#));
    }

    #[test]
    fn test_grading_policy() {
        let mut module = Module::new("m");
        let mut section = Section::new("1", "S");
        let mut a = Subsection::new("1.1", "A");
        a.activity = ActivityKind::Comprehension;
        let mut b = Subsection::new("1.2", "B");
        b.activity = ActivityKind::Comprehension;
        let mut c = Subsection::new("1.3", "C");
        c.activity = ActivityKind::AdvancedActivity;
        section.subsections = vec![a, b, c, Subsection::new("1.4", "D")];
        module.sections.push(section);

        let policy = grading_policy(&module);
        let graders = policy["GRADER"].as_array().unwrap();
        assert_eq!(graders.len(), 2);
        assert_eq!(graders[0]["type"], "Comprehension");
        assert_eq!(graders[0]["min_count"], 2);
        assert_eq!(graders[0]["weight"], 0.5);
        assert_eq!(graders[1]["type"], "Activite Avancee");
    }
}
