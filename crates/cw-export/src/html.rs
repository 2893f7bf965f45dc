//! HTML exporter.
//!
//! Produces the module's HTML fragment: one `<section>` per section, one
//! `<div class="subsection">` per subsection, blocks in source order.

use std::fmt::Write;

use cw_model::{ContentBlock, Module, Question, QuestionKind, Subsection, VideoReference};
use cw_renderer::{HtmlBackend, MarkdownRenderer, escape_html};

/// HTML export options.
#[derive(Clone, Debug, Default)]
pub struct HtmlOptions {
    /// Show per-answer correctness marks and feedback text.
    pub feedback: bool,
    /// Override for the `media/` prefix; defaults to the module's media base.
    pub media_base: Option<String>,
}

impl HtmlOptions {
    #[must_use]
    pub fn with_feedback(mut self, feedback: bool) -> Self {
        self.feedback = feedback;
        self
    }

    #[must_use]
    pub fn with_media_base(mut self, base: impl Into<String>) -> Self {
        self.media_base = Some(base.into());
        self
    }
}

/// Render a whole module.
pub fn render_module(module: &Module, options: &HtmlOptions) -> String {
    let options = HtmlOptions {
        feedback: options.feedback,
        media_base: options.media_base.clone().or_else(|| module.media_base.clone()),
    };
    let mut out = String::with_capacity(4096);

    for section in &module.sections {
        writeln!(
            out,
            r#"<section class="section" id="{}">"#,
            escape_html(&section.anchor())
        )
        .unwrap();
        if !section.title.is_empty() {
            writeln!(out, "<h1>{}</h1>", escape_html(&section.heading())).unwrap();
        }
        for subsection in &section.subsections {
            out.push_str(&render_subsection(subsection, &options));
        }
        out.push_str("</section>\n");
    }

    tracing::debug!(module = %module.name, bytes = out.len(), "Rendered module HTML");
    out
}

/// Render a single subsection (used for previews).
pub fn render_subsection(subsection: &Subsection, options: &HtmlOptions) -> String {
    let mut out = String::new();
    writeln!(
        out,
        r#"<div class="subsection {}" id="{}">"#,
        subsection.activity.css_class(),
        escape_html(&subsection.anchor())
    )
    .unwrap();
    if !subsection.title.is_empty() {
        writeln!(out, "<h2>{}</h2>", escape_html(&subsection.heading())).unwrap();
    }

    for (index, block) in subsection.indexed_blocks() {
        match block {
            ContentBlock::Prose(markdown) => {
                out.push_str(&render_markdown(markdown, options));
                out.push('\n');
            }
            ContentBlock::Question(question) => {
                let id = subsection.item_id(block, index);
                render_question(question, &id, options, &mut out);
            }
            ContentBlock::Video(video) => render_video(video, &mut out),
        }
    }

    out.push_str("</div>\n");
    out
}

fn render_markdown(markdown: &str, options: &HtmlOptions) -> String {
    let renderer = MarkdownRenderer::<HtmlBackend>::new();
    let mut renderer = match &options.media_base {
        Some(base) => renderer.with_media_base(base.as_str()),
        None => renderer,
    };
    renderer.render_markdown(markdown)
}

fn kind_class(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::SingleChoice => "single-choice",
        QuestionKind::MultipleChoice => "multiple-choice",
        QuestionKind::TrueFalse => "true-false",
        QuestionKind::ShortAnswer => "short-answer",
    }
}

fn render_question(question: &Question, id: &str, options: &HtmlOptions, out: &mut String) {
    let id = escape_html(id);
    writeln!(
        out,
        r#"<div class="question {}" id="{id}">"#,
        kind_class(question.kind)
    )
    .unwrap();
    if let Some(title) = &question.title {
        writeln!(out, r#"<p class="question-title">{}</p>"#, escape_html(title)).unwrap();
    }
    writeln!(
        out,
        r#"<div class="question-prompt">{}</div>"#,
        render_markdown(&question.prompt, options)
    )
    .unwrap();

    if question.kind == QuestionKind::ShortAnswer {
        writeln!(out, r#"<input type="text" name="{id}">"#).unwrap();
        if options.feedback {
            out.push_str(r#"<ul class="accepted-answers">"#);
            for answer in &question.answers {
                write!(out, "<li>{}", escape_html(&answer.text)).unwrap();
                write_feedback(answer.feedback.as_deref(), out);
                out.push_str("</li>");
            }
            out.push_str("</ul>\n");
        }
    } else {
        let input = if question.kind == QuestionKind::MultipleChoice {
            "checkbox"
        } else {
            "radio"
        };
        out.push_str(r#"<ul class="answers">"#);
        for (i, answer) in question.answers.iter().enumerate() {
            if options.feedback {
                let class = if answer.correct { "correct" } else { "incorrect" };
                write!(out, r#"<li class="answer {class}">"#).unwrap();
            } else {
                out.push_str(r#"<li class="answer">"#);
            }
            write!(
                out,
                r#"<label><input type="{input}" name="{id}" value="{i}"> {}</label>"#,
                escape_html(&answer.text)
            )
            .unwrap();
            if options.feedback {
                let mark = if answer.correct { "&#10004;" } else { "&#10008;" };
                write!(out, r#" <span class="answer-mark">{mark}</span>"#).unwrap();
                write_feedback(answer.feedback.as_deref(), out);
            }
            out.push_str("</li>");
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</div>\n");
}

fn write_feedback(feedback: Option<&str>, out: &mut String) {
    if let Some(feedback) = feedback {
        write!(out, r#" <span class="feedback">{}</span>"#, escape_html(feedback)).unwrap();
    }
}

fn render_video(video: &VideoReference, out: &mut String) {
    writeln!(out, r#"<div class="video">{}</div>"#, video.embed).unwrap();
    writeln!(
        out,
        r#"<p class="video-link"><a href="{}" target="_blank">{}</a></p>"#,
        escape_html(&video.url),
        escape_html(&video.title)
    )
    .unwrap();
}

#[cfg(test)]
mod tests {
    use cw_model::{ActivityKind, Answer, Provider, Section};
    use pretty_assertions::assert_eq;

    use super::*;

    fn question() -> Question {
        Question::new(QuestionKind::SingleChoice, "2+2=?")
            .with_answer(Answer::new("4", true).with_feedback("right"))
            .with_answer(Answer::new("3", false))
    }

    fn module() -> Module {
        let mut module = Module::new("module1");
        let mut section = Section::new("1", "Intro");
        let mut sub = Subsection::new("1.1", "Warm-up");
        sub.activity = ActivityKind::Comprehension;
        sub.blocks = vec![
            ContentBlock::Prose("Some *text*.".to_owned()),
            ContentBlock::Question(question()),
        ];
        section.subsections.push(sub);
        module.sections.push(section);
        module
    }

    #[test]
    fn test_structure() {
        let html = render_module(&module(), &HtmlOptions::default());
        assert!(html.starts_with("<section class=\"section\" id=\"sec_1\">\n<h1>1. Intro</h1>\n"));
        assert!(html.contains(
            "<div class=\"subsection comprehension\" id=\"sec_1_1\">\n<h2>1.1 Warm-up</h2>\n"
        ));
        assert!(html.contains("<p>Some <em>text</em>.</p>"));
        assert!(html.contains(r#"<div class="question single-choice" id="sec_1_1_q1">"#));
        assert!(html.contains(r#"<input type="radio" name="sec_1_1_q1" value="0"> 4"#));
        assert!(html.ends_with("</div>\n</section>\n"));
    }

    #[test]
    fn test_feedback_gating() {
        let without = render_module(&module(), &HtmlOptions::default());
        for marker in ["correct", "incorrect", "answer-mark", "right"] {
            assert!(!without.contains(marker), "{marker} leaked");
        }

        let with = render_module(&module(), &HtmlOptions::default().with_feedback(true));
        assert!(with.contains(r#"<li class="answer correct">"#));
        assert!(with.contains(r#"<li class="answer incorrect">"#));
        assert!(with.contains("answer-mark"));
        assert!(with.contains(r#"<span class="feedback">right</span>"#));
    }

    #[test]
    fn test_input_types() {
        let mut multi = question().with_answer(Answer::new("2+2", true));
        multi.kind = QuestionKind::MultipleChoice;
        let short = Question::new(QuestionKind::ShortAnswer, "Capital?")
            .with_answer(Answer::new("Paris", true));

        let mut sub = Subsection::new("2.1", "Q");
        sub.blocks = vec![ContentBlock::Question(multi), ContentBlock::Question(short)];
        let html = render_subsection(&sub, &HtmlOptions::default());
        assert!(html.contains(r#"type="checkbox" name="sec_2_1_q1""#));
        assert!(html.contains(r#"<input type="text" name="sec_2_1_q2">"#));
        assert!(!html.contains("Paris"));

        let html = render_subsection(&sub, &HtmlOptions::default().with_feedback(true));
        assert!(html.contains(r#"<ul class="accepted-answers"><li>Paris</li></ul>"#));
    }

    #[test]
    fn test_escaping() {
        let mut sub = Subsection::new("1.1", "<script>");
        sub.blocks = vec![ContentBlock::Question(
            Question::new(QuestionKind::SingleChoice, "pick")
                .with_title("a & b")
                .with_answer(Answer::new("<b>", true)),
        )];
        let html = render_subsection(&sub, &HtmlOptions::default());
        assert!(html.contains("<h2>1.1 &lt;script&gt;</h2>"));
        assert!(html.contains(r#"<p class="question-title">a &amp; b</p>"#));
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_video_block() {
        let mut sub = Subsection::new("1.1", "Watch");
        sub.blocks = vec![ContentBlock::Video(VideoReference {
            url: "https://vimeo.com/1".to_owned(),
            title: "Intro".to_owned(),
            provider: Provider::Vimeo,
            embed: r#"<iframe src="https://player.vimeo.com/video/1"></iframe>"#.to_owned(),
            src: Some("https://player.vimeo.com/video/1".to_owned()),
            thumbnail: String::new(),
        })];
        let html = render_subsection(&sub, &HtmlOptions::default());
        assert!(html.contains(
            r#"<div class="video"><iframe src="https://player.vimeo.com/video/1"></iframe></div>"#
        ));
        assert!(html.contains(r#"<a href="https://vimeo.com/1" target="_blank">Intro</a>"#));
    }

    #[test]
    fn test_implicit_nodes_have_no_heading() {
        let mut module = Module::new("module1");
        let mut section = Section::new("0", "");
        let mut sub = Subsection::new("0.0", "");
        sub.blocks.push(ContentBlock::Prose("Preamble".to_owned()));
        section.subsections.push(sub);
        module.sections.push(section);
        let html = render_module(&module, &HtmlOptions::default());
        assert_eq!(
            html,
            "<section class=\"section\" id=\"sec_0\">\n<div class=\"subsection webcontent\" id=\"sec_0_0\">\n<p>Preamble</p>\n</div>\n</section>\n"
        );
    }

    #[test]
    fn test_media_base_from_module() {
        let mut module = module();
        module.media_base = Some("http://host/module1/media/".to_owned());
        module.sections[0].subsections[0].blocks =
            vec![ContentBlock::Prose("![a](media/a.png)".to_owned())];
        let html = render_module(&module, &HtmlOptions::default());
        assert!(html.contains(r#"src="http://host/module1/media/a.png""#));
    }
}
