//! Line-oriented module source parser.
//!
//! Builds the Module → Section → Subsection tree and classifies content into
//! prose, quiz and video blocks. Position tags come from encounter order only.

use std::sync::LazyLock;

use cw_model::numbering::{section_num, subsection_num};
use cw_model::{ActivityKind, Module, ModuleMeta, Section, Subsection};
use regex::Regex;

use crate::fence::{FenceLine, FenceTracker};

/// `# Title` or `## Title` (deeper headings stay in the prose).
static HEADING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(#{1,2})(?:[ \t]+(.*?))?[ \t]*$").expect("invalid heading regex")
});

/// Trailing attribute list on a subsection heading: `{.comprehension}` or `{: .activite}`.
static ATTRIBUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)[ \t]*\{:?[ \t]*\.([A-Za-z_-]+)[ \t]*\}$").expect("invalid attribute regex")
});

static INLINE_QUIZ_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*\{\{Q:.*\}\}[ \t]*$").expect("invalid quiz regex"));

/// `[title](url){: .cnvideo}`
static VIDEO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*\[([^\]]*)\]\(([^)\s]+)\)[ \t]*\{:?[ \t]*\.cnvideo[ \t]*\}[ \t]*$")
        .expect("invalid video regex")
});

static METADATA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(title|menutitle|author|language)[ \t]*:[ \t]*(.*?)[ \t]*$")
        .expect("invalid metadata regex")
});

/// Fence info strings that mark a quiz block.
const QUIZ_FENCES: &[&str] = &["quiz", "comprehension", "activite", "activite-avancee"];

/// Raw content block produced by the parser, before quiz extraction and
/// video resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceBlock {
    /// Markdown prose.
    Prose(String),
    /// Quiz source: an inline `{{Q: …}}` line or a whole fenced block.
    Quiz { source: String, line: usize },
    /// Video line `[title](url){: .cnvideo}`.
    Video {
        url: String,
        title: String,
        line: usize,
    },
}

/// Fatal problem with a module's source text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    #[error("module source is empty")]
    Empty,
    #[error("module source is not text (NUL byte at offset {offset})")]
    Binary { offset: usize },
}

/// Parse a module's source text into a tree of raw blocks.
///
/// `base_url` sets the module's media base (`{base_url}/{name}/media/`);
/// an empty base URL keeps media references relative.
pub fn parse_module(
    text: &str,
    name: &str,
    base_url: &str,
) -> Result<Module<SourceBlock>, StructureError> {
    if let Some(offset) = text.find('\0') {
        return Err(StructureError::Binary { offset });
    }
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(StructureError::Empty);
    }

    let mut module = Module::new(name);
    let base_url = base_url.trim().trim_end_matches('/');
    if !base_url.is_empty() {
        module.media_base = Some(format!("{base_url}/{name}/media/"));
    }

    let lines: Vec<&str> = text.lines().collect();
    let (meta, body_start) = parse_metadata(&lines);
    module.meta = meta;

    let mut builder = TreeBuilder::default();
    builder.run(&lines, body_start);
    module.sections = builder.finish();

    tracing::debug!(
        module = name,
        sections = module.sections.len(),
        "Parsed module source"
    );
    Ok(module)
}

/// Read leading `key: value` metadata lines. Returns the metadata and the
/// index of the first body line.
fn parse_metadata(lines: &[&str]) -> (ModuleMeta, usize) {
    let mut meta = ModuleMeta::default();
    let mut index = 0;
    while let Some(caps) = lines.get(index).and_then(|l| METADATA_PATTERN.captures(l)) {
        let value = caps[2].to_owned();
        match caps[1].to_lowercase().as_str() {
            "title" => meta.title = Some(value),
            "menutitle" => meta.menu_title = Some(value),
            "author" => meta.author = Some(value),
            _ => meta.language = Some(value),
        }
        index += 1;
    }
    (meta, index)
}

enum QuizCapture {
    Idle,
    Capturing { lines: Vec<String>, start: usize },
}

struct TreeBuilder {
    sections: Vec<Section<SourceBlock>>,
    prose: Vec<String>,
    fence: FenceTracker,
    quiz: QuizCapture,
    section_count: usize,
    subsection_count: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            prose: Vec::new(),
            fence: FenceTracker::new(),
            quiz: QuizCapture::Idle,
            section_count: 0,
            subsection_count: 0,
        }
    }
}

impl TreeBuilder {
    fn run(&mut self, lines: &[&str], start: usize) {
        for (index, line) in lines.iter().enumerate().skip(start) {
            self.line(line, index + 1);
        }
        if let QuizCapture::Capturing { lines, start } =
            std::mem::replace(&mut self.quiz, QuizCapture::Idle)
        {
            // Unclosed quiz fence runs to the end of the document.
            self.push_block(SourceBlock::Quiz {
                source: lines.join("\n"),
                line: start,
            });
        }
        self.flush_prose();
    }

    fn finish(self) -> Vec<Section<SourceBlock>> {
        self.sections
    }

    fn line(&mut self, line: &str, number: usize) {
        let was_in_fence = self.fence.in_fence();
        let fence_line = self.fence.update(line);

        if let QuizCapture::Capturing { lines, start } = &mut self.quiz {
            lines.push(line.to_owned());
            if fence_line == FenceLine::Close {
                let block = SourceBlock::Quiz {
                    source: lines.join("\n"),
                    line: *start,
                };
                self.quiz = QuizCapture::Idle;
                self.push_block(block);
            }
            return;
        }

        if was_in_fence {
            self.prose.push(line.to_owned());
            return;
        }

        if let FenceLine::Open(info) = fence_line {
            let lang = info.split_whitespace().next().unwrap_or_default();
            if QUIZ_FENCES.contains(&lang) {
                self.flush_prose();
                if let Some(activity) = ActivityKind::parse(lang) {
                    self.mark_activity(activity);
                }
                self.quiz = QuizCapture::Capturing {
                    lines: vec![line.to_owned()],
                    start: number,
                };
            } else {
                self.prose.push(line.to_owned());
            }
            return;
        }

        if let Some(caps) = HEADING_PATTERN.captures(line) {
            let title = caps.get(2).map_or("", |m| strip_closing_hashes(m.as_str()));
            if caps[1].len() == 1 {
                self.start_section(title);
            } else {
                self.start_subsection(title);
            }
        } else if INLINE_QUIZ_PATTERN.is_match(line) {
            self.push_block(SourceBlock::Quiz {
                source: line.trim().to_owned(),
                line: number,
            });
        } else if let Some(caps) = VIDEO_PATTERN.captures(line) {
            self.push_block(SourceBlock::Video {
                url: caps[2].to_owned(),
                title: caps[1].trim().to_owned(),
                line: number,
            });
        } else {
            self.prose.push(line.to_owned());
        }
    }

    fn start_section(&mut self, title: &str) {
        self.flush_prose();
        self.section_count += 1;
        self.subsection_count = 0;
        self.sections
            .push(Section::new(section_num(self.section_count), title));
    }

    fn start_subsection(&mut self, heading: &str) {
        self.flush_prose();
        let (title, activity) = split_attribute(heading);
        self.subsection_count += 1;
        let count = self.subsection_count;
        let section = self.current_section();
        let mut subsection = Subsection::new(subsection_num(&section.num, count), title);
        subsection.activity = activity;
        section.subsections.push(subsection);
    }

    /// Current section, creating the implicit section `"0"` if needed.
    fn current_section(&mut self) -> &mut Section<SourceBlock> {
        if self.sections.is_empty() {
            self.sections.push(Section::new(section_num(0), ""));
        }
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    /// Current subsection, creating the implicit subsection `"S.0"` if needed.
    fn current_subsection(&mut self) -> &mut Subsection<SourceBlock> {
        let section = self.current_section();
        if section.subsections.is_empty() {
            let num = subsection_num(&section.num, 0);
            section.subsections.push(Subsection::new(num, ""));
        }
        let last = section.subsections.len() - 1;
        &mut section.subsections[last]
    }

    /// A fenced activity quiz marks its subsection unless one was declared.
    fn mark_activity(&mut self, activity: ActivityKind) {
        let subsection = self.current_subsection();
        if subsection.activity == ActivityKind::WebContent {
            subsection.activity = activity;
        }
    }

    fn push_block(&mut self, block: SourceBlock) {
        self.flush_prose();
        self.current_subsection().blocks.push(block);
    }

    fn flush_prose(&mut self) {
        if self.prose.iter().all(|l| l.trim().is_empty()) {
            self.prose.clear();
            return;
        }
        let text = trim_blank_lines(&std::mem::take(&mut self.prose));
        self.current_subsection().blocks.push(SourceBlock::Prose(text));
    }
}

fn strip_closing_hashes(title: &str) -> &str {
    let stripped = title.trim_end_matches('#');
    if stripped.len() == title.len() {
        title
    } else if stripped.is_empty() {
        ""
    } else if stripped.ends_with([' ', '\t']) {
        stripped.trim_end()
    } else {
        title
    }
}

fn split_attribute(heading: &str) -> (&str, ActivityKind) {
    match ATTRIBUTE_PATTERN.captures(heading) {
        Some(caps) => {
            let title = caps.get(1).map_or("", |m| m.as_str());
            let class = caps.get(2).map_or("", |m| m.as_str());
            (title, ActivityKind::parse(class).unwrap_or_default())
        }
        None => (heading, ActivityKind::default()),
    }
}

fn trim_blank_lines(lines: &[String]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty()).unwrap_or(0);
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}
