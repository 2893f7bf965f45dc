//! Course, module, section and subsection tree.

use std::fmt;

use crate::numbering;
use crate::question::Question;
use crate::video::VideoReference;

/// One block of subsection content, in source order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value", rename_all = "lowercase"))]
pub enum ContentBlock {
    /// Markdown prose, rendered by the exporters.
    Prose(String),
    /// An extracted quiz question.
    Question(Question),
    /// A resolved video reference.
    Video(VideoReference),
}

impl ContentBlock {
    /// Short tag used in item identifiers (`p`, `q`, `v`).
    #[must_use]
    pub fn item_kind(&self) -> &'static str {
        match self {
            Self::Prose(_) => "p",
            Self::Question(_) => "q",
            Self::Video(_) => "v",
        }
    }
}

/// Kind of learning activity a subsection represents.
///
/// Set from an attribute list on the subsection heading
/// (`## Quiz {.comprehension}`). Archive exporters use it to pick a grader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ActivityKind {
    /// Plain reading content.
    #[default]
    WebContent,
    /// Comprehension check.
    Comprehension,
    /// Graded activity.
    Activity,
    /// Advanced graded activity.
    AdvancedActivity,
}

impl ActivityKind {
    /// Parse an activity class name (`comprehension`, `activite`, ...).
    ///
    /// Matching is case-insensitive and ignores `-`/`_` separators.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "webcontent" => Some(Self::WebContent),
            "comprehension" => Some(Self::Comprehension),
            "activite" | "activity" => Some(Self::Activity),
            "activiteavancee" | "advancedactivity" => Some(Self::AdvancedActivity),
            _ => None,
        }
    }

    /// CSS class used by the HTML exporter.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::WebContent => "webcontent",
            Self::Comprehension => "comprehension",
            Self::Activity => "activite",
            Self::AdvancedActivity => "activite-avancee",
        }
    }
}

/// Metadata declared at the top of a module source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleMeta {
    pub title: Option<String>,
    pub menu_title: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
}

/// Numbered subsection holding content blocks in source order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subsection<B = ContentBlock> {
    /// Position tag (`"1.2"`), assigned once by the parser.
    pub num: String,
    pub title: String,
    pub activity: ActivityKind,
    pub blocks: Vec<B>,
}

impl<B> Subsection<B> {
    /// Create an empty web-content subsection.
    pub fn new(num: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            num: num.into(),
            title: title.into(),
            activity: ActivityKind::default(),
            blocks: Vec::new(),
        }
    }

    /// HTML anchor / archive identifier derived from the position tag.
    #[must_use]
    pub fn anchor(&self) -> String {
        numbering::anchor(&self.num)
    }

    /// Heading text with numbering (`"1.2 Title"`).
    #[must_use]
    pub fn heading(&self) -> String {
        numbering::heading(&self.num, &self.title)
    }
}

/// Numbered section of a module.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section<B = ContentBlock> {
    /// Position tag (`"1"`, or `"0"` for the implicit leading section).
    pub num: String,
    pub title: String,
    pub subsections: Vec<Subsection<B>>,
}

impl<B> Section<B> {
    pub fn new(num: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            num: num.into(),
            title: title.into(),
            subsections: Vec::new(),
        }
    }

    #[must_use]
    pub fn anchor(&self) -> String {
        numbering::anchor(&self.num)
    }

    #[must_use]
    pub fn heading(&self) -> String {
        numbering::heading(&self.num, &self.title)
    }
}

/// Error returned when a module's logo is assigned twice.
#[derive(Debug, thiserror::Error)]
#[error("logo already assigned to module {module}: {existing}")]
pub struct LogoAlreadyAssigned {
    pub module: String,
    pub existing: String,
}

/// One authored unit of course content.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Module<B = ContentBlock> {
    /// Stable identifier (`module1`), also the output slug.
    pub name: String,
    pub meta: ModuleMeta,
    /// Prefix for `media/...` references in HTML output (`{base_url}/{name}/media/`).
    pub media_base: Option<String>,
    pub sections: Vec<Section<B>>,
    logo: Option<String>,
}

impl<B> Module<B> {
    /// Create an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meta: ModuleMeta::default(),
            media_base: None,
            sections: Vec::new(),
            logo: None,
        }
    }

    /// Display title: the declared title, falling back to the module name.
    #[must_use]
    pub fn title(&self) -> &str {
        self.meta.title.as_deref().unwrap_or(&self.name)
    }

    /// Resolved logo path, if one was assigned.
    #[must_use]
    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    /// Assign the resolved logo path. Only the first assignment is accepted.
    pub fn assign_logo(&mut self, path: impl Into<String>) -> Result<(), LogoAlreadyAssigned> {
        if let Some(existing) = &self.logo {
            return Err(LogoAlreadyAssigned {
                module: self.name.clone(),
                existing: existing.clone(),
            });
        }
        self.logo = Some(path.into());
        Ok(())
    }

    /// Iterate over all subsections in document order.
    pub fn subsections(&self) -> impl Iterator<Item = &Subsection<B>> {
        self.sections.iter().flat_map(|s| s.subsections.iter())
    }

    /// Iterate over all blocks in document order, paired with their subsection.
    pub fn blocks(&self) -> impl Iterator<Item = (&Subsection<B>, &B)> {
        self.subsections()
            .flat_map(|sub| sub.blocks.iter().map(move |block| (sub, block)))
    }

    /// Map every block into a new block type, dropping blocks for which `f`
    /// returns `None`. Numbering and order are preserved.
    ///
    /// `f` receives the position tag of the owning subsection.
    pub fn filter_map_blocks<C, F>(self, mut f: F) -> Module<C>
    where
        F: FnMut(&str, B) -> Option<C>,
    {
        let sections = self
            .sections
            .into_iter()
            .map(|section| Section {
                num: section.num,
                title: section.title,
                subsections: section
                    .subsections
                    .into_iter()
                    .map(|sub| {
                        let num = sub.num;
                        let blocks = sub
                            .blocks
                            .into_iter()
                            .filter_map(|block| f(&num, block))
                            .collect();
                        Subsection {
                            num,
                            title: sub.title,
                            activity: sub.activity,
                            blocks,
                        }
                    })
                    .collect(),
            })
            .collect();

        Module {
            name: self.name,
            meta: self.meta,
            media_base: self.media_base,
            sections,
            logo: self.logo,
        }
    }
}

impl Subsection<ContentBlock> {
    /// Blocks paired with their 1-based index among blocks of the same kind.
    ///
    /// Consecutive prose blocks share one index: they form a single run.
    pub fn indexed_blocks(&self) -> impl Iterator<Item = (usize, &ContentBlock)> {
        let (mut prose, mut questions, mut videos) = (0, 0, 0);
        let mut previous_was_prose = false;
        self.blocks.iter().map(move |block| {
            let index = match block {
                ContentBlock::Prose(_) => {
                    if !previous_was_prose {
                        prose += 1;
                    }
                    prose
                }
                ContentBlock::Question(_) => {
                    questions += 1;
                    questions
                }
                ContentBlock::Video(_) => {
                    videos += 1;
                    videos
                }
            };
            previous_was_prose = matches!(block, ContentBlock::Prose(_));
            (index, block)
        })
    }

    /// Identifier of an indexed block (`sec_1_2_q1`).
    #[must_use]
    pub fn item_id(&self, block: &ContentBlock, index: usize) -> String {
        numbering::item_id(&self.num, block.item_kind(), index)
    }
}

impl Module<ContentBlock> {
    /// Iterate over questions in source order.
    pub fn questions(&self) -> impl Iterator<Item = (&Subsection, &Question)> {
        self.blocks().filter_map(|(sub, block)| match block {
            ContentBlock::Question(q) => Some((sub, q)),
            _ => None,
        })
    }

    /// Iterate over video references in source order.
    pub fn videos(&self) -> impl Iterator<Item = (&Subsection, &VideoReference)> {
        self.blocks().filter_map(|(sub, block)| match block {
            ContentBlock::Video(v) => Some((sub, v)),
            _ => None,
        })
    }
}

/// Course logo identity handed to site templates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Logo {
    /// Logo file copied next to the site pages.
    File(String),
    /// Use the template's built-in logo.
    #[default]
    Default,
}

impl fmt::Display for Logo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(name) => f.write_str(name),
            Self::Default => f.write_str("default"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Logo {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A course: ordered modules plus site-wide title and logo.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CourseProgram {
    pub title: String,
    pub logo: Logo,
    pub modules: Vec<Module>,
}

impl CourseProgram {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            logo: Logo::Default,
            modules: Vec::new(),
        }
    }

    /// Base output identity derived from the title.
    #[must_use]
    pub fn slug(&self) -> String {
        numbering::slugify(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Module<&'static str> {
        let mut module = Module::new("module1");
        let mut s1 = Section::new("1", "One");
        let mut a = Subsection::new("1.1", "A");
        a.blocks = vec!["a1", "a2"];
        let mut b = Subsection::new("1.2", "B");
        b.blocks = vec!["b1"];
        s1.subsections = vec![a, b];
        module.sections.push(s1);
        module
    }

    #[test]
    fn test_blocks_in_document_order() {
        let module = sample();
        let blocks: Vec<_> = module.blocks().map(|(sub, b)| (sub.num.as_str(), *b)).collect();
        assert_eq!(blocks, vec![("1.1", "a1"), ("1.1", "a2"), ("1.2", "b1")]);
    }

    #[test]
    fn test_filter_map_blocks_preserves_numbering() {
        let mapped = sample().filter_map_blocks(|num, b| (b != "a2").then(|| format!("{num}:{b}")));
        let subs: Vec<_> = mapped.subsections().collect();
        assert_eq!(subs[0].num, "1.1");
        assert_eq!(subs[0].blocks, vec!["1.1:a1".to_owned()]);
        assert_eq!(subs[1].blocks, vec!["1.2:b1".to_owned()]);
    }

    #[test]
    fn test_indexed_blocks() {
        use crate::question::{Answer, Question, QuestionKind};

        let question = Question::new(QuestionKind::SingleChoice, "q")
            .with_answer(Answer::new("a", true));
        let mut sub = Subsection::new("1.1", "A");
        sub.blocks = vec![
            ContentBlock::Prose("one".to_owned()),
            ContentBlock::Prose("two".to_owned()),
            ContentBlock::Question(question.clone()),
            ContentBlock::Prose("three".to_owned()),
            ContentBlock::Question(question),
        ];
        let ids: Vec<_> = sub
            .indexed_blocks()
            .map(|(i, block)| sub.item_id(block, i))
            .collect();
        assert_eq!(
            ids,
            vec!["sec_1_1_p1", "sec_1_1_p1", "sec_1_1_q1", "sec_1_1_p2", "sec_1_1_q2"]
        );
    }

    #[test]
    fn test_assign_logo_once() {
        let mut module = sample();
        assert!(module.logo().is_none());
        module.assign_logo("module1/media/logo.png").unwrap();
        let err = module.assign_logo("other.png").unwrap_err();
        assert_eq!(err.existing, "module1/media/logo.png");
        assert_eq!(module.logo(), Some("module1/media/logo.png"));
    }

    #[test]
    fn test_title_falls_back_to_name() {
        let mut module = sample();
        assert_eq!(module.title(), "module1");
        module.meta.title = Some("Culture".to_owned());
        assert_eq!(module.title(), "Culture");
    }

    #[test]
    fn test_activity_kind_parse() {
        assert_eq!(ActivityKind::parse("Comprehension"), Some(ActivityKind::Comprehension));
        assert_eq!(ActivityKind::parse("activite"), Some(ActivityKind::Activity));
        assert_eq!(
            ActivityKind::parse("ActiviteAvancee"),
            Some(ActivityKind::AdvancedActivity)
        );
        assert_eq!(
            ActivityKind::parse("activite-avancee"),
            Some(ActivityKind::AdvancedActivity)
        );
        assert_eq!(ActivityKind::parse("lecture"), None);
    }

    #[test]
    fn test_logo_display() {
        assert_eq!(Logo::Default.to_string(), "default");
        assert_eq!(Logo::File("logo.png".to_owned()).to_string(), "logo.png");
    }

    #[test]
    fn test_course_slug() {
        let course = CourseProgram::new("Culture Numérique 2024");
        assert_eq!(course.slug(), "culture-numerique-2024");
    }
}
