//! IMS Common Cartridge 1.1 exporter.
//!
//! Archive layout:
//!
//! ```text
//! imsmanifest.xml
//! webcontent/{anchor}_p{k}.html          one page per prose run
//! webcontent/media/{file}                module media
//! assessments/{anchor}_q{k}/assessment.xml
//! weblinks/{anchor}_v{k}.xml
//! ```

use cw_model::numbering::category;
use cw_model::{MediaSet, Module, Question, QuestionKind, Subsection, VideoReference, Warning};
use cw_renderer::{HtmlBackend, MarkdownRenderer, escape_html};

use crate::error::ArchiveError;
use crate::items::{Item, items};
use crate::package::{Package, ZipPackage};
use crate::xml::XmlDoc;
use crate::{ArchiveOutput, DEFAULT_LANGUAGE, check_question};

const CP_NS: &str = "http://www.imsglobal.org/xsd/imsccv1p1/imscp_v1p1";
const LOM_MANIFEST_NS: &str = "http://ltsc.ieee.org/xsd/imsccv1p1/LOM/manifest";
const LOM_RESOURCE_NS: &str = "http://ltsc.ieee.org/xsd/imsccv1p1/LOM/resource";
const QTI_NS: &str = "http://www.imsglobal.org/xsd/ims_qtiasiv1p2";
const WEBLINK_NS: &str = "http://www.imsglobal.org/xsd/imsccv1p1/imswl_v1p1";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const CP_SCHEMA_LOCATION: &str = "http://www.imsglobal.org/xsd/imsccv1p1/imscp_v1p1 \
    http://www.imsglobal.org/profile/cc/ccv1p1/ccv1p1_imscp_v1p2_v1p0.xsd";

const WEBCONTENT: &str = "webcontent";
const ASSESSMENT: &str = "imsqti_xmlv1p2/imscc_xmlv1p1/assessment";
const WEBLINK: &str = "imswl_xmlv1p1";

const RESPONSE_ID: &str = "response1";

/// Builds IMS Common Cartridge zips.
#[derive(Clone, Debug, Default)]
pub struct ImsExporter {
    language: Option<String>,
}

struct Resource {
    id: String,
    kind: &'static str,
    href: String,
}

struct Entry {
    id: String,
    title: String,
    resource: Resource,
}

struct Node {
    id: String,
    title: String,
    children: Vec<Node>,
    entries: Vec<Entry>,
}

impl ImsExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata language when the module does not declare one.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Export one module with its media.
    pub fn export(&self, module: &Module, media: &MediaSet) -> Result<ArchiveOutput, ArchiveError> {
        let mut package = ZipPackage::new();
        let mut warnings = Vec::new();
        let mut tree = Vec::new();

        for section in &module.sections {
            let mut section_node = Node {
                id: section.anchor(),
                title: title_or(&section.heading(), &section.title, module.title()),
                children: Vec::new(),
                entries: Vec::new(),
            };
            for subsection in &section.subsections {
                let node = export_subsection(module, subsection, &mut package, &mut warnings)?;
                section_node.children.push(node);
            }
            tree.push(section_node);
        }

        let mut media_resources = Vec::new();
        for (index, (name, bytes)) in media.iter().enumerate() {
            let href = format!("webcontent/media/{name}");
            package.add_file(&href, bytes)?;
            media_resources.push(Resource {
                id: format!("media_{}", index + 1),
                kind: WEBCONTENT,
                href,
            });
        }

        let manifest = self.manifest(module, &tree, &media_resources)?;
        package.add_file("imsmanifest.xml", &manifest)?;

        tracing::debug!(
            module = %module.name,
            media = media_resources.len(),
            warnings = warnings.len(),
            "Built IMS archive"
        );
        Ok(ArchiveOutput {
            bytes: package.finish()?,
            warnings,
        })
    }

    fn manifest(
        &self,
        module: &Module,
        tree: &[Node],
        media: &[Resource],
    ) -> Result<Vec<u8>, ArchiveError> {
        let language = module
            .meta
            .language
            .as_deref()
            .or(self.language.as_deref())
            .unwrap_or(DEFAULT_LANGUAGE);

        let mut doc = XmlDoc::new()?;
        doc.start(
            "manifest",
            &[
                ("identifier", "course_manifest"),
                ("xmlns", CP_NS),
                ("xmlns:lom", LOM_RESOURCE_NS),
                ("xmlns:lomimscc", LOM_MANIFEST_NS),
                ("xmlns:xsi", XSI_NS),
                ("xsi:schemaLocation", CP_SCHEMA_LOCATION),
            ],
        )?;

        doc.start("metadata", &[])?;
        doc.element("schema", &[], "IMS Common Cartridge")?;
        doc.element("schemaversion", &[], "1.1.0")?;
        doc.start("lomimscc:lom", &[])?;
        doc.start("lomimscc:general", &[])?;
        doc.start("lomimscc:title", &[])?;
        doc.element("lomimscc:string", &[("language", language)], module.title())?;
        doc.end("lomimscc:title")?;
        doc.element("lomimscc:language", &[], language)?;
        doc.end("lomimscc:general")?;
        doc.end("lomimscc:lom")?;
        doc.end("metadata")?;

        doc.start("organizations", &[])?;
        doc.start(
            "organization",
            &[("identifier", "organization"), ("structure", "rooted-hierarchy")],
        )?;
        doc.start("item", &[("identifier", "root")])?;
        for node in tree {
            write_node(&mut doc, node)?;
        }
        doc.end("item")?;
        doc.end("organization")?;
        doc.end("organizations")?;

        doc.start("resources", &[])?;
        let entries = tree
            .iter()
            .flat_map(|section| section.children.iter())
            .flat_map(|subsection| subsection.entries.iter());
        for resource in entries.map(|e| &e.resource).chain(media) {
            write_resource(&mut doc, resource)?;
        }
        doc.end("resources")?;

        doc.end("manifest")?;
        Ok(doc.finish())
    }
}

fn export_subsection(
    module: &Module,
    subsection: &Subsection,
    package: &mut ZipPackage,
    warnings: &mut Vec<Warning>,
) -> Result<Node, ArchiveError> {
    let title = title_or(&subsection.heading(), &subsection.title, module.title());
    let mut entries = Vec::new();

    for item in items(subsection) {
        let entry = match item {
            Item::Page { id, markdown } => {
                let href = format!("webcontent/{id}.html");
                let html = MarkdownRenderer::<HtmlBackend>::new().render_markdown(&markdown);
                package.add_file(&href, page(&title, &html).as_bytes())?;
                Entry {
                    id: format!("{id}_item"),
                    title: title.clone(),
                    resource: Resource {
                        id,
                        kind: WEBCONTENT,
                        href,
                    },
                }
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
                        "Skipping question in IMS archive"
                    );
                    warnings.push(
                        Warning::content(format!(
                            "question {id} skipped in IMS archive: {reason}"
                        ))
                        .at(category(&module.name, &subsection.num)),
                    );
                    continue;
                }
                let href = format!("assessments/{id}/assessment.xml");
                package.add_file(&href, &assessment(&id, &label, question)?)?;
                Entry {
                    id: format!("{id}_item"),
                    title: label,
                    resource: Resource {
                        id,
                        kind: ASSESSMENT,
                        href,
                    },
                }
            }
            Item::Video { id, video } => {
                let href = format!("weblinks/{id}.xml");
                package.add_file(&href, &weblink(video)?)?;
                Entry {
                    id: format!("{id}_item"),
                    title: video_title(video).to_owned(),
                    resource: Resource {
                        id,
                        kind: WEBLINK,
                        href,
                    },
                }
            }
        };
        entries.push(entry);
    }

    Ok(Node {
        id: subsection.anchor(),
        title,
        children: Vec::new(),
        entries,
    })
}

fn write_node(doc: &mut XmlDoc, node: &Node) -> Result<(), ArchiveError> {
    doc.start("item", &[("identifier", node.id.as_str())])?;
    doc.element("title", &[], &node.title)?;
    for child in &node.children {
        write_node(doc, child)?;
    }
    for entry in &node.entries {
        doc.start(
            "item",
            &[
                ("identifier", entry.id.as_str()),
                ("identifierref", entry.resource.id.as_str()),
            ],
        )?;
        doc.element("title", &[], &entry.title)?;
        doc.end("item")?;
    }
    doc.end("item")
}

fn write_resource(doc: &mut XmlDoc, resource: &Resource) -> Result<(), ArchiveError> {
    let mut attrs = vec![("identifier", resource.id.as_str()), ("type", resource.kind)];
    if resource.kind == WEBCONTENT {
        attrs.push(("href", resource.href.as_str()));
    }
    doc.start("resource", &attrs)?;
    doc.empty("file", &[("href", resource.href.as_str())])?;
    doc.end("resource")
}

/// Numbered heading, or `fallback` for implicit (untitled) nodes.
fn title_or(heading: &str, title: &str, fallback: &str) -> String {
    if title.is_empty() {
        fallback.to_owned()
    } else {
        heading.to_owned()
    }
}

fn video_title(video: &VideoReference) -> &str {
    if video.title.is_empty() {
        "Video"
    } else {
        &video.title
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape_html(title)
    )
}

fn weblink(video: &VideoReference) -> Result<Vec<u8>, ArchiveError> {
    let mut doc = XmlDoc::new()?;
    doc.start("webLink", &[("xmlns", WEBLINK_NS), ("xmlns:xsi", XSI_NS)])?;
    doc.element("title", &[], video_title(video))?;
    doc.empty(
        "url",
        &[("href", video.playback_url()), ("target", "_blank")],
    )?;
    doc.end("webLink")?;
    Ok(doc.finish())
}

fn profile(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::SingleChoice => "cc.multiple_choice.v0p1",
        QuestionKind::MultipleChoice => "cc.multiple_response.v0p1",
        QuestionKind::TrueFalse => "cc.true_false.v0p1",
        QuestionKind::ShortAnswer => "cc.fib.v0p1",
    }
}

fn metadata_field(doc: &mut XmlDoc, label: &str, entry: &str) -> Result<(), ArchiveError> {
    doc.start("qtimetadatafield", &[])?;
    doc.element("fieldlabel", &[], label)?;
    doc.element("fieldentry", &[], entry)?;
    doc.end("qtimetadatafield")
}

fn material(doc: &mut XmlDoc, texttype: &str, text: &str) -> Result<(), ArchiveError> {
    doc.start("material", &[])?;
    doc.element("mattext", &[("texttype", texttype)], text)?;
    doc.end("material")
}

/// QTI 1.2 assessment holding a single item.
fn assessment(id: &str, label: &str, question: &Question) -> Result<Vec<u8>, ArchiveError> {
    let idents: Vec<String> = (1..=question.answers.len())
        .map(|n| format!("{id}_a{n}"))
        .collect();

    let mut doc = XmlDoc::new()?;
    doc.start(
        "questestinterop",
        &[("xmlns", QTI_NS), ("xmlns:xsi", XSI_NS)],
    )?;
    doc.start("assessment", &[("ident", id), ("title", label)])?;
    doc.start("qtimetadata", &[])?;
    metadata_field(&mut doc, "cc_profile", "cc.exam.v0p1")?;
    metadata_field(&mut doc, "qmd_assessmenttype", "Examination")?;
    metadata_field(&mut doc, "cc_maxattempts", "1")?;
    doc.end("qtimetadata")?;
    doc.start("section", &[("ident", "root_section")])?;

    let item_ident = format!("{id}_item");
    doc.start("item", &[("ident", item_ident.as_str()), ("title", label)])?;
    doc.start("itemmetadata", &[])?;
    doc.start("qtimetadata", &[])?;
    metadata_field(&mut doc, "cc_profile", profile(question.kind))?;
    doc.end("qtimetadata")?;
    doc.end("itemmetadata")?;

    presentation(&mut doc, question, &idents)?;
    resprocessing(&mut doc, question, &idents)?;

    for (ident, answer) in idents.iter().zip(&question.answers) {
        if let Some(feedback) = &answer.feedback {
            let feedback_ident = format!("{ident}_fb");
            doc.start("itemfeedback", &[("ident", feedback_ident.as_str())])?;
            doc.start("flow_mat", &[])?;
            material(&mut doc, "text/plain", feedback)?;
            doc.end("flow_mat")?;
            doc.end("itemfeedback")?;
        }
    }

    doc.end("item")?;
    doc.end("section")?;
    doc.end("assessment")?;
    doc.end("questestinterop")?;
    Ok(doc.finish())
}

fn presentation(
    doc: &mut XmlDoc,
    question: &Question,
    idents: &[String],
) -> Result<(), ArchiveError> {
    let prompt = MarkdownRenderer::<HtmlBackend>::new().render_markdown(&question.prompt);
    doc.start("presentation", &[])?;
    material(doc, "text/html", &prompt)?;
    if question.kind.is_choice() {
        let cardinality = if question.kind == QuestionKind::MultipleChoice {
            "Multiple"
        } else {
            "Single"
        };
        doc.start(
            "response_lid",
            &[("ident", RESPONSE_ID), ("rcardinality", cardinality)],
        )?;
        doc.start("render_choice", &[])?;
        for (ident, answer) in idents.iter().zip(&question.answers) {
            doc.start("response_label", &[("ident", ident.as_str())])?;
            material(doc, "text/plain", &answer.text)?;
            doc.end("response_label")?;
        }
        doc.end("render_choice")?;
        doc.end("response_lid")?;
    } else {
        doc.start(
            "response_str",
            &[("ident", RESPONSE_ID), ("rcardinality", "Single")],
        )?;
        doc.start("render_fib", &[])?;
        doc.empty("response_label", &[("ident", "answer1"), ("rshuffle", "No")])?;
        doc.end("render_fib")?;
        doc.end("response_str")?;
    }
    doc.end("presentation")
}

fn varequal(doc: &mut XmlDoc, value: &str, case_sensitive: bool) -> Result<(), ArchiveError> {
    if case_sensitive {
        doc.element("varequal", &[("respident", RESPONSE_ID)], value)
    } else {
        doc.element(
            "varequal",
            &[("respident", RESPONSE_ID), ("case", "No")],
            value,
        )
    }
}

fn resprocessing(
    doc: &mut XmlDoc,
    question: &Question,
    idents: &[String],
) -> Result<(), ArchiveError> {
    let choice = question.kind.is_choice();
    doc.start("resprocessing", &[])?;
    doc.start("outcomes", &[])?;
    doc.empty(
        "decvar",
        &[
            ("maxvalue", "100"),
            ("minvalue", "0"),
            ("varname", "SCORE"),
            ("vartype", "Decimal"),
        ],
    )?;
    doc.end("outcomes")?;

    for (ident, answer) in idents.iter().zip(&question.answers) {
        if answer.feedback.is_none() {
            continue;
        }
        doc.start("respcondition", &[("continue", "Yes")])?;
        doc.start("conditionvar", &[])?;
        if choice {
            varequal(doc, ident, true)?;
        } else {
            varequal(doc, &answer.text, false)?;
        }
        doc.end("conditionvar")?;
        let feedback_ident = format!("{ident}_fb");
        doc.empty(
            "displayfeedback",
            &[
                ("feedbacktype", "Response"),
                ("linkrefid", feedback_ident.as_str()),
            ],
        )?;
        doc.end("respcondition")?;
    }

    doc.start("respcondition", &[("continue", "No")])?;
    doc.start("conditionvar", &[])?;
    match question.kind {
        QuestionKind::SingleChoice | QuestionKind::TrueFalse => {
            for (ident, answer) in idents.iter().zip(&question.answers) {
                if answer.correct {
                    varequal(doc, ident, true)?;
                }
            }
        }
        QuestionKind::MultipleChoice => {
            doc.start("and", &[])?;
            for (ident, answer) in idents.iter().zip(&question.answers) {
                if answer.correct {
                    varequal(doc, ident, true)?;
                } else {
                    doc.start("not", &[])?;
                    varequal(doc, ident, true)?;
                    doc.end("not")?;
                }
            }
            doc.end("and")?;
        }
        QuestionKind::ShortAnswer => {
            for answer in &question.answers {
                varequal(doc, &answer.text, false)?;
            }
        }
    }
    doc.end("conditionvar")?;
    doc.element("setvar", &[("action", "Set"), ("varname", "SCORE")], "100")?;
    doc.end("respcondition")?;
    doc.end("resprocessing")
}
