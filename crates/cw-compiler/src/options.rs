use cw_archive::{EdxExporter, ImsExporter};

/// Per-compile options shared by every module of a course.
#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    /// Site base URL; media references become `{base_url}/{module}/media/…`.
    /// Empty keeps them relative.
    pub base_url: String,
    /// Include answer correctness and feedback in the HTML output.
    pub feedback: bool,
    /// Build an IMS archive with this exporter.
    pub ims: Option<ImsExporter>,
    /// Build an EDX archive with this exporter.
    pub edx: Option<EdxExporter>,
}

impl CompileOptions {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: bool) -> Self {
        self.feedback = feedback;
        self
    }

    #[must_use]
    pub fn with_ims(mut self, exporter: ImsExporter) -> Self {
        self.ims = Some(exporter);
        self
    }

    #[must_use]
    pub fn with_edx(mut self, exporter: EdxExporter) -> Self {
        self.edx = Some(exporter);
        self
    }
}
