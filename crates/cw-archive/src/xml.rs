//! Small XML document builder over the quick-xml writer.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::ArchiveError;

/// Indented XML document. Text and attribute values are escaped.
pub(crate) struct XmlDoc {
    writer: Writer<Vec<u8>>,
}

impl XmlDoc {
    /// Document starting with an `<?xml ...?>` declaration.
    pub(crate) fn new() -> Result<Self, ArchiveError> {
        let mut doc = Self::bare();
        doc.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(doc)
    }

    /// Document without declaration.
    pub(crate) fn bare() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    pub(crate) fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ArchiveError> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(tag))?;
        Ok(())
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<(), ArchiveError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ArchiveError> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Empty(tag))?;
        Ok(())
    }

    /// `<name attrs>text</name>`
    pub(crate) fn element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<(), ArchiveError> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    /// Escaped character data.
    pub(crate) fn text(&mut self, text: &str) -> Result<(), ArchiveError> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    /// Write well-formed markup as-is.
    pub(crate) fn markup(&mut self, xhtml: &str) -> Result<(), ArchiveError> {
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(xhtml)))?;
        Ok(())
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        bytes
    }
}
