//! Extraction pass: raw source blocks to resolved content blocks.

use cw_model::{ContentBlock, Module, Warning};
use cw_parser::{SourceBlock, extract_question};
use cw_video::VideoResolver;

/// Resolve every quiz and video block of a parsed module.
///
/// Quiz blocks that do not yield a valid question are dropped. Warnings are
/// returned in source order, located at `"{module} line {n}"`.
pub(crate) fn extract(
    module: Module<SourceBlock>,
    resolver: &VideoResolver,
) -> (Module, Vec<Warning>) {
    let name = module.name.clone();
    let mut warnings = Vec::new();

    let module = module.filter_map_blocks(|_, block| match block {
        SourceBlock::Prose(text) => Some(ContentBlock::Prose(text)),
        SourceBlock::Quiz { source, line } => match extract_question(&source) {
            Ok(question) => Some(ContentBlock::Question(question)),
            Err(e) => {
                let location = format!("{name} line {line}");
                tracing::warn!(%location, error = %e, "Dropping quiz block");
                warnings.push(Warning::content(format!("quiz block dropped: {e}")).at(location));
                None
            }
        },
        SourceBlock::Video { url, title, line } => {
            let (video, video_warnings) = resolver.resolve(&url, &title);
            for warning in video_warnings {
                let warning = warning.at(format!("{name} line {line}"));
                tracing::warn!(%warning, "Video warning");
                warnings.push(warning);
            }
            Some(ContentBlock::Video(video))
        }
    });

    (module, warnings)
}

#[cfg(test)]
mod tests {
    use cw_model::WarningKind;
    use cw_parser::parse_module;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_extract_blocks() {
        let source = "# S\n## A\nIntro\n{{Q: 2+2=? | *4 | 3}}\n\
                      [Talk](https://vimeo.com/7){: .cnvideo}\n";
        let parsed = parse_module(source, "module1", "").unwrap();
        let (module, warnings) = extract(parsed, &VideoResolver::offline());

        assert!(warnings.is_empty());
        let kinds: Vec<_> = module.blocks().map(|(_, b)| b.item_kind()).collect();
        assert_eq!(kinds, ["p", "q", "v"]);
    }

    #[test]
    fn test_invalid_quiz_dropped_with_location() {
        let source = "# S\n## A\n{{Q: Pick one | a | b}}\ntext\n";
        let parsed = parse_module(source, "module1", "").unwrap();
        let (module, warnings) = extract(parsed, &VideoResolver::offline());

        assert_eq!(module.questions().count(), 0);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::Content);
        assert_eq!(warnings[0].location.as_deref(), Some("module1 line 3"));
    }

    #[test]
    fn test_video_warning_located() {
        let source = "intro\n\n[V](https://unknown.example/v/1){: .cnvideo}\n";
        let parsed = parse_module(source, "module2", "").unwrap();
        let (module, warnings) = extract(parsed, &VideoResolver::offline());

        assert_eq!(module.videos().count(), 1);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].location.as_deref(), Some("module2 line 3"));
    }
}
