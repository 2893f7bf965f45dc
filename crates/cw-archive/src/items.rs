//! Archive items of a subsection.
//!
//! A subsection maps to a sequence of items, in source order: each run of
//! consecutive prose blocks becomes one content page, every question and
//! every video its own item.

use cw_model::{ContentBlock, Question, Subsection, VideoReference};

pub(crate) enum Item<'a> {
    Page { id: String, markdown: String },
    Question { id: String, label: String, question: &'a Question },
    Video { id: String, video: &'a VideoReference },
}

impl Item<'_> {
    pub(crate) fn id(&self) -> &str {
        match self {
            Item::Page { id, .. } | Item::Question { id, .. } | Item::Video { id, .. } => id,
        }
    }
}

pub(crate) fn items(subsection: &Subsection) -> Vec<Item<'_>> {
    let mut items: Vec<Item<'_>> = Vec::new();
    for (index, block) in subsection.indexed_blocks() {
        let id = subsection.item_id(block, index);
        match block {
            ContentBlock::Prose(text) => {
                if let Some(Item::Page { id: last, markdown }) = items.last_mut()
                    && *last == id
                {
                    markdown.push_str("\n\n");
                    markdown.push_str(text);
                    continue;
                }
                items.push(Item::Page {
                    id,
                    markdown: text.clone(),
                });
            }
            ContentBlock::Question(question) => items.push(Item::Question {
                id,
                label: question
                    .title
                    .clone()
                    .unwrap_or_else(|| format!("Q{index}")),
                question,
            }),
            ContentBlock::Video(video) => items.push(Item::Video { id, video }),
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use cw_model::{Answer, QuestionKind};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_prose_runs_merge() {
        let mut sub = Subsection::new("1.1", "T");
        sub.blocks = vec![
            ContentBlock::Prose("a".to_owned()),
            ContentBlock::Prose("b".to_owned()),
            ContentBlock::Question(
                Question::new(QuestionKind::SingleChoice, "q")
                    .with_answer(Answer::new("x", true)),
            ),
            ContentBlock::Prose("c".to_owned()),
        ];
        let items = items(&sub);
        let ids: Vec<_> = items.iter().map(Item::id).collect();
        assert_eq!(ids, ["sec_1_1_p1", "sec_1_1_q1", "sec_1_1_p2"]);
        match &items[0] {
            Item::Page { markdown, .. } => assert_eq!(markdown, "a\n\nb"),
            _ => panic!("expected page"),
        }
        match &items[1] {
            Item::Question { label, .. } => assert_eq!(label, "Q1"),
            _ => panic!("expected question"),
        }
    }
}
