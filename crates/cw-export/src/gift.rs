//! GIFT-style quiz bank exporter.
//!
//! Every question becomes one block, in source order:
//!
//! ```text
//! $CATEGORY: $course$/module1 section 1.1
//!
//! ::1.1 Q1::[markdown]2+2\=?{
//! 	=4#right
//! 	~3
//! }
//! ```

use std::fmt::Write;

use cw_model::numbering::category;
use cw_model::{ContentBlock, Module, Question, QuestionKind};

/// Export all questions of a module. Correctness is always included.
pub fn to_gift(module: &Module) -> String {
    let mut blocks = Vec::new();
    for subsection in module.subsections() {
        for (index, block) in subsection.indexed_blocks() {
            if let ContentBlock::Question(question) = block {
                let label = match &question.title {
                    Some(title) => format!("{} {title}", subsection.num),
                    None => format!("{} Q{index}", subsection.num),
                };
                blocks.push(question_block(
                    &category(&module.name, &subsection.num),
                    &label,
                    question,
                ));
            }
        }
    }
    tracing::debug!(module = %module.name, questions = blocks.len(), "Exported quiz bank");
    blocks.join("\n")
}

fn question_block(category: &str, label: &str, question: &Question) -> String {
    let mut out = String::new();
    writeln!(out, "$CATEGORY: $course$/{category}").unwrap();
    out.push('\n');
    writeln!(
        out,
        "::{}::[markdown]{}{{",
        escape(label),
        escape(&question.prompt)
    )
    .unwrap();

    let correct = question.correct_count();
    let incorrect = question.answers.len() - correct;
    for answer in &question.answers {
        out.push('\t');
        match question.kind {
            QuestionKind::MultipleChoice => {
                let weight = if answer.correct {
                    100.0 / to_f64(correct)
                } else {
                    -100.0 / to_f64(incorrect)
                };
                write!(out, "~%{}%", format_weight(weight)).unwrap();
            }
            QuestionKind::SingleChoice | QuestionKind::TrueFalse => {
                out.push(if answer.correct { '=' } else { '~' });
            }
            QuestionKind::ShortAnswer => out.push('='),
        }
        out.push_str(&escape(&answer.text));
        if let Some(feedback) = &answer.feedback {
            write!(out, "#{}", escape(feedback)).unwrap();
        }
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(n: usize) -> f64 {
    n as f64
}

/// Format a weight with at most five decimals and no trailing zeros.
fn format_weight(weight: f64) -> String {
    let formatted = format!("{weight:.5}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Backslash-escape GIFT special characters.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '~' | '=' | '#' | '{' | '}' | ':' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use cw_model::{Answer, Section, Subsection};
    use pretty_assertions::assert_eq;

    use super::*;

    fn module_with(questions: Vec<Question>) -> Module {
        let mut module = Module::new("module1");
        let mut section = Section::new("1", "Intro");
        let mut sub = Subsection::new("1.1", "Quiz");
        sub.blocks.push(ContentBlock::Prose("ignored".to_owned()));
        sub.blocks
            .extend(questions.into_iter().map(ContentBlock::Question));
        section.subsections.push(sub);
        module.sections.push(section);
        module
    }

    #[test]
    fn test_single_choice_block() {
        let q = Question::new(QuestionKind::SingleChoice, "2+2=?")
            .with_answer(Answer::new("4", true).with_feedback("right"))
            .with_answer(Answer::new("3", false));
        assert_eq!(
            to_gift(&module_with(vec![q])),
            "$CATEGORY: $course$/module1 section 1.1\n\n::1.1 Q1::[markdown]2+2\\=?{\n\t=4#right\n\t~3\n}\n"
        );
    }

    #[test]
    fn test_blocks_in_order_separated_by_blank_line() {
        let a = Question::new(QuestionKind::SingleChoice, "A").with_answer(Answer::new("x", true));
        let b = Question::new(QuestionKind::SingleChoice, "B")
            .with_title("Named")
            .with_answer(Answer::new("y", true));
        let gift = to_gift(&module_with(vec![a, b]));
        assert_eq!(gift.matches("$CATEGORY:").count(), 2);
        let first = gift.find("::1.1 Q1::[markdown]A{").unwrap();
        let second = gift.find("::1.1 Named::[markdown]B{").unwrap();
        assert!(first < second);
        assert!(gift.contains("}\n\n$CATEGORY"));
    }

    #[test]
    fn test_multiple_choice_weights() {
        let q = Question::new(QuestionKind::MultipleChoice, "Primes")
            .with_answer(Answer::new("2", true))
            .with_answer(Answer::new("3", true))
            .with_answer(Answer::new("5", true))
            .with_answer(Answer::new("4", false));
        let gift = to_gift(&module_with(vec![q]));
        assert!(gift.contains("\t~%33.33333%2\n"));
        assert!(gift.contains("\t~%-100%4\n"));
    }

    #[test]
    fn test_short_answer() {
        let q = Question::new(QuestionKind::ShortAnswer, "Capital?")
            .with_answer(Answer::new("Paris", true))
            .with_answer(Answer::new("paris", true).with_feedback("lowercase ok"));
        let gift = to_gift(&module_with(vec![q]));
        assert!(gift.contains("\t=Paris\n\t=paris#lowercase ok\n"));
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape("a~b=c#d{e}f:g"), "a\\~b\\=c\\#d\\{e\\}f\\:g");
    }

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(50.0), "50");
        assert_eq!(format_weight(100.0 / 3.0), "33.33333");
        assert_eq!(format_weight(-12.5), "-12.5");
    }

    #[test]
    fn test_no_questions() {
        let mut module = Module::new("module1");
        module.sections.push(Section::new("1", "Empty"));
        assert_eq!(to_gift(&module), "");
    }
}
