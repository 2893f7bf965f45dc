//! Quiz question extraction.
//!
//! Two source forms are accepted:
//!
//! ~~~text
//! {{Q: 2+2=? | *4 # right | 3}}
//!
//! ```quiz
//! ::Sum:: 2+2=?
//! * 4 # right
//! - 3
//! ```
//! ~~~
//!
//! Each answer starts with an optional marker: `*` or `+` marks a correct
//! answer, `-`, `~` or no marker an incorrect one, and `=` an accepted
//! answer (short-answer when every answer uses it). Feedback follows an
//! unescaped `#`. `\|`, `\#` and a backslash before a marker escape them.

use cw_model::{Answer, Question, QuestionError, QuestionKind};

use crate::fence::{FenceLine, FenceTracker};

const INLINE_OPEN: &str = "{{Q:";
const INLINE_CLOSE: &str = "}}";

/// Words recognized as true/false answer candidates.
const BOOLEAN_WORDS: &[&str] = &["true", "false", "vrai", "faux"];

/// Error extracting a question from quiz source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("not a quiz block")]
    Unrecognized,
    #[error("invalid question: {0}")]
    Invalid(#[from] QuestionError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    Correct,
    Incorrect,
    Accepted,
}

struct RawAnswer {
    marker: Marker,
    text: String,
    feedback: Option<String>,
}

/// Extract a question from raw quiz source (inline line or fenced block).
///
/// The returned question always satisfies [`Question::validate`].
pub fn extract_question(source: &str) -> Result<Question, QuizError> {
    let trimmed = source.trim();
    let (prompt, answers) = if let Some(body) = inline_body(trimmed) {
        split_inline(body)
    } else if let Some(lines) = fenced_body(trimmed) {
        split_fenced(&lines)
    } else {
        return Err(QuizError::Unrecognized);
    };

    let (title, prompt) = split_title(&unescape(prompt.trim()));
    let answers: Vec<RawAnswer> = answers
        .into_iter()
        .map(parse_answer)
        .filter(|a| !a.text.is_empty())
        .collect();

    let question = Question {
        kind: infer_kind(&answers),
        title,
        prompt,
        answers: answers
            .into_iter()
            .map(|raw| Answer {
                text: raw.text,
                correct: raw.marker != Marker::Incorrect,
                feedback: raw.feedback,
            })
            .collect(),
    };
    question.validate()?;
    Ok(question)
}

fn inline_body(source: &str) -> Option<&str> {
    source.strip_prefix(INLINE_OPEN)?.strip_suffix(INLINE_CLOSE)
}

/// Lines between the opening and closing fence (closing fence optional).
fn fenced_body(source: &str) -> Option<Vec<&str>> {
    let mut lines = source.lines();
    let mut tracker = FenceTracker::new();
    let FenceLine::Open(_) = tracker.update(lines.next()?) else {
        return None;
    };
    Some(
        lines
            .take_while(|line| tracker.update(line) != FenceLine::Close)
            .collect(),
    )
}

fn split_inline(body: &str) -> (&str, Vec<&str>) {
    let mut parts = split_unescaped(body, '|').into_iter();
    let prompt = parts.next().unwrap_or_default();
    (prompt, parts.collect())
}

/// First non-blank line is the prompt, each following non-blank line an answer.
fn split_fenced<'a>(lines: &[&'a str]) -> (&'a str, Vec<&'a str>) {
    let mut lines = lines.iter().copied().filter(|l| !l.trim().is_empty());
    let prompt = lines.next().unwrap_or_default();
    (prompt, lines.collect())
}

/// Split `::title::rest` into a title and the prompt proper.
fn split_title(prompt: &str) -> (Option<String>, String) {
    if let Some(rest) = prompt.strip_prefix("::")
        && let Some((title, rest)) = rest.split_once("::")
    {
        let title = title.trim();
        let title = (!title.is_empty()).then(|| title.to_owned());
        return (title, rest.trim().to_owned());
    }
    (None, prompt.to_owned())
}

fn parse_answer(raw: &str) -> RawAnswer {
    let raw = raw.trim();
    let (marker, rest) = match raw.chars().next() {
        Some('*' | '+') => (Marker::Correct, &raw[1..]),
        Some('=') => (Marker::Accepted, &raw[1..]),
        Some('-' | '~') => (Marker::Incorrect, &raw[1..]),
        Some('\\') if raw[1..].starts_with(['*', '+', '=', '-', '~']) => {
            (Marker::Incorrect, &raw[1..])
        }
        _ => (Marker::Incorrect, raw),
    };

    let (text, feedback) = match find_unescaped(rest, '#') {
        Some(pos) => (&rest[..pos], Some(unescape(rest[pos + 1..].trim()))),
        None => (rest, None),
    };

    RawAnswer {
        marker,
        text: unescape(text.trim()),
        feedback: feedback.filter(|f| !f.is_empty()),
    }
}

fn infer_kind(answers: &[RawAnswer]) -> QuestionKind {
    if !answers.is_empty() && answers.iter().all(|a| a.marker == Marker::Accepted) {
        return QuestionKind::ShortAnswer;
    }

    let correct = answers.iter().filter(|a| a.marker != Marker::Incorrect).count();
    let boolean = answers.len() == 2
        && answers
            .iter()
            .all(|a| BOOLEAN_WORDS.contains(&a.text.to_lowercase().as_str()));

    if boolean && correct == 1 {
        QuestionKind::TrueFalse
    } else if correct > 1 {
        QuestionKind::MultipleChoice
    } else {
        QuestionKind::SingleChoice
    }
}

/// Byte offset of the first occurrence of `ch` not preceded by a backslash.
fn find_unescaped(text: &str, ch: char) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == ch {
            return Some(i);
        }
    }
    None
}

fn split_unescaped(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some(pos) = find_unescaped(rest, sep) {
        parts.push(&rest[..pos]);
        rest = &rest[pos + sep.len_utf8()..];
    }
    parts.push(rest);
    parts
}

/// Drop the backslash in front of quiz separators and markers.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && matches!(next, '|' | '#' | '\\' | '*' | '+' | '=' | '-' | '~')
        {
            out.push(next);
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_inline_single_choice() {
        let q = extract_question("{{Q: 2+2=? | *4 | 3}}").unwrap();
        assert_eq!(q.kind, QuestionKind::SingleChoice);
        assert_eq!(q.prompt, "2+2=?");
        assert_eq!(
            q.answers,
            vec![Answer::new("4", true), Answer::new("3", false)]
        );
    }

    #[test]
    fn test_inline_feedback_and_title() {
        let q = extract_question("{{Q: ::Sum:: 2+2=? | *4 # right | -3 # no}}").unwrap();
        assert_eq!(q.title.as_deref(), Some("Sum"));
        assert_eq!(q.prompt, "2+2=?");
        assert_eq!(q.answers[0].feedback.as_deref(), Some("right"));
        assert_eq!(q.answers[1].feedback.as_deref(), Some("no"));
        assert!(!q.answers[1].correct);
    }

    #[test]
    fn test_escaped_separators() {
        let q = extract_question(r"{{Q: a \| b? | *C\# | D \| E # why \# not}}").unwrap();
        assert_eq!(q.prompt, "a | b?");
        assert_eq!(q.answers[0].text, "C#");
        assert_eq!(q.answers[1].text, "D | E");
        assert_eq!(q.answers[1].feedback.as_deref(), Some("why # not"));
    }

    #[test]
    fn test_escaped_marker_is_answer_text() {
        let q = extract_question(r"{{Q: Sign? | \-1 | *+1}}").unwrap();
        assert_eq!(q.answers[0].text, "-1");
        assert!(!q.answers[0].correct);
        assert_eq!(q.answers[1].text, "+1");
        assert!(q.answers[1].correct);
    }

    #[test]
    fn test_multiple_choice() {
        let q = extract_question("{{Q: Primes? | *2 | +3 | 4}}").unwrap();
        assert_eq!(q.kind, QuestionKind::MultipleChoice);
        assert_eq!(q.correct_count(), 2);
    }

    #[test]
    fn test_true_false() {
        let q = extract_question("{{Q: The sky is blue | *Vrai | Faux}}").unwrap();
        assert_eq!(q.kind, QuestionKind::TrueFalse);
        assert_eq!(q.answers.len(), 2);
    }

    #[test]
    fn test_true_false_needs_one_correct() {
        let q = extract_question("{{Q: Both? | *true | *false}}").unwrap();
        assert_eq!(q.kind, QuestionKind::MultipleChoice);
    }

    #[test]
    fn test_short_answer() {
        let q = extract_question("{{Q: Capital of France? | =Paris | =paris}}").unwrap();
        assert_eq!(q.kind, QuestionKind::ShortAnswer);
        assert!(q.answers.iter().all(|a| a.correct));
    }

    #[test]
    fn test_equals_counts_as_correct_in_choice() {
        let q = extract_question("{{Q: Pick | =a | b}}").unwrap();
        assert_eq!(q.kind, QuestionKind::SingleChoice);
        assert!(q.answers[0].correct);
    }

    #[test]
    fn test_fenced_form() {
        let source = "```quiz\n::Sum:: 2+2=?\n\n* 4 # right\n- 3\n5\n```";
        let q = extract_question(source).unwrap();
        assert_eq!(q.title.as_deref(), Some("Sum"));
        assert_eq!(q.prompt, "2+2=?");
        assert_eq!(q.answers.len(), 3);
        assert!(q.answers[0].correct);
        assert!(!q.answers[2].correct);
    }

    #[test]
    fn test_fenced_without_closing_fence() {
        let q = extract_question("~~~comprehension\nPick\n*a\nb").unwrap();
        assert_eq!(q.answers.len(), 2);
    }

    #[test]
    fn test_no_correct_answer_rejected() {
        let err = extract_question("{{Q: 2+2=? | 5 | 3}}").unwrap_err();
        assert_eq!(err, QuizError::Invalid(QuestionError::NoCorrectAnswer));
    }

    #[test]
    fn test_no_answers_rejected() {
        let err = extract_question("{{Q: lonely prompt}}").unwrap_err();
        assert_eq!(err, QuizError::Invalid(QuestionError::NoAnswers));
        let err = extract_question("{{Q: | *a}}").unwrap_err();
        assert_eq!(err, QuizError::Invalid(QuestionError::EmptyPrompt));
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(extract_question("plain text"), Err(QuizError::Unrecognized));
    }
}
