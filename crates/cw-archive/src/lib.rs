//! Learning-platform archive exporters.
//!
//! - [`ImsExporter`]: IMS Common Cartridge 1.1 zip (web content pages, QTI
//!   assessments, web links)
//! - [`EdxExporter`]: Open edX OLX course tarball rooted at `course/`
//!
//! Both read a compiled [`cw_model::Module`] plus its [`cw_model::MediaSet`]
//! and return the archive bytes with the warnings raised while mapping
//! content to the target schema. Questions the target cannot express are
//! skipped with a [`cw_model::Warning`]; the rest of the archive is still
//! produced.

mod boilerplate;
mod edx;
mod error;
mod ims;
mod items;
mod package;
mod xml;

use cw_model::{Question, QuestionKind, Warning};

pub use boilerplate::Boilerplate;
pub use edx::EdxExporter;
pub use error::ArchiveError;
pub use ims::ImsExporter;
pub use package::{Package, TarGzPackage, ZipPackage};

/// Language recorded in archive metadata when the module declares none.
pub const DEFAULT_LANGUAGE: &str = "fr";

/// Archive bytes and mapping warnings.
#[derive(Clone, Debug, Default)]
pub struct ArchiveOutput {
    pub bytes: Vec<u8>,
    pub warnings: Vec<Warning>,
}

/// Check a question before mapping it to an archive schema.
///
/// Single-choice and true/false items need exactly one correct answer.
fn check_question(question: &Question) -> Result<(), String> {
    question.validate().map_err(|e| e.to_string())?;
    match question.kind {
        QuestionKind::SingleChoice | QuestionKind::TrueFalse if question.correct_count() != 1 => {
            Err(format!(
                "single-answer question has {} correct answers",
                question.correct_count()
            ))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use cw_model::Answer;

    use super::*;

    #[test]
    fn test_check_question() {
        let ok = Question::new(QuestionKind::SingleChoice, "q")
            .with_answer(Answer::new("a", true))
            .with_answer(Answer::new("b", false));
        assert!(check_question(&ok).is_ok());

        let two_correct = Question::new(QuestionKind::SingleChoice, "q")
            .with_answer(Answer::new("a", true))
            .with_answer(Answer::new("b", true));
        assert_eq!(
            check_question(&two_correct).unwrap_err(),
            "single-answer question has 2 correct answers"
        );

        let empty = Question::new(QuestionKind::MultipleChoice, "q");
        assert!(check_question(&empty).is_err());
    }
}
