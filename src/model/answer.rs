use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// A respondent's submitted value, tagged with the question kind that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    Boolean(bool),
    Char(String),
}

/// Core answer data, as stored in the database.
///
/// An answer links one survey and one question to one submitted value.
/// Answers are written once per respondent submission and never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerCore {
    /// The survey this answer was submitted against.
    pub survey_id: Id,
    /// The question this answer responds to.
    pub question_id: Id,
    /// The submitted value.
    #[serde(flatten)]
    pub value: AnswerValue,
}

/// An answer without an ID.
pub type NewAnswer = AnswerCore;

/// An answer from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub answer: AnswerCore,
}

impl Deref for Answer {
    type Target = AnswerCore;

    fn deref(&self) -> &Self::Target {
        &self.answer
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{doc, to_document};

    use super::*;

    #[test]
    fn values_serialise_with_their_kind_tag() {
        let answer = AnswerCore {
            survey_id: Id::new(),
            question_id: Id::new(),
            value: AnswerValue::Char("Plenty".to_string()),
        };
        let document = to_document(&answer).unwrap();
        assert_eq!(document.get_str("kind").unwrap(), "char");
        assert_eq!(document.get_str("value").unwrap(), "Plenty");

        let answer = AnswerCore {
            value: AnswerValue::Boolean(true),
            ..answer
        };
        let document = to_document(&answer).unwrap();
        assert_eq!(document.get_str("kind").unwrap(), "boolean");
        assert!(document.get_bool("value").unwrap());
    }
}
