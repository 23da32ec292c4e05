use std::ops::Deref;
use std::str::FromStr;

use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// The kind of answer a question expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// A yes/no checkbox.
    Boolean,
    /// A free-text input.
    Char,
}

impl QuestionKind {
    /// The form value and template name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Char => "char",
        }
    }
}

impl FromStr for QuestionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(Self::Boolean),
            "char" => Ok(Self::Char),
            _ => Err(()),
        }
    }
}

impl From<QuestionKind> for Bson {
    fn from(kind: QuestionKind) -> Self {
        to_bson(&kind).expect("Serialisation is infallible")
    }
}

/// Core question data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCore {
    /// The group this question belongs to.
    pub group_id: Id,
    /// Question text shown to the respondent.
    pub prompt: String,
    /// The kind of answer expected.
    pub kind: QuestionKind,
}

/// A question without an ID.
pub type NewQuestion = QuestionCore;

/// A question from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub question: QuestionCore,
}

impl Deref for Question {
    type Target = QuestionCore;

    fn deref(&self) -> &Self::Target {
        &self.question
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Question {
        pub fn char_example(group_id: Id) -> Self {
            Self {
                id: Id::new(),
                question: QuestionCore {
                    group_id,
                    prompt: "What did you enjoy most?".to_string(),
                    kind: QuestionKind::Char,
                },
            }
        }

        pub fn boolean_example(group_id: Id) -> Self {
            Self {
                id: Id::new(),
                question: QuestionCore {
                    group_id,
                    prompt: "Would you recommend this course?".to_string(),
                    kind: QuestionKind::Boolean,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_from_their_form_values() {
        assert_eq!("boolean".parse(), Ok(QuestionKind::Boolean));
        assert_eq!("char".parse(), Ok(QuestionKind::Char));
        assert!("integer".parse::<QuestionKind>().is_err());
    }

    #[test]
    fn kind_form_values_round_trip() {
        for kind in [QuestionKind::Boolean, QuestionKind::Char] {
            assert_eq!(kind.as_str().parse(), Ok(kind));
        }
    }
}
