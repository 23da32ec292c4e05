use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// Core survey data, as stored in the database.
///
/// A survey is one fillable instance of its group's questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyCore {
    /// The group this survey belongs to.
    pub group_id: Id,
    /// Human-readable name.
    pub name: String,
    /// When the survey was created.
    pub created_at: DateTime<Utc>,
}

impl SurveyCore {
    /// A fresh survey for the given group.
    pub fn new(group_id: Id, name: String) -> Self {
        Self {
            group_id,
            name,
            created_at: Utc::now(),
        }
    }
}

/// A survey without an ID.
pub type NewSurvey = SurveyCore;

/// A survey from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub survey: SurveyCore,
}

impl Deref for Survey {
    type Target = SurveyCore;

    fn deref(&self) -> &Self::Target {
        &self.survey
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Survey {
        pub fn example(group_id: Id) -> Self {
            Self {
                id: Id::new(),
                survey: SurveyCore::new(group_id, "Module feedback".to_string()),
            }
        }
    }
}
