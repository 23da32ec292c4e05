//! Template-facing views of the database types.
//!
//! The types in this module are serialised in a template-friendly way:
//! IDs as hex strings, dates in ISO format.

use serde::Serialize;

use crate::model::{group::SurveyGroup, question::Question, survey::Survey};

#[derive(Debug, Serialize)]
pub struct GroupView {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

impl From<&SurveyGroup> for GroupView {
    fn from(group: &SurveyGroup) -> Self {
        Self {
            id: group.id.to_string(),
            name: group.name.clone(),
            start_date: group.start_date.to_string(),
            end_date: group.end_date.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SurveyView {
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub created_at: String,
}

impl From<&Survey> for SurveyView {
    fn from(survey: &Survey) -> Self {
        Self {
            id: survey.id.to_string(),
            group_id: survey.group_id.to_string(),
            name: survey.name.clone(),
            created_at: survey.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub group_id: String,
    pub prompt: String,
    pub kind: &'static str,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.to_string(),
            group_id: question.group_id.to_string(),
            prompt: question.prompt.clone(),
            kind: question.kind.as_str(),
        }
    }
}
