use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{
    group::{NewSurveyGroup, SurveyGroup},
    mongodb::Id,
    question::{Question, QuestionKind},
};

use super::FormErrors;

/// Number of blank extra question rows offered by the group form.
pub const EXTRA_QUESTION_ROWS: usize = 3;

/// Hidden field carrying the number of submitted question rows.
pub const TOTAL_ROWS_FIELD: &str = "questions-total";

/// The name of the submit control that requests a return to the edit form.
pub const ANOTHER_FIELD: &str = "another";

/// Form field name of the question row `index`'s `suffix` input.
pub fn row_field(index: usize, suffix: &str) -> String {
    format!("questions-{index}-{suffix}")
}

/// Parse and validate the survey group fields of a submitted payload.
pub fn parse_group(data: &HashMap<String, String>) -> Result<NewSurveyGroup, FormErrors> {
    let mut errors = FormErrors::new();

    let name = data.get("name").map(|v| v.trim()).unwrap_or("");
    if name.is_empty() {
        errors.add_field("name", "This field is required");
    }

    let start_date = parse_date(data, "start_date", &mut errors);
    let end_date = parse_date(data, "end_date", &mut errors);
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            errors.add_form("The start date must not be after the end date");
        }
    }

    if errors.is_empty() {
        // Unwraps safe: a missing date would have recorded an error.
        Ok(NewSurveyGroup {
            name: name.to_string(),
            start_date: start_date.unwrap(),
            end_date: end_date.unwrap(),
        })
    } else {
        Err(errors)
    }
}

fn parse_date(
    data: &HashMap<String, String>,
    field: &str,
    errors: &mut FormErrors,
) -> Option<NaiveDate> {
    match data.get(field).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => {
            errors.add_field(field, "This field is required");
            None
        }
        Some(raw) => match raw.parse::<NaiveDate>() {
            Ok(date) => Some(date),
            Err(_) => {
                errors.add_field(field, "Enter a date in YYYY-MM-DD format");
                None
            }
        },
    }
}

/// One submitted question row that survived validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionRow {
    /// A new (no id) or updated (id) question.
    Keep {
        id: Option<Id>,
        prompt: String,
        kind: QuestionKind,
    },
    /// An existing question whose prompt was cleared.
    Delete { id: Id },
}

/// The validated question rows submitted alongside their parent group.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct QuestionFormSet {
    pub rows: Vec<QuestionRow>,
}

/// Parse and validate the question rows of a submitted payload.
///
/// Fully blank rows are skipped; rows with any content require a non-empty
/// prompt and a recognised kind.
pub fn parse_formset(data: &HashMap<String, String>) -> Result<QuestionFormSet, FormErrors> {
    let mut errors = FormErrors::new();

    let total = match data.get(TOTAL_ROWS_FIELD).map(|v| v.trim().parse::<usize>()) {
        Some(Ok(total)) => total,
        _ => {
            errors.add_form("Submitted question rows were malformed");
            0
        }
    };

    let mut rows = Vec::new();
    for index in 0..total {
        let id = match data
            .get(&row_field(index, "id"))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
        {
            None => None,
            Some(raw) => match raw.parse::<Id>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add_form("Submitted question rows were malformed");
                    continue;
                }
            },
        };

        let prompt = data
            .get(&row_field(index, "prompt"))
            .map(|v| v.trim())
            .unwrap_or("");
        if prompt.is_empty() {
            // A cleared prompt on an existing question deletes it; a blank
            // extra row is simply skipped.
            if let Some(id) = id {
                rows.push(QuestionRow::Delete { id });
            }
            continue;
        }

        let kind = data
            .get(&row_field(index, "kind"))
            .map(|v| v.trim())
            .and_then(|v| v.parse::<QuestionKind>().ok());
        match kind {
            Some(kind) => rows.push(QuestionRow::Keep {
                id,
                prompt: prompt.to_string(),
                kind,
            }),
            None => errors.add_field(row_field(index, "kind"), "Choose an answer kind"),
        }
    }

    if errors.is_empty() {
        Ok(QuestionFormSet { rows })
    } else {
        Err(errors)
    }
}

/// Template-facing rendering of the combined group form and question formset.
#[derive(Debug, Serialize)]
pub struct GroupFormContext {
    pub name: String,
    pub name_error: Option<String>,
    pub start_date: String,
    pub start_date_error: Option<String>,
    pub end_date: String,
    pub end_date_error: Option<String>,
    pub form_errors: Vec<String>,
    pub rows: Vec<RowContext>,
    pub total_rows: usize,
}

#[derive(Debug, Serialize)]
pub struct RowContext {
    pub index: usize,
    pub id: String,
    pub prompt: String,
    pub kind: String,
    pub error: Option<String>,
}

impl RowContext {
    fn blank(index: usize) -> Self {
        Self {
            index,
            id: String::new(),
            prompt: String::new(),
            kind: QuestionKind::Char.as_str().to_string(),
            error: None,
        }
    }
}

impl GroupFormContext {
    /// A form bound to the given group (if editing) and its existing
    /// questions, plus the blank extra rows.
    pub fn bound(group: Option<&SurveyGroup>, questions: &[Question]) -> Self {
        let mut rows: Vec<RowContext> = questions
            .iter()
            .enumerate()
            .map(|(index, question)| RowContext {
                index,
                id: question.id.to_string(),
                prompt: question.prompt.clone(),
                kind: question.kind.as_str().to_string(),
                error: None,
            })
            .collect();
        for _ in 0..EXTRA_QUESTION_ROWS {
            rows.push(RowContext::blank(rows.len()));
        }

        let total_rows = rows.len();
        Self {
            name: group.map(|g| g.name.clone()).unwrap_or_default(),
            name_error: None,
            start_date: group.map(|g| g.start_date.to_string()).unwrap_or_default(),
            start_date_error: None,
            end_date: group.map(|g| g.end_date.to_string()).unwrap_or_default(),
            end_date_error: None,
            form_errors: Vec::new(),
            rows,
            total_rows,
        }
    }

    /// Re-render a submitted payload together with its validation errors.
    pub fn from_submission(data: &HashMap<String, String>, errors: &FormErrors) -> Self {
        let total_rows = data
            .get(TOTAL_ROWS_FIELD)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(EXTRA_QUESTION_ROWS);

        let rows = (0..total_rows)
            .map(|index| RowContext {
                index,
                id: data.get(&row_field(index, "id")).cloned().unwrap_or_default(),
                prompt: data
                    .get(&row_field(index, "prompt"))
                    .cloned()
                    .unwrap_or_default(),
                kind: data
                    .get(&row_field(index, "kind"))
                    .cloned()
                    .unwrap_or_else(|| QuestionKind::Char.as_str().to_string()),
                error: errors.field(&row_field(index, "kind")).map(str::to_string),
            })
            .collect();

        Self {
            name: data.get("name").cloned().unwrap_or_default(),
            name_error: errors.field("name").map(str::to_string),
            start_date: data.get("start_date").cloned().unwrap_or_default(),
            start_date_error: errors.field("start_date").map(str::to_string),
            end_date: data.get("end_date").cloned().unwrap_or_default(),
            end_date_error: errors.field("end_date").map(str::to_string),
            form_errors: errors.form_errors().to_vec(),
            rows,
            total_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(entries: Vec<(String, &str)>) -> HashMap<String, String> {
        entries
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect()
    }

    fn valid_group_fields() -> Vec<(String, &'static str)> {
        vec![
            ("name".to_string(), "Autumn teaching feedback"),
            ("start_date".to_string(), "2026-09-01"),
            ("end_date".to_string(), "2026-09-30"),
        ]
    }

    #[test]
    fn a_valid_group_parses() {
        let group = parse_group(&payload(valid_group_fields())).unwrap();
        assert_eq!(group.name, "Autumn teaching feedback");
        assert!(group.start_date < group.end_date);
    }

    #[test]
    fn a_blank_name_is_rejected() {
        let mut fields = valid_group_fields();
        fields[0].1 = "   ";
        let errors = parse_group(&payload(fields)).unwrap_err();
        assert_eq!(errors.field("name"), Some("This field is required"));
    }

    #[test]
    fn an_unparseable_date_is_rejected() {
        let mut fields = valid_group_fields();
        fields[1].1 = "01/09/2026";
        let errors = parse_group(&payload(fields)).unwrap_err();
        assert!(errors.field("start_date").is_some());
    }

    #[test]
    fn a_window_ending_before_it_starts_is_rejected() {
        let mut fields = valid_group_fields();
        fields[1].1 = "2026-10-01";
        let errors = parse_group(&payload(fields)).unwrap_err();
        assert_eq!(errors.form_errors().len(), 1);
    }

    #[test]
    fn filled_rows_parse_and_blank_rows_are_skipped() {
        let formset = parse_formset(&payload(vec![
            (TOTAL_ROWS_FIELD.to_string(), "3"),
            (row_field(0, "prompt"), "What did you enjoy most?"),
            (row_field(0, "kind"), "char"),
            (row_field(1, "prompt"), "Would you recommend this course?"),
            (row_field(1, "kind"), "boolean"),
            (row_field(2, "prompt"), ""),
            (row_field(2, "kind"), "char"),
        ]))
        .unwrap();

        assert_eq!(formset.rows.len(), 2);
        assert!(matches!(
            &formset.rows[0],
            QuestionRow::Keep { id: None, kind: QuestionKind::Char, .. }
        ));
        assert!(matches!(
            &formset.rows[1],
            QuestionRow::Keep { id: None, kind: QuestionKind::Boolean, .. }
        ));
    }

    #[test]
    fn a_row_with_an_unknown_kind_is_rejected() {
        let errors = parse_formset(&payload(vec![
            (TOTAL_ROWS_FIELD.to_string(), "1"),
            (row_field(0, "prompt"), "How many hours per week?"),
            (row_field(0, "kind"), "integer"),
        ]))
        .unwrap_err();
        assert!(errors.field(&row_field(0, "kind")).is_some());
    }

    #[test]
    fn a_cleared_prompt_deletes_the_existing_question() {
        let id = Id::new();
        let id_hex = id.to_string();
        let formset = parse_formset(&payload(vec![
            (TOTAL_ROWS_FIELD.to_string(), "1"),
            (row_field(0, "id"), id_hex.as_str()),
            (row_field(0, "prompt"), "  "),
            (row_field(0, "kind"), "char"),
        ]))
        .unwrap();
        assert_eq!(formset.rows, vec![QuestionRow::Delete { id }]);
    }

    #[test]
    fn a_missing_row_count_is_malformed() {
        let errors = parse_formset(&payload(vec![(row_field(0, "prompt"), "Orphaned row")]))
            .unwrap_err();
        assert_eq!(errors.form_errors().len(), 1);
    }

    #[test]
    fn a_bound_form_appends_the_extra_rows() {
        let group = SurveyGroup::current_example();
        let questions = vec![
            Question::char_example(group.id),
            Question::boolean_example(group.id),
        ];
        let context = GroupFormContext::bound(Some(&group), &questions);

        assert_eq!(context.total_rows, 2 + EXTRA_QUESTION_ROWS);
        assert_eq!(context.rows[0].prompt, questions[0].prompt);
        assert_eq!(context.rows[2].prompt, "");
        assert_eq!(context.name, group.name);
    }

    #[test]
    fn a_failed_submission_echoes_its_values() {
        let data = payload(vec![
            ("name".to_string(), ""),
            ("start_date".to_string(), "2026-09-01"),
            ("end_date".to_string(), "2026-09-30"),
            (TOTAL_ROWS_FIELD.to_string(), "1"),
            (row_field(0, "prompt"), "A question"),
            (row_field(0, "kind"), "integer"),
        ]);
        let mut errors = parse_group(&data).unwrap_err();
        errors.merge(parse_formset(&data).unwrap_err());

        let context = GroupFormContext::from_submission(&data, &errors);
        assert!(context.name_error.is_some());
        assert_eq!(context.start_date, "2026-09-01");
        assert_eq!(context.rows[0].prompt, "A question");
        assert!(context.rows[0].error.is_some());
    }
}
