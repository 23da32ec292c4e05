use std::collections::HashMap;

use serde::Serialize;

use crate::model::{
    answer::{AnswerValue, NewAnswer},
    mongodb::Id,
    question::{Question, QuestionKind},
};

use super::FormErrors;

/// A single input field, mirroring one question.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// The form field name the value is submitted under.
    pub name: String,
    pub question_id: Id,
    pub prompt: String,
    pub kind: QuestionKind,
}

/// A validation form built at request time from a survey's current questions.
///
/// Char questions render as required text inputs; boolean questions render as
/// checkboxes, whose absence from the payload decodes to `false`.
#[derive(Debug)]
pub struct SurveyForm {
    fields: Vec<FieldDescriptor>,
}

impl SurveyForm {
    /// Build the field descriptors for the given questions, in order.
    pub fn for_questions(questions: &[Question]) -> Self {
        let fields = questions
            .iter()
            .map(|question| FieldDescriptor {
                name: format!("question-{}", question.id),
                question_id: question.id,
                prompt: question.prompt.clone(),
                kind: question.kind,
            })
            .collect();
        Self { fields }
    }

    /// Validate a submitted key-value mapping against the descriptor list.
    ///
    /// Unknown keys are ignored. Returns every typed value, or the full set
    /// of field errors; there is no partial success.
    pub fn validate(
        &self,
        data: &HashMap<String, String>,
    ) -> Result<Vec<SubmittedAnswer>, FormErrors> {
        let mut errors = FormErrors::new();
        let mut values = Vec::with_capacity(self.fields.len());

        for field in &self.fields {
            match field.kind {
                QuestionKind::Boolean => {
                    let checked = data.get(&field.name).map_or(false, |v| checkbox_on(v));
                    values.push(SubmittedAnswer {
                        question_id: field.question_id,
                        value: AnswerValue::Boolean(checked),
                    });
                }
                QuestionKind::Char => {
                    match data.get(&field.name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                        Some(text) => values.push(SubmittedAnswer {
                            question_id: field.question_id,
                            value: AnswerValue::Char(text.to_string()),
                        }),
                        None => errors.add_field(&field.name, "This field is required"),
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }

    /// Template context for this form, echoing submitted data and errors.
    pub fn context(&self, data: &HashMap<String, String>, errors: &FormErrors) -> SurveyFormContext {
        let fields = self
            .fields
            .iter()
            .map(|field| FieldContext {
                name: field.name.clone(),
                prompt: field.prompt.clone(),
                kind: field.kind.as_str(),
                value: data.get(&field.name).cloned().unwrap_or_default(),
                checked: data.get(&field.name).map_or(false, |v| checkbox_on(v)),
                error: errors.field(&field.name).map(str::to_string),
            })
            .collect();
        SurveyFormContext { fields }
    }
}

/// How browsers encode a ticked checkbox.
fn checkbox_on(value: &str) -> bool {
    matches!(value, "on" | "true" | "1")
}

/// One typed value produced by successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedAnswer {
    pub question_id: Id,
    pub value: AnswerValue,
}

impl SubmittedAnswer {
    /// Tie this value to the survey it was submitted against.
    pub fn into_answer(self, survey_id: Id) -> NewAnswer {
        NewAnswer {
            survey_id,
            question_id: self.question_id,
            value: self.value,
        }
    }
}

/// Template-facing rendering of a [`SurveyForm`].
#[derive(Debug, Serialize)]
pub struct SurveyFormContext {
    pub fields: Vec<FieldContext>,
}

#[derive(Debug, Serialize)]
pub struct FieldContext {
    pub name: String,
    pub prompt: String,
    pub kind: &'static str,
    pub value: String,
    pub checked: bool,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_questions() -> Vec<Question> {
        let group_id = Id::new();
        vec![
            Question::char_example(group_id),
            Question::boolean_example(group_id),
        ]
    }

    fn submission(entries: Vec<(String, &str)>) -> HashMap<String, String> {
        entries
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect()
    }

    #[test]
    fn one_field_per_question() {
        let questions = example_questions();
        let form = SurveyForm::for_questions(&questions);
        assert_eq!(form.fields.len(), 2);
        assert_eq!(form.fields[0].kind, QuestionKind::Char);
        assert_eq!(form.fields[1].kind, QuestionKind::Boolean);
        assert_eq!(form.fields[0].name, format!("question-{}", questions[0].id));
    }

    #[test]
    fn a_complete_submission_yields_one_value_per_question() {
        let questions = example_questions();
        let form = SurveyForm::for_questions(&questions);

        let data = submission(vec![
            (format!("question-{}", questions[0].id), "The lectures"),
            (format!("question-{}", questions[1].id), "on"),
        ]);
        let values = form.validate(&data).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(
            values[0].value,
            AnswerValue::Char("The lectures".to_string())
        );
        assert_eq!(values[1].value, AnswerValue::Boolean(true));
    }

    #[test]
    fn an_absent_checkbox_decodes_to_false() {
        let questions = example_questions();
        let form = SurveyForm::for_questions(&questions);

        // Browsers omit unticked checkboxes entirely.
        let data = submission(vec![(format!("question-{}", questions[0].id), "The labs")]);
        let values = form.validate(&data).unwrap();
        assert_eq!(values[1].value, AnswerValue::Boolean(false));
    }

    #[test]
    fn a_missing_text_answer_fails_validation() {
        let questions = example_questions();
        let form = SurveyForm::for_questions(&questions);

        let data = submission(vec![(format!("question-{}", questions[1].id), "on")]);
        let errors = form.validate(&data).unwrap_err();
        assert_eq!(
            errors.field(&format!("question-{}", questions[0].id)),
            Some("This field is required")
        );
    }

    #[test]
    fn a_whitespace_only_text_answer_fails_validation() {
        let questions = example_questions();
        let form = SurveyForm::for_questions(&questions);

        let data = submission(vec![(format!("question-{}", questions[0].id), "   ")]);
        assert!(form.validate(&data).is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let questions = example_questions();
        let form = SurveyForm::for_questions(&questions);

        let data = submission(vec![
            (format!("question-{}", questions[0].id), "Everything"),
            ("question-000000000000000000000000".to_string(), "spoofed"),
        ]);
        let values = form.validate(&data).unwrap();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn submitted_values_bind_to_the_survey() {
        let questions = example_questions();
        let survey_id = Id::new();
        let form = SurveyForm::for_questions(&questions);

        let data = submission(vec![(format!("question-{}", questions[0].id), "Everything")]);
        let answers: Vec<NewAnswer> = form
            .validate(&data)
            .unwrap()
            .into_iter()
            .map(|value| value.into_answer(survey_id))
            .collect();
        assert_eq!(answers.len(), 2);
        assert!(answers.iter().all(|answer| answer.survey_id == survey_id));
        assert_eq!(answers[0].question_id, questions[0].id);
    }

    #[test]
    fn the_context_echoes_submitted_data_and_errors() {
        let questions = example_questions();
        let form = SurveyForm::for_questions(&questions);
        let char_field = format!("question-{}", questions[0].id);

        let data = submission(vec![
            (char_field.clone(), ""),
            (format!("question-{}", questions[1].id), "on"),
        ]);
        let errors = form.validate(&data).unwrap_err();
        let context = form.context(&data, &errors);

        assert_eq!(context.fields.len(), 2);
        assert!(context.fields[0].error.is_some());
        assert!(context.fields[1].checked);
    }
}
