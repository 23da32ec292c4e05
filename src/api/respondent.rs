use std::collections::HashMap;

use chrono::Utc;
use mongodb::{bson::doc, options::FindOptions};
use rocket::{form::Form, futures::TryStreamExt, response::Redirect, Route};
use rocket_dyn_templates::{context, Template};

use crate::error::{Error, Result};
use crate::forms::{survey::SurveyForm, FormErrors};
use crate::model::{
    answer::NewAnswer,
    group::{SurveyGroup, WindowState},
    mongodb::{Coll, Id},
    question::Question,
    survey::Survey,
    view::SurveyView,
};

use super::FormResponse;

pub fn routes() -> Vec<Route> {
    routes![survey, submit_survey, survey_thanks]
}

#[get("/surveys/<survey_id>?<redirect>")]
async fn survey(
    survey_id: Id,
    redirect: Option<String>,
    surveys: Coll<Survey>,
    groups: Coll<SurveyGroup>,
    questions: Coll<Question>,
) -> Result<Template> {
    let (survey, group, group_questions) =
        load_survey(survey_id, &surveys, &groups, &questions).await?;

    if let Some(page) = window_error(&group) {
        return Ok(page);
    }

    let form = SurveyForm::for_questions(&group_questions);
    Ok(render_survey(
        &survey,
        &form,
        &HashMap::new(),
        &FormErrors::new(),
        redirect,
    ))
}

#[post("/surveys/<survey_id>?<redirect>", data = "<submission>")]
async fn submit_survey(
    survey_id: Id,
    redirect: Option<String>,
    submission: Form<HashMap<String, String>>,
    surveys: Coll<Survey>,
    groups: Coll<SurveyGroup>,
    questions: Coll<Question>,
    answers: Coll<NewAnswer>,
) -> Result<FormResponse> {
    let (survey, group, group_questions) =
        load_survey(survey_id, &surveys, &groups, &questions).await?;

    // The window is checked per request; no answers are accepted outside it.
    if let Some(page) = window_error(&group) {
        return Ok(FormResponse::Page(page));
    }

    let form = SurveyForm::for_questions(&group_questions);
    match form.validate(&submission) {
        Ok(values) => {
            let new_answers: Vec<NewAnswer> = values
                .into_iter()
                .map(|value| value.into_answer(survey.id))
                .collect();
            if !new_answers.is_empty() {
                answers.insert_many(&new_answers, None).await?;
            }

            let target = redirect.unwrap_or_else(|| uri!(survey_thanks).to_string());
            Ok(FormResponse::Redirect(Redirect::to(target)))
        }
        Err(errors) => Ok(FormResponse::Page(render_survey(
            &survey,
            &form,
            &submission,
            &errors,
            redirect,
        ))),
    }
}

#[get("/thanks")]
fn survey_thanks() -> Template {
    Template::render("survey_thanks", context! {})
}

/// Load a survey, its owning group, and the group's current questions.
async fn load_survey(
    survey_id: Id,
    surveys: &Coll<Survey>,
    groups: &Coll<SurveyGroup>,
    questions: &Coll<Question>,
) -> Result<(Survey, SurveyGroup, Vec<Question>)> {
    let survey = surveys
        .find_one(survey_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Survey with ID '{survey_id}'")))?;

    let group = groups
        .find_one(survey.group_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Survey group with ID '{}'", survey.group_id)))?;

    let options = FindOptions::builder().sort(doc! {"_id": 1}).build();
    let group_questions = questions
        .find(doc! {"group_id": survey.group_id}, options)
        .await?
        .try_collect()
        .await?;

    Ok((survey, group, group_questions))
}

/// The error page for a survey outside its availability window, if any.
fn window_error(group: &SurveyGroup) -> Option<Template> {
    let today = Utc::now().date_naive();
    let message = match group.window_state(today) {
        WindowState::NotStarted => "Survey hasn't started yet",
        WindowState::Ended => "Survey has ended",
        WindowState::Open => return None,
    };
    Some(Template::render("survey_error", context! { message }))
}

fn render_survey(
    survey: &Survey,
    form: &SurveyForm,
    data: &HashMap<String, String>,
    errors: &FormErrors,
    redirect: Option<String>,
) -> Template {
    Template::render(
        "survey",
        context! {
            survey: SurveyView::from(survey),
            form: form.context(data, errors),
            redirect,
        },
    )
}
