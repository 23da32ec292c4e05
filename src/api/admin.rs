use std::collections::HashMap;

use mongodb::{bson::doc, options::FindOptions, Client};
use rocket::{form::Form, futures::TryStreamExt, response::Redirect, Route, State};
use rocket_dyn_templates::{context, Template};

use crate::error::{Error, Result};
use crate::forms::{
    group::{self, GroupFormContext, QuestionFormSet, QuestionRow, ANOTHER_FIELD},
    FormErrors,
};
use crate::model::{
    admin::Admin,
    auth::AuthToken,
    group::{NewSurveyGroup, SurveyGroup},
    mongodb::{Coll, Id},
    pagination::PaginationRequest,
    question::{NewQuestion, Question},
    survey::{NewSurvey, Survey},
    view::{GroupView, QuestionView, SurveyView},
};

use super::FormResponse;

pub fn routes() -> Vec<Route> {
    routes![
        surveygroup_list,
        new_survey_group,
        create_survey_group,
        edit_survey_group,
        update_survey_group,
        survey_list,
        new_survey,
        create_survey,
        survey_detail,
        question_list,
        question_detail,
    ]
}

#[get("/admin/groups?<pagination..>")]
async fn surveygroup_list(
    _token: AuthToken<Admin>,
    pagination: PaginationRequest,
    groups: Coll<SurveyGroup>,
) -> Result<Template> {
    let options = FindOptions::builder()
        .sort(doc! {"name": 1})
        .skip(pagination.skip())
        .limit(pagination.limit())
        .build();
    let group_page: Vec<GroupView> = groups
        .find(None, options)
        .await?
        .map_ok(|group| GroupView::from(&group))
        .try_collect()
        .await?;
    let total = groups.count_documents(None, None).await?;

    let page = pagination.to_paginated(total, group_page);
    Ok(Template::render("surveygroup_list", context! { page }))
}

#[get("/admin/groups/new")]
fn new_survey_group(_token: AuthToken<Admin>) -> Template {
    Template::render(
        "survey_form",
        context! { editing: false, form: GroupFormContext::bound(None, &[]) },
    )
}

#[post("/admin/groups/new", data = "<submission>")]
async fn create_survey_group(
    _token: AuthToken<Admin>,
    submission: Form<HashMap<String, String>>,
    new_groups: Coll<NewSurveyGroup>,
    questions: Coll<NewQuestion>,
    db_client: &State<Client>,
) -> Result<FormResponse> {
    let (group, formset) = match parse_submission(&submission) {
        Ok(parsed) => parsed,
        Err(errors) => return Ok(render_again(&submission, &errors, false)),
    };

    // Create the group and its questions atomically. The group is inserted
    // first so the new questions can reference its id.
    let group_id = {
        let mut session = db_client.start_session(None).await?;
        session.start_transaction(None).await?;

        let group_id: Id = new_groups
            .insert_one_with_session(&group, None, &mut session)
            .await?
            .inserted_id
            .as_object_id()
            .unwrap() // Valid because the ID comes directly from the DB
            .into();

        let new_questions = formset
            .rows
            .iter()
            .filter_map(|row| match row {
                QuestionRow::Keep { prompt, kind, .. } => Some(NewQuestion {
                    group_id,
                    prompt: prompt.clone(),
                    kind: *kind,
                }),
                QuestionRow::Delete { .. } => None,
            })
            .collect::<Vec<_>>();
        if !new_questions.is_empty() {
            questions
                .insert_many_with_session(&new_questions, None, &mut session)
                .await?;
        }

        session.commit_transaction().await?;
        group_id
    };

    Ok(FormResponse::Redirect(after_save(&submission, group_id)))
}

#[get("/admin/groups/<group_id>/edit")]
async fn edit_survey_group(
    _token: AuthToken<Admin>,
    group_id: Id,
    groups: Coll<SurveyGroup>,
    questions: Coll<Question>,
) -> Result<Template> {
    let group = group_by_id(group_id, &groups).await?;
    let group_questions = questions_for_group(group_id, &questions).await?;
    Ok(Template::render(
        "survey_form",
        context! {
            editing: true,
            form: GroupFormContext::bound(Some(&group), &group_questions),
        },
    ))
}

#[post("/admin/groups/<group_id>/edit", data = "<submission>")]
async fn update_survey_group(
    _token: AuthToken<Admin>,
    group_id: Id,
    submission: Form<HashMap<String, String>>,
    groups: Coll<SurveyGroup>,
    new_groups: Coll<NewSurveyGroup>,
    questions: Coll<Question>,
    db_client: &State<Client>,
) -> Result<FormResponse> {
    // 404 before validation, matching the GET handler.
    group_by_id(group_id, &groups).await?;

    let (group, formset) = match parse_submission(&submission) {
        Ok(parsed) => parsed,
        Err(errors) => return Ok(render_again(&submission, &errors, true)),
    };

    // Apply the group fields and every question row atomically.
    {
        let mut session = db_client.start_session(None).await?;
        session.start_transaction(None).await?;

        new_groups
            .replace_one_with_session(group_id.as_doc(), &group, None, &mut session)
            .await?;

        for row in &formset.rows {
            match row {
                QuestionRow::Keep {
                    id: Some(question_id),
                    prompt,
                    kind,
                } => {
                    let update = doc! {
                        "$set": {
                            "prompt": prompt.as_str(),
                            "kind": *kind,
                        }
                    };
                    questions
                        .update_one_with_session(question_id.as_doc(), update, None, &mut session)
                        .await?;
                }
                QuestionRow::Keep {
                    id: None,
                    prompt,
                    kind,
                } => {
                    let question = NewQuestion {
                        group_id,
                        prompt: prompt.clone(),
                        kind: *kind,
                    };
                    questions
                        .clone_with_type::<NewQuestion>()
                        .insert_one_with_session(&question, None, &mut session)
                        .await?;
                }
                QuestionRow::Delete { id } => {
                    questions
                        .delete_one_with_session(id.as_doc(), None, &mut session)
                        .await?;
                }
            }
        }

        session.commit_transaction().await?;
    }

    Ok(FormResponse::Redirect(after_save(&submission, group_id)))
}

#[get("/admin/groups/<group_id>/surveys?<pagination..>")]
async fn survey_list(
    _token: AuthToken<Admin>,
    group_id: Id,
    pagination: PaginationRequest,
    groups: Coll<SurveyGroup>,
    surveys: Coll<Survey>,
) -> Result<Template> {
    let group = group_by_id(group_id, &groups).await?;

    let filter = doc! {"group_id": group_id};
    let options = FindOptions::builder()
        .sort(doc! {"created_at": 1})
        .skip(pagination.skip())
        .limit(pagination.limit())
        .build();
    let survey_page: Vec<SurveyView> = surveys
        .find(filter.clone(), options)
        .await?
        .map_ok(|survey| SurveyView::from(&survey))
        .try_collect()
        .await?;
    let total = surveys.count_documents(filter, None).await?;

    Ok(Template::render(
        "survey_list",
        context! {
            group: GroupView::from(&group),
            page: pagination.to_paginated(total, survey_page),
        },
    ))
}

#[get("/admin/groups/<group_id>/surveys/new")]
async fn new_survey(
    _token: AuthToken<Admin>,
    group_id: Id,
    groups: Coll<SurveyGroup>,
) -> Result<Template> {
    let group = group_by_id(group_id, &groups).await?;
    Ok(Template::render(
        "survey_new",
        context! {
            group: GroupView::from(&group),
            name: "",
            error: Option::<String>::None,
        },
    ))
}

#[post("/admin/groups/<group_id>/surveys/new", data = "<submission>")]
async fn create_survey(
    _token: AuthToken<Admin>,
    group_id: Id,
    submission: Form<HashMap<String, String>>,
    groups: Coll<SurveyGroup>,
    new_surveys: Coll<NewSurvey>,
) -> Result<FormResponse> {
    let group = group_by_id(group_id, &groups).await?;

    let name = submission.get("name").map(|v| v.trim()).unwrap_or("");
    if name.is_empty() {
        return Ok(FormResponse::Page(Template::render(
            "survey_new",
            context! {
                group: GroupView::from(&group),
                name,
                error: "This field is required",
            },
        )));
    }

    let survey = NewSurvey::new(group_id, name.to_string());
    new_surveys.insert_one(&survey, None).await?;

    Ok(FormResponse::Redirect(Redirect::to(uri!(survey_list(
        group_id,
        PaginationRequest::default()
    )))))
}

#[get("/admin/surveys/<survey_id>")]
async fn survey_detail(
    _token: AuthToken<Admin>,
    survey_id: Id,
    surveys: Coll<Survey>,
    groups: Coll<SurveyGroup>,
    questions: Coll<Question>,
) -> Result<Template> {
    let survey = surveys
        .find_one(survey_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Survey with ID '{survey_id}'")))?;
    let group = group_by_id(survey.group_id, &groups).await?;
    let group_questions = questions_for_group(survey.group_id, &questions).await?;

    Ok(Template::render(
        "survey_detail",
        context! {
            survey: SurveyView::from(&survey),
            group: GroupView::from(&group),
            questions: group_questions.iter().map(QuestionView::from).collect::<Vec<_>>(),
        },
    ))
}

#[get("/admin/groups/<group_id>/questions?<pagination..>")]
async fn question_list(
    _token: AuthToken<Admin>,
    group_id: Id,
    pagination: PaginationRequest,
    groups: Coll<SurveyGroup>,
    questions: Coll<Question>,
) -> Result<Template> {
    let group = group_by_id(group_id, &groups).await?;

    let filter = doc! {"group_id": group_id};
    let options = FindOptions::builder()
        .sort(doc! {"_id": 1})
        .skip(pagination.skip())
        .limit(pagination.limit())
        .build();
    let question_page: Vec<QuestionView> = questions
        .find(filter.clone(), options)
        .await?
        .map_ok(|question| QuestionView::from(&question))
        .try_collect()
        .await?;
    let total = questions.count_documents(filter, None).await?;

    Ok(Template::render(
        "question_list",
        context! {
            group: GroupView::from(&group),
            page: pagination.to_paginated(total, question_page),
        },
    ))
}

#[get("/admin/questions/<question_id>")]
async fn question_detail(
    _token: AuthToken<Admin>,
    question_id: Id,
    questions: Coll<Question>,
    groups: Coll<SurveyGroup>,
) -> Result<Template> {
    let question = questions
        .find_one(question_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Question with ID '{question_id}'")))?;
    let group = group_by_id(question.group_id, &groups).await?;

    Ok(Template::render(
        "question_detail",
        context! {
            question: QuestionView::from(&question),
            group: GroupView::from(&group),
        },
    ))
}

/// Look up a survey group, 404 if absent.
async fn group_by_id(group_id: Id, groups: &Coll<SurveyGroup>) -> Result<SurveyGroup> {
    groups
        .find_one(group_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Survey group with ID '{group_id}'")))
}

/// A group's questions in insertion order.
async fn questions_for_group(group_id: Id, questions: &Coll<Question>) -> Result<Vec<Question>> {
    let options = FindOptions::builder().sort(doc! {"_id": 1}).build();
    Ok(questions
        .find(doc! {"group_id": group_id}, options)
        .await?
        .try_collect()
        .await?)
}

/// Validate both halves of the combined payload, merging their errors.
fn parse_submission(
    data: &HashMap<String, String>,
) -> std::result::Result<(NewSurveyGroup, QuestionFormSet), FormErrors> {
    match (group::parse_group(data), group::parse_formset(data)) {
        (Ok(group), Ok(formset)) => Ok((group, formset)),
        (group_result, formset_result) => {
            let mut errors = FormErrors::new();
            if let Err(e) = group_result {
                errors.merge(e);
            }
            if let Err(e) = formset_result {
                errors.merge(e);
            }
            Err(errors)
        }
    }
}

/// Re-render the combined form with the submitted values and their errors.
fn render_again(data: &HashMap<String, String>, errors: &FormErrors, editing: bool) -> FormResponse {
    FormResponse::Page(Template::render(
        "survey_form",
        context! { editing, form: GroupFormContext::from_submission(data, errors) },
    ))
}

/// Where to go after a successful save: back into the editor if the
/// "another" control was used, otherwise to the group list.
fn after_save(data: &HashMap<String, String>, group_id: Id) -> Redirect {
    if data.contains_key(ANOTHER_FIELD) {
        Redirect::to(uri!(edit_survey_group(group_id)))
    } else {
        Redirect::to(uri!(surveygroup_list(PaginationRequest::default())))
    }
}
