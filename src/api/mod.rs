use rocket::{response::Redirect, Catcher, Route};
use rocket_dyn_templates::{context, Template};

mod admin;
mod auth;
mod respondent;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(admin::routes());
    routes.extend(auth::routes());
    routes.extend(respondent::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers![unauthorized, not_found]
}

/// The two ways a form POST can resolve: a redirect on success, or a
/// re-rendered page on validation failure.
#[derive(Responder)]
pub enum FormResponse {
    Redirect(Redirect),
    Page(Template),
}

#[catch(401)]
fn unauthorized() -> Redirect {
    Redirect::to(uri!(auth::login_page))
}

#[catch(404)]
fn not_found() -> Template {
    Template::render("not_found", context! {})
}
