use mongodb::bson::doc;
use rocket::{
    form::Form,
    http::{Cookie, CookieJar},
    response::Redirect,
    Route, State,
};
use rocket_dyn_templates::{context, Template};

use crate::config::Config;
use crate::error::Result;
use crate::model::{
    admin::{Admin, AdminCredentials},
    auth::{AuthToken, AUTH_TOKEN_COOKIE},
    mongodb::Coll,
    pagination::PaginationRequest,
};

use super::FormResponse;

pub fn routes() -> Vec<Route> {
    routes![login_page, login, logout]
}

#[get("/admin/login")]
fn login_page() -> Template {
    Template::render("login", context! { error: Option::<String>::None })
}

#[post("/admin/login", data = "<credentials>")]
async fn login(
    credentials: Form<AdminCredentials>,
    cookies: &CookieJar<'_>,
    admins: Coll<Admin>,
    config: &State<Config>,
) -> Result<FormResponse> {
    let with_username = doc! {
        "username": &credentials.username,
    };

    let admin = admins
        .find_one(with_username, None)
        .await?
        .filter(|admin| admin.verify_password(&credentials.password));

    match admin {
        Some(admin) => {
            let token = AuthToken::new(&admin);
            cookies.add(token.into_cookie(config));
            Ok(FormResponse::Redirect(Redirect::to(uri!(
                super::admin::surveygroup_list(PaginationRequest::default())
            ))))
        }
        None => Ok(FormResponse::Page(Template::render(
            "login",
            context! { error: "Unrecognised username and password combination" },
        ))),
    }
}

#[post("/admin/logout")]
fn logout(cookies: &CookieJar<'_>) -> Redirect {
    cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
    Redirect::to(uri!(login_page))
}
