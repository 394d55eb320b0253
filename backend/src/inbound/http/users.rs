//! User workflow handlers.
//!
//! ```text
//! GET  /              list users
//! GET  /add           empty form        POST /add          create
//! GET  /edit/{id}     pre-filled form   POST /edit/{id}    update
//! GET  /delete/{id}   confirmation      POST /delete/{id}  delete
//! ```
//!
//! Successful writes answer `303 See Other` pointing back at `/`. Invalid
//! input re-renders the form with `400`, a taken email with `409`.

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::error::UrlencodedError;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;

use super::pages::{self, FieldErrors, UserFormView};
use super::state::HttpState;
use crate::domain::{Error, ErrorCode, User, UserDraft, UserField, UserId};
use crate::inbound::http::ApiResult;

/// Form body for `POST /add` and `POST /edit/{id}`.
///
/// Missing fields deserialize as empty strings so they surface as
/// validation messages rather than extractor errors.
#[derive(Debug, Default, Deserialize)]
pub struct UserForm {
    /// Submitted display name, untrimmed.
    #[serde(default)]
    pub name: String,
    /// Submitted email address, untrimmed.
    #[serde(default)]
    pub email: String,
}

fn unreadable_form(cause: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("form submission could not be read: {cause}"))
}

/// Reject a body the form extractor cannot decode.
fn form_rejection(err: UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    unreadable_form(err).into()
}

/// Recover the domain error produced by [`form_rejection`].
fn form_error(err: &actix_web::Error) -> Error {
    err.as_error::<Error>()
        .cloned()
        .unwrap_or_else(|| unreadable_form(err))
}

fn parse_id(raw: &str) -> Result<UserId, Error> {
    raw.parse::<UserId>()
        .map_err(|_| Error::not_found(format!("user {raw} does not exist")))
}

fn see_other_home() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, "/"))
        .finish()
}

fn form_response(status: StatusCode, view: &UserFormView) -> HttpResponse {
    pages::html(status, pages::user_form_page(view))
}

/// Turn a conflict into form feedback; other failures propagate.
fn conflict_errors(error: Error) -> Result<FieldErrors, Error> {
    if error.code() != ErrorCode::Conflict {
        return Err(error);
    }
    let field = match error.field() {
        Some("name") => UserField::Name,
        _ => UserField::Email,
    };
    let mut errors = FieldErrors::default();
    errors.push(field, error.message());
    Ok(errors)
}

/// Validate submitted values, or the view to re-render with messages.
fn validate(form: &UserForm, view: UserFormView) -> Result<UserDraft, Box<UserFormView>> {
    UserDraft::try_from_parts(&form.name, &form.email).map_err(|errors| {
        Box::new(
            view.with_values(&form.name, &form.email)
                .with_errors(FieldErrors::from(errors.as_slice())),
        )
    })
}

/// List every user.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use userbook::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// # let _ = app;
/// ```
#[get("/")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let users = state.users.list_users().await?;
    Ok(pages::html(StatusCode::OK, pages::index_page(&users)))
}

/// Show the empty add form.
#[get("/add")]
pub async fn add_form() -> HttpResponse {
    form_response(StatusCode::OK, &UserFormView::create())
}

/// Create a user from the submitted form.
#[post("/add")]
pub async fn add_user(
    state: web::Data<HttpState>,
    form: web::Form<UserForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let draft = match validate(&form, UserFormView::create()) {
        Ok(draft) => draft,
        Err(view) => return Ok(form_response(StatusCode::BAD_REQUEST, &view)),
    };

    match state.commands.create_user(draft).await {
        Ok(_) => Ok(see_other_home()),
        Err(error) => {
            let errors = conflict_errors(error)?;
            let view = UserFormView::create()
                .with_values(&form.name, &form.email)
                .with_errors(errors);
            Ok(form_response(StatusCode::CONFLICT, &view))
        }
    }
}

async fn load_user(state: &HttpState, raw_id: &str) -> ApiResult<User> {
    let id = parse_id(raw_id)?;
    state.users.find_user(id).await
}

/// Show the edit form pre-filled with the stored values.
#[get("/edit/{id}")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = load_user(&state, &path).await?;
    Ok(form_response(StatusCode::OK, &UserFormView::edit(&user)))
}

/// Overwrite a user's name and email.
#[post("/edit/{id}")]
pub async fn edit_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    form: Result<web::Form<UserForm>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    // An unknown id takes precedence over an unreadable body.
    let user = load_user(&state, &path).await?;
    let form = form.map_err(|err| form_error(&err))?.into_inner();
    let draft = match validate(&form, UserFormView::edit(&user)) {
        Ok(draft) => draft,
        Err(view) => return Ok(form_response(StatusCode::BAD_REQUEST, &view)),
    };

    match state.commands.update_user(user.id(), draft).await {
        Ok(_) => Ok(see_other_home()),
        Err(error) => {
            let errors = conflict_errors(error)?;
            let view = UserFormView::edit(&user)
                .with_values(&form.name, &form.email)
                .with_errors(errors);
            Ok(form_response(StatusCode::CONFLICT, &view))
        }
    }
}

/// Ask for confirmation before deleting.
#[get("/delete/{id}")]
pub async fn confirm_delete(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = load_user(&state, &path).await?;
    Ok(pages::html(StatusCode::OK, pages::confirm_delete_page(&user)))
}

/// Permanently remove a user.
#[post("/delete/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    state.commands.delete_user(id).await?;
    Ok(see_other_home())
}

/// Register every user workflow route.
///
/// Undecodable form bodies render as the HTML `400` page.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(form_rejection))
        .service(list_users)
        .service(add_form)
        .service(add_user)
        .service(edit_form)
        .service(edit_user)
        .service(confirm_delete)
        .service(delete_user);
}
