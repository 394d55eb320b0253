//! Server-rendered HTML pages for the user workflows.
//!
//! Pages are assembled from string fragments; every user-supplied value
//! passes through [`escape`] before it reaches the markup.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, ContentType};

use crate::domain::{EMAIL_MAX, NAME_MAX, User, UserField, UserValidationError};

/// Escape text for use in HTML element content and quoted attributes.
///
/// # Examples
/// ```
/// use userbook::inbound::http::pages::escape;
///
/// assert_eq!(escape("<b>\"Tom\" & 'Jerry'</b>"),
///     "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
/// ```
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Wrap rendered markup in an HTML response with the given status.
#[must_use]
pub fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .insert_header((CACHE_CONTROL, "no-store"))
        .body(body)
}

fn layout(title: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<main>\n{content}</main>\n</body>\n</html>\n",
        title = escape(title),
    )
}

/// The user list at `/`.
#[must_use]
pub fn index_page(users: &[User]) -> String {
    let mut content = String::from("<h1>Users</h1>\n<p><a href=\"/add\">Add user</a></p>\n");
    if users.is_empty() {
        content.push_str("<p class=\"empty\">No users yet.</p>\n");
        return layout("Users", &content);
    }

    content.push_str(
        "<table>\n<thead><tr><th>ID</th><th>Name</th><th>Email</th><th></th></tr></thead>\n<tbody>\n",
    );
    content.extend(users.iter().map(user_row));
    content.push_str("</tbody>\n</table>\n");
    layout("Users", &content)
}

fn user_row(user: &User) -> String {
    let id = user.id();
    format!(
        "<tr><td>{id}</td><td>{name}</td><td>{email}</td>\
         <td><a href=\"/edit/{id}\">Edit</a> <a href=\"/delete/{id}\">Delete</a></td></tr>\n",
        name = escape(user.name().as_ref()),
        email = escape(user.email().as_ref()),
    )
}

/// Per-field messages shown next to form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    name: Option<String>,
    email: Option<String>,
}

impl FieldErrors {
    /// Attach `message` to `field`, keeping the first message per field.
    pub fn push(&mut self, field: UserField, message: impl Into<String>) {
        let slot = match field {
            UserField::Name => &mut self.name,
            UserField::Email => &mut self.email,
            UserField::Id => return,
        };
        if slot.is_none() {
            *slot = Some(message.into());
        }
    }

    /// Message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: UserField) -> Option<&str> {
        match field {
            UserField::Name => self.name.as_deref(),
            UserField::Email => self.email.as_deref(),
            UserField::Id => None,
        }
    }
}

impl From<&[UserValidationError]> for FieldErrors {
    fn from(errors: &[UserValidationError]) -> Self {
        let mut out = Self::default();
        for error in errors {
            out.push(error.field(), error.to_string());
        }
        out
    }
}

/// Everything needed to render the add or edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFormView {
    heading: String,
    action: String,
    submit_label: &'static str,
    name: String,
    email: String,
    errors: FieldErrors,
}

impl UserFormView {
    /// Empty form posting to `/add`.
    #[must_use]
    pub fn create() -> Self {
        Self {
            heading: "Add user".to_owned(),
            action: "/add".to_owned(),
            submit_label: "Create",
            name: String::new(),
            email: String::new(),
            errors: FieldErrors::default(),
        }
    }

    /// Form posting to `/edit/{id}`, pre-filled from the stored user.
    #[must_use]
    pub fn edit(user: &User) -> Self {
        Self {
            heading: format!("Edit user {}", user.id()),
            action: format!("/edit/{}", user.id()),
            submit_label: "Save",
            name: user.name().to_string(),
            email: user.email().to_string(),
            errors: FieldErrors::default(),
        }
    }

    /// Replace the field values with what the client submitted.
    #[must_use]
    pub fn with_values(mut self, name: &str, email: &str) -> Self {
        name.clone_into(&mut self.name);
        email.clone_into(&mut self.email);
        self
    }

    /// Attach validation or conflict messages.
    #[must_use]
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }
}

fn input_row(
    label: &str,
    field: UserField,
    input_type: &str,
    value: &str,
    max: usize,
    errors: &FieldErrors,
) -> String {
    let name = field.as_str();
    let mut row = format!(
        "<p><label for=\"{name}\">{label}</label>\n\
         <input id=\"{name}\" name=\"{name}\" type=\"{input_type}\" maxlength=\"{max}\" \
         value=\"{value}\" required>\n",
        value = escape(value),
    );
    if let Some(message) = errors.get(field) {
        row.push_str(&format!(
            "<span class=\"error\">{}</span>\n",
            escape(message)
        ));
    }
    row.push_str("</p>\n");
    row
}

/// The add or edit form.
#[must_use]
pub fn user_form_page(view: &UserFormView) -> String {
    let name_row = input_row(
        "Name",
        UserField::Name,
        "text",
        &view.name,
        NAME_MAX,
        &view.errors,
    );
    let email_row = input_row(
        "Email",
        UserField::Email,
        "email",
        &view.email,
        EMAIL_MAX,
        &view.errors,
    );
    let content = format!(
        "<h1>{heading}</h1>\n<form method=\"post\" action=\"{action}\">\n\
         {name_row}{email_row}\
         <p><button type=\"submit\">{submit}</button> <a href=\"/\">Cancel</a></p>\n</form>\n",
        heading = escape(&view.heading),
        action = escape(&view.action),
        submit = view.submit_label,
    );
    layout(&view.heading, &content)
}

/// Confirmation shown by `GET /delete/{id}`; submitting it performs the delete.
#[must_use]
pub fn confirm_delete_page(user: &User) -> String {
    let id = user.id();
    let content = format!(
        "<h1>Delete user {id}</h1>\n\
         <p>Delete {name} &lt;{email}&gt;? This cannot be undone.</p>\n\
         <form method=\"post\" action=\"/delete/{id}\">\n\
         <p><button type=\"submit\">Delete</button> <a href=\"/\">Cancel</a></p>\n</form>\n",
        name = escape(user.name().as_ref()),
        email = escape(user.email().as_ref()),
    );
    layout("Delete user", &content)
}

/// Generic error page.
#[must_use]
pub fn error_page(status: StatusCode, message: &str, trace_id: Option<&str>) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let mut content = format!(
        "<h1>{code} {title}</h1>\n<p>{message}</p>\n",
        code = status.as_u16(),
        title = escape(title),
        message = escape(message),
    );
    if let Some(id) = trace_id {
        content.push_str(&format!(
            "<p class=\"trace\">Trace ID: <code>{}</code></p>\n",
            escape(id)
        ));
    }
    content.push_str("<p><a href=\"/\">Back to users</a></p>\n");
    layout(title, &content)
}
