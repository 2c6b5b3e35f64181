// ============================
// crates/backend-lib/src/views.rs
// ============================
//! Server-rendered HTML pages.
//!
//! Every dynamic value goes through `escape_html` at render time.
use crate::validation::{escape_html, FieldError};
use axum::http::StatusCode;
use clubhouse_common::UserProfile;
use std::fmt::Write as _;

const TITLE: &str = "Clubhouse";

/// Values echoed back into the sign-up form. The password is never echoed.
#[derive(Debug, Default, Clone)]
pub struct SignUpPage {
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub errors: Vec<FieldError>,
}

fn layout(heading: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} | {heading}</title>\n</head>\n<body>\n<h1>{heading}</h1>\n{body}</body>\n</html>\n",
        title = TITLE,
        heading = escape_html(heading),
    )
}

fn log_in_form(message: Option<&str>) -> String {
    let mut html = String::new();
    if let Some(message) = message {
        let _ = writeln!(html, "<p class=\"error\">{}</p>", escape_html(message));
    }
    html.push_str(
        "<form method=\"post\" action=\"/log-in\">\n\
         <label>Username <input name=\"username\" required></label>\n\
         <label>Password <input name=\"password\" type=\"password\" required></label>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n\
         <p><a href=\"/sign-up\">Sign up</a></p>\n",
    );
    html
}

/// The landing page, for a signed-in user or an anonymous visitor
pub fn index_page(user: Option<&UserProfile>) -> String {
    let body = match user {
        Some(user) => {
            let mut html = String::new();
            let _ = writeln!(
                html,
                "<p class=\"welcome\">Welcome back, {} {}</p>",
                escape_html(&user.first_name),
                escape_html(&user.last_name)
            );
            let _ = writeln!(
                html,
                "<dl class=\"profile\" data-user-id=\"{}\">\n\
                 <dt>Username</dt><dd class=\"username\">{}</dd>\n\
                 <dt>Membership</dt><dd class=\"membership\">{}</dd>\n\
                 <dt>Admin</dt><dd class=\"admin\">{}</dd>\n</dl>",
                user.id,
                escape_html(&user.username),
                escape_html(&user.membership),
                if user.admin { "yes" } else { "no" }
            );
            html.push_str(
                "<form method=\"post\" action=\"/log-out\">\
                 <button type=\"submit\">Log out</button></form>\n",
            );
            html
        },
        None => log_in_form(None),
    };
    layout("Home", &body)
}

/// The sign-up form, optionally with the previous submission and its errors
pub fn sign_up_page(page: &SignUpPage) -> String {
    let mut body = String::new();
    if !page.errors.is_empty() {
        body.push_str("<ul class=\"errors\">\n");
        for error in &page.errors {
            let _ = writeln!(
                body,
                "<li data-field=\"{}\">{}</li>",
                error.field,
                escape_html(&error.message)
            );
        }
        body.push_str("</ul>\n");
    }
    let _ = write!(
        body,
        "<form method=\"post\" action=\"/sign-up\">\n\
         <label>Username <input name=\"username\" value=\"{}\" required></label>\n\
         <label>Password <input name=\"password\" type=\"password\" required></label>\n\
         <label>First name <input name=\"firstname\" value=\"{}\" required></label>\n\
         <label>Last name <input name=\"lastname\" value=\"{}\" required></label>\n\
         <label>Membership <select name=\"membership\">\
         <option value=\"member\">Member</option>\
         <option value=\"guest\">Guest</option></select></label>\n\
         <label>Admin <select name=\"admin\">\
         <option value=\"false\">No</option>\
         <option value=\"true\">Yes</option></select></label>\n\
         <button type=\"submit\">Sign up</button>\n</form>\n",
        escape_html(&page.username),
        escape_html(&page.firstname),
        escape_html(&page.lastname),
    );
    layout("Sign up", &body)
}

/// Shown after a rejected log-in; deliberately does not say which part was wrong
pub fn log_in_failed_page() -> String {
    layout("Log in", &log_in_form(Some("Incorrect username or password")))
}

/// Generic error page
pub fn error_page(status: StatusCode, code: &str, message: &str) -> String {
    let body = format!(
        "<p class=\"error\" data-code=\"{}\">{}</p>\n<p><a href=\"/\">Back to the clubhouse</a></p>\n",
        escape_html(code),
        escape_html(message)
    );
    layout(status.canonical_reason().unwrap_or("Error"), &body)
}
