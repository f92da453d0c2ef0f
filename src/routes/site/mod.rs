use askama::Template;
use axum::{
    extract::rejection::{FormRejection, QueryRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::{
    domain::{Member, MemberAPIError, ValidationError},
    AppState,
};

mod delete_member;
mod index;
mod new_member;
mod update_member;

pub use delete_member::delete_member;
pub use index::index;
pub use new_member::new_member;
pub use update_member::update_member;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/new", post(new_member))
        .route("/update", post(update_member))
        .route("/delete", post(delete_member))
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub members: Vec<MemberView>,
    pub selected: Option<MemberView>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub code: u16,
    pub message: String,
}

/// Display-ready member for the templates.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberView {
    pub id: String,
    pub name: String,
    pub registered: String,
}

impl From<Member> for MemberView {
    fn from(member: Member) -> Self {
        Self {
            id: member.id.to_string(),
            name: member.name.as_ref().to_owned(),
            registered: member
                .registration_time
                .map(|time| time.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Form fields and query parameters shared by the site handlers.
#[derive(Debug, Default, Deserialize)]
pub struct MemberForm {
    pub id: Option<String>,
    pub name: Option<String>,
}

fn render<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to render template");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page")
                .into_response()
        }
    }
}

/// Failure on the HTML side, shown through the error template.
#[derive(Debug)]
pub struct SiteError(MemberAPIError);

impl<E> From<E> for SiteError
where
    E: Into<MemberAPIError>,
{
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let (status, message) = self.0.status_and_message();
        render(
            status,
            &ErrorTemplate {
                code: status.as_u16(),
                message,
            },
        )
    }
}

fn form_error(e: FormRejection) -> SiteError {
    SiteError::from(ValidationError::new(format!(
        "failed to parse form with error {e}"
    )))
}

fn query_error(e: QueryRejection) -> SiteError {
    SiteError::from(ValidationError::new(format!(
        "failed to parse query with error {e}"
    )))
}
