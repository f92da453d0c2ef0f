use axum::{
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{Member, MemberAPIError, MemberName, ValidationError},
    AppState,
};

mod delete_member;
mod get_member;
mod list_members;
mod new_member;
mod update_member;

pub use delete_member::delete_member;
pub use get_member::get_member;
pub use list_members::list_members;
pub use new_member::new_member;
pub use update_member::update_member;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/members/", get(list_members))
        .route(
            "/api/member/",
            post(new_member)
                .get(missing_member_id)
                .put(missing_member_id)
                .delete(missing_member_id),
        )
        .route(
            "/api/member/:id",
            get(get_member).put(update_member).delete(delete_member),
        )
}

#[tracing::instrument(name = "Missing member ID route handler", skip_all)]
async fn missing_member_id() -> MemberAPIError {
    MemberAPIError::ValidationError(ValidationError::new(
        "missing or empty id field in request".to_string(),
    ))
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "registration", skip_serializing_if = "Option::is_none")]
    pub registration_time: Option<DateTime<Utc>>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id.to_string(),
            name: member.name.as_ref().to_owned(),
            registration_time: member.registration_time,
        }
    }
}

/// Body accepted by create and update. Any `id` the client sends is ignored.
#[derive(Debug, Deserialize)]
pub struct MemberRequest {
    pub name: Option<String>,
}

fn body_error(e: impl std::fmt::Display) -> ValidationError {
    ValidationError::new(format!("failed to parse JSON body with error {e}"))
}

// Derived `Deserialize` also accepts a sequence for a struct, so the body
// must be checked to be an object before it is decoded.
fn parse_member_request(body: &[u8]) -> Result<MemberName, ValidationError> {
    let value: Value = serde_json::from_slice(body).map_err(body_error)?;
    if !value.is_object() {
        return Err(body_error("expected a JSON object"));
    }
    let request: MemberRequest =
        serde_json::from_value(value).map_err(body_error)?;
    MemberName::parse(request.name.unwrap_or_default())
}
