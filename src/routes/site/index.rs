use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::Response,
};
use color_eyre::eyre::eyre;

use super::{
    query_error, render, IndexTemplate, MemberForm, MemberView, SiteError,
};
use crate::{domain::MemberAPIError, AppState};

#[tracing::instrument(name = "Member listing page handler", skip_all)]
pub async fn index(
    State(state): State<AppState>,
    query: Result<Query<MemberForm>, QueryRejection>,
) -> Result<Response, SiteError> {
    let Query(query) = query.map_err(query_error)?;

    let members = state
        .member_store
        .list_members()
        .await
        .map_err(|e| MemberAPIError::UnexpectedError(eyre!(e)))?;

    // An unknown id just leaves the edit form empty.
    let selected = query
        .id
        .as_deref()
        .map(str::trim)
        .and_then(|id| members.get(id).cloned())
        .map(MemberView::from);

    let mut members: Vec<_> =
        members.into_values().map(MemberView::from).collect();
    members.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    Ok(render(StatusCode::OK, &IndexTemplate { members, selected }))
}
