use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    response::Redirect,
    Form,
};
use color_eyre::eyre::eyre;

use super::{form_error, query_error, MemberForm, SiteError};
use crate::{
    domain::{MemberAPIError, MemberId},
    AppState,
};

/// Deletes the member named by the `id` form field, falling back to the
/// `id` query parameter. Unknown ids are ignored.
#[tracing::instrument(name = "Delete member form handler", skip_all)]
pub async fn delete_member(
    State(state): State<AppState>,
    query: Result<Query<MemberForm>, QueryRejection>,
    form: Result<Form<MemberForm>, FormRejection>,
) -> Result<Redirect, SiteError> {
    let Query(query) = query.map_err(query_error)?;
    let form = match form {
        Ok(Form(form)) => form,
        // A bare POST with only a query string carries no form body.
        Err(FormRejection::InvalidFormContentType(_)) => MemberForm::default(),
        Err(e) => return Err(form_error(e)),
    };

    let id = form.id.filter(|id| !id.trim().is_empty()).or(query.id);
    let member_id = MemberId::parse(id.as_deref().unwrap_or_default())?;

    state
        .member_store
        .delete_member(&member_id)
        .await
        .map_err(|e| MemberAPIError::UnexpectedError(eyre!(e)))?;
    tracing::debug!("deleted member {}", member_id);

    Ok(Redirect::to("/"))
}
