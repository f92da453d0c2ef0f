use axum::{
    extract::{rejection::FormRejection, State},
    response::Redirect,
    Form,
};
use color_eyre::eyre::eyre;

use super::{form_error, MemberForm, SiteError};
use crate::{
    domain::{MemberAPIError, MemberId, MemberName, MemberStoreError},
    AppState,
};

#[tracing::instrument(name = "Update member form handler", skip_all)]
pub async fn update_member(
    State(state): State<AppState>,
    form: Result<Form<MemberForm>, FormRejection>,
) -> Result<Redirect, SiteError> {
    let Form(form) = form.map_err(form_error)?;
    let member_id = MemberId::parse(form.id.as_deref().unwrap_or_default())?;

    let exists = state
        .member_store
        .member_exists(&member_id)
        .await
        .map_err(|e| MemberAPIError::UnexpectedError(eyre!(e)))?;
    if !exists {
        return Err(MemberAPIError::MemberNotFound(member_id).into());
    }

    let member_name = MemberName::parse(form.name.unwrap_or_default())?;

    state
        .member_store
        .update_member(&member_id, member_name)
        .await
        .map_err(|e| match e {
            MemberStoreError::MemberNotFound => {
                MemberAPIError::MemberNotFound(member_id.clone())
            }
            e => MemberAPIError::UnexpectedError(eyre!(e)),
        })?;

    Ok(Redirect::to("/"))
}
