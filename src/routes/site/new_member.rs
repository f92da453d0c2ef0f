use axum::{
    extract::{rejection::FormRejection, State},
    response::Redirect,
    Form,
};
use color_eyre::eyre::eyre;

use super::{form_error, MemberForm, SiteError};
use crate::{
    domain::{Member, MemberAPIError, MemberName},
    AppState,
};

#[tracing::instrument(name = "New member form handler", skip_all)]
pub async fn new_member(
    State(state): State<AppState>,
    form: Result<Form<MemberForm>, FormRejection>,
) -> Result<Redirect, SiteError> {
    let Form(form) = form.map_err(form_error)?;
    let member = Member::new(MemberName::parse(form.name.unwrap_or_default())?);

    state
        .member_store
        .put_member(&member)
        .await
        .map_err(|e| MemberAPIError::UnexpectedError(eyre!(e)))?;
    tracing::debug!("created member {}", member.id);

    Ok(Redirect::to("/"))
}
