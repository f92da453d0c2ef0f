use axum::{body::Bytes, extract::State};
use color_eyre::eyre::eyre;

use super::parse_member_request;
use crate::{
    domain::{Member, MemberAPIError},
    AppState, Envelope,
};

#[tracing::instrument(name = "New member route handler", skip_all)]
pub async fn new_member(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Envelope, MemberAPIError> {
    let member_name = parse_member_request(&body)?;
    let member = Member::new(member_name);

    state
        .member_store
        .put_member(&member)
        .await
        .map_err(|e| MemberAPIError::UnexpectedError(eyre!(e)))?;
    tracing::debug!("created member {}", member.id);

    Ok(Envelope::with_members([member]))
}
