use axum::extract::{Path, State};
use color_eyre::eyre::eyre;

use crate::{
    domain::{MemberAPIError, MemberId},
    AppState, Envelope,
};

#[tracing::instrument(name = "Get member route handler", skip_all)]
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope, MemberAPIError> {
    let member_id = MemberId::parse(&id)?;
    tracing::debug!("member_id: {}", member_id);

    let member = state
        .member_store
        .get_member(&member_id)
        .await
        .map_err(|e| MemberAPIError::UnexpectedError(eyre!(e)))?;
    let member = member.ok_or(MemberAPIError::MemberNotFound(member_id))?;

    Ok(Envelope::with_members([member]))
}
