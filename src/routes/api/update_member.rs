use axum::{
    body::Bytes,
    extract::{Path, State},
};
use color_eyre::eyre::eyre;

use super::parse_member_request;
use crate::{
    domain::{MemberAPIError, MemberId, MemberStoreError},
    AppState, Envelope,
};

#[tracing::instrument(name = "Update member route handler", skip_all)]
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Envelope, MemberAPIError> {
    let member_id = MemberId::parse(&id)?;

    // Unknown ids are reported before the body is looked at.
    let exists = state
        .member_store
        .member_exists(&member_id)
        .await
        .map_err(|e| MemberAPIError::UnexpectedError(eyre!(e)))?;
    if !exists {
        return Err(MemberAPIError::MemberNotFound(member_id));
    }

    let member_name = parse_member_request(&body)?;

    let member = state
        .member_store
        .update_member(&member_id, member_name)
        .await
        .map_err(|e| match e {
            MemberStoreError::MemberNotFound => {
                MemberAPIError::MemberNotFound(member_id.clone())
            }
            e => MemberAPIError::UnexpectedError(eyre!(e)),
        })?;

    Ok(Envelope::with_members([member]))
}
