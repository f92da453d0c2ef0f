use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use color_eyre::eyre::eyre;

use crate::{
    domain::{MemberAPIError, MemberId, MemberStoreError},
    AppState,
};

#[tracing::instrument(name = "Delete member route handler", skip_all)]
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, MemberAPIError> {
    let member_id = MemberId::parse(&id)?;

    let removed = state
        .member_store
        .remove_member(&member_id)
        .await
        .map_err(|e| match e {
            MemberStoreError::MemberNotFound => {
                MemberAPIError::MemberNotFound(member_id.clone())
            }
            e => MemberAPIError::UnexpectedError(eyre!(e)),
        })?;
    tracing::debug!("deleted member {}", removed.id);

    Ok(StatusCode::NO_CONTENT)
}
