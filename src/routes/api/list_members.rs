use axum::extract::State;
use color_eyre::eyre::eyre;

use crate::{domain::MemberAPIError, AppState, Envelope};

#[tracing::instrument(name = "List members route handler", skip_all)]
pub async fn list_members(
    State(state): State<AppState>,
) -> Result<Envelope, MemberAPIError> {
    let members = state
        .member_store
        .list_members()
        .await
        .map_err(|e| MemberAPIError::UnexpectedError(eyre!(e)))?;
    tracing::debug!("listing {} members", members.len());

    Ok(Envelope::with_members(members.into_values()))
}
