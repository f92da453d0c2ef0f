use std::collections::BTreeMap;

use super::{Member, MemberId, MemberName};
use color_eyre::eyre::Report;
use thiserror::Error;

/// Persistence contract for member records.
///
/// Every call runs in its own transaction. `update_member` and
/// `remove_member` perform their existence check inside the same write
/// transaction as the mutation, so callers never need a separate
/// check-then-act sequence.
#[async_trait::async_trait]
pub trait MemberStore {
    /// All decodable records keyed by id. Malformed entries are skipped.
    async fn list_members(
        &self,
    ) -> Result<BTreeMap<String, Member>, MemberStoreError>;
    async fn get_member(
        &self,
        id: &MemberId,
    ) -> Result<Option<Member>, MemberStoreError>;
    async fn member_exists(&self, id: &MemberId)
        -> Result<bool, MemberStoreError>;
    /// Insert or overwrite the record stored under `member.id`.
    async fn put_member(&self, member: &Member) -> Result<(), MemberStoreError>;
    /// Removes the record if present. Absent ids are not an error.
    async fn delete_member(&self, id: &MemberId) -> Result<(), MemberStoreError>;
    /// Renames an existing record. Never creates one.
    async fn update_member(
        &self,
        id: &MemberId,
        name: MemberName,
    ) -> Result<Member, MemberStoreError>;
    /// Removes an existing record and returns it.
    async fn remove_member(
        &self,
        id: &MemberId,
    ) -> Result<Member, MemberStoreError>;
}

#[derive(Debug, Error)]
pub enum MemberStoreError {
    #[error("Member not found")]
    MemberNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for MemberStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::MemberNotFound, Self::MemberNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}
