use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;

use crate::domain::{
    Member, MemberId, MemberName, MemberStore, MemberStoreError,
};

/// Volatile store used by tests and throwaway runs. The lock only guards the
/// map; each call is atomic just like a redb transaction.
#[derive(Default)]
pub struct HashmapMemberStore {
    members: RwLock<HashMap<MemberId, Member>>,
}

#[async_trait::async_trait]
impl MemberStore for HashmapMemberStore {
    async fn list_members(
        &self,
    ) -> Result<BTreeMap<String, Member>, MemberStoreError> {
        Ok(self
            .members
            .read()
            .await
            .values()
            .map(|member| (member.id.to_string(), member.clone()))
            .collect())
    }

    async fn get_member(
        &self,
        id: &MemberId,
    ) -> Result<Option<Member>, MemberStoreError> {
        Ok(self.members.read().await.get(id).cloned())
    }

    async fn member_exists(
        &self,
        id: &MemberId,
    ) -> Result<bool, MemberStoreError> {
        Ok(self.members.read().await.contains_key(id))
    }

    async fn put_member(&self, member: &Member) -> Result<(), MemberStoreError> {
        self.members
            .write()
            .await
            .insert(member.id.clone(), member.clone());
        Ok(())
    }

    async fn delete_member(
        &self,
        id: &MemberId,
    ) -> Result<(), MemberStoreError> {
        self.members.write().await.remove(id);
        Ok(())
    }

    async fn update_member(
        &self,
        id: &MemberId,
        name: MemberName,
    ) -> Result<Member, MemberStoreError> {
        let mut members = self.members.write().await;
        let member = members
            .get_mut(id)
            .ok_or(MemberStoreError::MemberNotFound)?;
        member.name = name;
        Ok(member.clone())
    }

    async fn remove_member(
        &self,
        id: &MemberId,
    ) -> Result<Member, MemberStoreError> {
        self.members
            .write()
            .await
            .remove(id)
            .ok_or(MemberStoreError::MemberNotFound)
    }
}
