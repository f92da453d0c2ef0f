use std::{collections::BTreeMap, path::Path, sync::Arc};

use color_eyre::eyre::{Report, Result, WrapErr};
use redb::{
    Database, ReadTransaction, ReadOnlyTable, ReadableTable, TableDefinition,
    TableError,
};

use crate::domain::{
    Member, MemberId, MemberName, MemberStore, MemberStoreError,
};

/// Member records keyed by id, stored as JSON.
const MEMBERS_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("members");

/// Single-file embedded store. redb calls block, so every operation runs on
/// the blocking pool inside its own transaction.
#[derive(Clone)]
pub struct RedbMemberStore {
    db: Arc<Database>,
}

impl RedbMemberStore {
    #[tracing::instrument(name = "Opening redb member store", skip_all)]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("failed to create directory {}", parent.display())
            })?;
        }

        let db = Database::create(path).wrap_err_with(|| {
            format!("failed to open database {}", path.display())
        })?;
        tracing::info!("opened member database at {}", path.display());

        Ok(Self { db: Arc::new(db) })
    }

    async fn run_blocking<T, F>(&self, operation: F) -> Result<T, MemberStoreError>
    where
        F: FnOnce(&Database) -> Result<T, MemberStoreError> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || operation(db.as_ref()))
            .await
            .map_err(unexpected)?
    }
}

fn unexpected<E>(e: E) -> MemberStoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    MemberStoreError::UnexpectedError(Report::new(e))
}

fn decode_member(bytes: &[u8]) -> Result<Member, MemberStoreError> {
    serde_json::from_slice(bytes).map_err(unexpected)
}

fn encode_member(member: &Member) -> Result<Vec<u8>, MemberStoreError> {
    serde_json::to_vec(member).map_err(unexpected)
}

/// `None` when nothing has been written yet and the table does not exist.
fn open_members_table(
    txn: &ReadTransaction,
) -> Result<Option<ReadOnlyTable<&'static str, &'static [u8]>>, MemberStoreError>
{
    match txn.open_table(MEMBERS_TABLE) {
        Ok(table) => Ok(Some(table)),
        Err(TableError::TableDoesNotExist(_)) => Ok(None),
        Err(e) => Err(unexpected(e)),
    }
}

#[async_trait::async_trait]
impl MemberStore for RedbMemberStore {
    #[tracing::instrument(name = "Listing members from redb", skip_all)]
    async fn list_members(
        &self,
    ) -> Result<BTreeMap<String, Member>, MemberStoreError> {
        self.run_blocking(|db| {
            let txn = db.begin_read().map_err(unexpected)?;
            let mut members = BTreeMap::new();
            let Some(table) = open_members_table(&txn)? else {
                return Ok(members);
            };

            for entry in table.iter().map_err(unexpected)? {
                let (key, value) = entry.map_err(unexpected)?;
                match decode_member(value.value()) {
                    Ok(member) => {
                        members.insert(member.id.to_string(), member);
                    }
                    Err(e) => {
                        tracing::warn!(
                            key = key.value(),
                            error = ?e,
                            "skipping malformed member record"
                        );
                    }
                }
            }
            Ok(members)
        })
        .await
    }

    #[tracing::instrument(name = "Getting member from redb", skip_all)]
    async fn get_member(
        &self,
        id: &MemberId,
    ) -> Result<Option<Member>, MemberStoreError> {
        let id = id.clone();
        self.run_blocking(move |db| {
            let txn = db.begin_read().map_err(unexpected)?;
            let Some(table) = open_members_table(&txn)? else {
                return Ok(None);
            };
            let value = table.get(id.as_ref()).map_err(unexpected)?;
            value.map(|bytes| decode_member(bytes.value())).transpose()
        })
        .await
    }

    #[tracing::instrument(name = "Checking member exists in redb", skip_all)]
    async fn member_exists(
        &self,
        id: &MemberId,
    ) -> Result<bool, MemberStoreError> {
        let id = id.clone();
        self.run_blocking(move |db| {
            let txn = db.begin_read().map_err(unexpected)?;
            let Some(table) = open_members_table(&txn)? else {
                return Ok(false);
            };
            let exists = table.get(id.as_ref()).map_err(unexpected)?.is_some();
            Ok(exists)
        })
        .await
    }

    #[tracing::instrument(name = "Putting member into redb", skip_all)]
    async fn put_member(&self, member: &Member) -> Result<(), MemberStoreError> {
        let id = member.id.clone();
        let bytes = encode_member(member)?;
        self.run_blocking(move |db| {
            let txn = db.begin_write().map_err(unexpected)?;
            {
                let mut table =
                    txn.open_table(MEMBERS_TABLE).map_err(unexpected)?;
                table
                    .insert(id.as_ref(), bytes.as_slice())
                    .map_err(unexpected)?;
            }
            txn.commit().map_err(unexpected)
        })
        .await
    }

    #[tracing::instrument(name = "Deleting member from redb", skip_all)]
    async fn delete_member(
        &self,
        id: &MemberId,
    ) -> Result<(), MemberStoreError> {
        let id = id.clone();
        self.run_blocking(move |db| {
            let txn = db.begin_write().map_err(unexpected)?;
            {
                let mut table =
                    txn.open_table(MEMBERS_TABLE).map_err(unexpected)?;
                table.remove(id.as_ref()).map_err(unexpected)?;
            }
            txn.commit().map_err(unexpected)
        })
        .await
    }

    #[tracing::instrument(name = "Updating member in redb", skip_all)]
    async fn update_member(
        &self,
        id: &MemberId,
        name: MemberName,
    ) -> Result<Member, MemberStoreError> {
        let id = id.clone();
        self.run_blocking(move |db| {
            let txn = db.begin_write().map_err(unexpected)?;
            let updated = {
                let mut table =
                    txn.open_table(MEMBERS_TABLE).map_err(unexpected)?;
                let current = table
                    .get(id.as_ref())
                    .map_err(unexpected)?
                    .map(|bytes| decode_member(bytes.value()))
                    .transpose()?
                    .ok_or(MemberStoreError::MemberNotFound)?;

                let updated = current.renamed(name);
                let bytes = encode_member(&updated)?;
                table
                    .insert(id.as_ref(), bytes.as_slice())
                    .map_err(unexpected)?;
                updated
            };
            txn.commit().map_err(unexpected)?;
            Ok(updated)
        })
        .await
    }

    #[tracing::instrument(name = "Removing member from redb", skip_all)]
    async fn remove_member(
        &self,
        id: &MemberId,
    ) -> Result<Member, MemberStoreError> {
        let id = id.clone();
        self.run_blocking(move |db| {
            let txn = db.begin_write().map_err(unexpected)?;
            let removed = {
                let mut table =
                    txn.open_table(MEMBERS_TABLE).map_err(unexpected)?;
                let removed = table.remove(id.as_ref()).map_err(unexpected)?;
                match removed {
                    Some(bytes) => decode_member(bytes.value()),
                    None => Err(MemberStoreError::MemberNotFound),
                }
            };
            // Only commit when something was actually removed.
            let removed = removed?;
            txn.commit().map_err(unexpected)?;
            Ok(removed)
        })
        .await
    }
}
