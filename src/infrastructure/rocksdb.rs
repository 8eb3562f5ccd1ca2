use crate::domain::group::Group;
use crate::domain::ids::{GroupId, PaymentId};
use crate::domain::ports::{GroupEdit, GroupStore};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Column Family for storing groups with their members and payments.
pub const CF_GROUPS: &str = "groups";
/// Column Family for id sequences.
pub const CF_META: &str = "meta";

const GROUP_SEQ_KEY: &[u8] = b"group_seq";
const PAYMENT_SEQ_KEY: &[u8] = b"payment_seq";

/// A persistent group store backed by RocksDB.
///
/// Groups are serialized as JSON under their big-endian id. Id sequences live
/// in a separate column family so they survive restarts. Writes to the
/// `groups` column family go through `group_lock`, which makes
/// read-modify-write edits atomic for every clone of the store.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    seq_lock: Arc<Mutex<()>>,
    group_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("groups" and "meta") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_groups = ColumnFamilyDescriptor::new(CF_GROUPS, Options::default());
        let cf_meta = ColumnFamilyDescriptor::new(CF_META, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_groups, cf_meta])?;

        Ok(Self {
            db: Arc::new(db),
            seq_lock: Arc::new(Mutex::new(())),
            group_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            LedgerError::InternalError(Box::new(std::io::Error::other(format!(
                "{} column family not found",
                name
            ))))
        })
    }

    fn lock<'a>(lock: &'a Mutex<()>, what: &str) -> Result<std::sync::MutexGuard<'a, ()>> {
        lock.lock().map_err(|_| {
            LedgerError::InternalError(Box::new(std::io::Error::other(format!(
                "{} lock poisoned",
                what
            ))))
        })
    }

    fn next_in_sequence(&self, key: &[u8]) -> Result<u64> {
        let _guard = Self::lock(&self.seq_lock, "sequence")?;

        let cf = self.cf(CF_META)?;
        let current = match self.db.get_cf(cf, key)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    LedgerError::DataIntegrity(format!(
                        "corrupt sequence {}",
                        String::from_utf8_lossy(key)
                    ))
                })?;
                u64::from_be_bytes(raw)
            }
            None => 0,
        };

        let next = current + 1;
        self.db.put_cf(cf, key, next.to_be_bytes())?;
        Ok(next)
    }

    fn put_group(&self, group: &Group) -> Result<()> {
        let cf = self.cf(CF_GROUPS)?;
        let key = group.id.0.to_be_bytes();
        let value = serde_json::to_vec(group).map_err(|e| {
            LedgerError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )))
        })?;

        self.db.put_cf(cf, key, value)?;
        Ok(())
    }

    fn store_group(&self, group: &Group) -> Result<()> {
        let _guard = Self::lock(&self.group_lock, "group")?;
        self.put_group(group)
    }

    fn get_group(&self, group_id: GroupId) -> Result<Option<Group>> {
        let cf = self.cf(CF_GROUPS)?;
        match self.db.get_cf(cf, group_id.0.to_be_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn modify_group(&self, group_id: GroupId, edit: GroupEdit) -> Result<Option<Group>> {
        let _guard = Self::lock(&self.group_lock, "group")?;
        let Some(mut group) = self.get_group(group_id)? else {
            return Ok(None);
        };

        edit(&mut group)?;
        self.put_group(&group)?;
        Ok(Some(group))
    }

    fn delete_group(&self, group_id: GroupId) -> Result<bool> {
        let _guard = Self::lock(&self.group_lock, "group")?;
        let cf = self.cf(CF_GROUPS)?;
        let key = group_id.0.to_be_bytes();
        if self.db.get_pinned_cf(cf, key)?.is_none() {
            return Ok(false);
        }
        self.db.delete_cf(cf, key)?;
        Ok(true)
    }

    fn decode(bytes: &[u8]) -> Result<Group> {
        serde_json::from_slice(bytes).map_err(|e| {
            LedgerError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Deserialization error: {}", e),
            )))
        })
    }
}

#[async_trait]
impl GroupStore for RocksDBStore {
    async fn store(&self, group: Group) -> Result<()> {
        self.store_group(&group)
    }

    async fn get(&self, group_id: GroupId) -> Result<Option<Group>> {
        self.get_group(group_id)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Group>> {
        let cf = self.cf(CF_GROUPS)?;
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            let group = Self::decode(&value)?;
            if group.name == name {
                return Ok(Some(group));
            }
        }
        Ok(None)
    }

    async fn modify(&self, group_id: GroupId, edit: GroupEdit) -> Result<Option<Group>> {
        self.modify_group(group_id, edit)
    }

    async fn delete(&self, group_id: GroupId) -> Result<bool> {
        self.delete_group(group_id)
    }

    async fn next_group_id(&self) -> Result<GroupId> {
        self.next_in_sequence(GROUP_SEQ_KEY).map(GroupId)
    }

    async fn next_payment_id(&self) -> Result<PaymentId> {
        self.next_in_sequence(PAYMENT_SEQ_KEY).map(PaymentId)
    }
}
