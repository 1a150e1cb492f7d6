use crate::adapters::table::CardTable;
use crate::domain::model::Card;
use crate::domain::ports::CardStore;
use crate::utils::error::{CardError, Result};
use async_trait::async_trait;
use fd_lock::RwLock;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

/// Card store persisted as a single JSON document.
///
/// Every call re-reads the document while holding an advisory lock on a
/// sibling `.lock` file: shared for lookups, exclusive for writes. Handles in
/// other processes, or other handles in this one, therefore always see the
/// committed table and never overwrite each other's cards.
#[derive(Debug, Clone)]
pub struct FileCardStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileCardStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let store = Self {
            lock_path: sibling(&path, ".lock"),
            path,
        };

        let cards = store.query(|table| table.len())?;
        tracing::debug!("Opened card store at {} ({} cards)", store.path.display(), cards);

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_file(&self) -> Result<RwLock<File>> {
        if let Some(parent) = self.lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)?;
        Ok(RwLock::new(file))
    }

    fn load(&self) -> Result<CardTable> {
        match fs::read(&self.path) {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(CardTable::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, table: &CardTable) -> Result<()> {
        // Write to a sibling file and rename so a crash never leaves half a document.
        let tmp_path = sibling(&self.path, ".tmp");
        let data = serde_json::to_vec_pretty(table)?;
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn query<T>(&self, read: impl FnOnce(&CardTable) -> T) -> Result<T> {
        let lock = self.lock_file()?;
        let _guard = lock.read()?;
        let table = self.load()?;
        Ok(read(&table))
    }

    /// Loads, changes and writes back the table under the exclusive lock.
    /// A failing `op` leaves the file untouched.
    fn mutate(&self, op: impl FnOnce(&mut CardTable) -> Result<Card>) -> Result<Card> {
        let mut lock = self.lock_file()?;
        let _guard = lock.write()?;
        let mut table = self.load()?;
        let card = op(&mut table)?;
        self.persist(&table)?;
        Ok(card)
    }

    /// Runs file work on the blocking pool; waiting on the lock must not stall
    /// the runtime.
    async fn blocking<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&FileCardStore) -> Result<T> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || work(&store))
            .await
            .map_err(|e| CardError::Store {
                message: format!("card store task failed: {}", e),
            })?
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("cards"));
    name.push(suffix);
    path.with_file_name(name)
}

#[async_trait]
impl CardStore for FileCardStore {
    async fn count_by_customer(&self, customer_id: &str) -> Result<usize> {
        let customer_id = customer_id.to_string();
        self.blocking(move |s| s.query(|t| t.count_by_customer(&customer_id)))
            .await
    }

    async fn count_by_number(&self, card_number: &str) -> Result<usize> {
        let card_number = card_number.to_string();
        self.blocking(move |s| s.query(|t| t.count_by_number(&card_number)))
            .await
    }

    async fn find_by_customer(&self, customer_id: &str) -> Result<Option<Card>> {
        let customer_id = customer_id.to_string();
        self.blocking(move |s| s.query(|t| t.find_by_customer(&customer_id)))
            .await
    }

    async fn find_by_number(&self, card_number: &str) -> Result<Option<Card>> {
        let card_number = card_number.to_string();
        self.blocking(move |s| s.query(|t| t.find_by_number(&card_number)))
            .await
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Card>> {
        self.blocking(move |s| s.query(|t| t.find_by_id(id))).await
    }

    async fn save(&self, card: Card) -> Result<Card> {
        self.blocking(move |s| s.mutate(|t| t.insert(card))).await
    }

    async fn update(&self, card: Card) -> Result<Card> {
        self.blocking(move |s| s.mutate(|t| t.replace(card))).await
    }

    async fn save_within_limit(&self, card: Card, max_per_customer: usize) -> Result<Card> {
        self.blocking(move |s| s.mutate(|t| t.insert_within_limit(card, max_per_customer)))
            .await
    }
}
