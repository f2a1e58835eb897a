use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::{debug, info};

use crate::errors::ServiceError;

/// A row type that can live in a [`CsvTableStore`].
///
/// `HEADERS` is written as the first line of the file and must match the
/// serde field names of the row, in order.
pub trait TableRow: Serialize + DeserializeOwned + Send + Sync {
    const TABLE: &'static str;
    const HEADERS: &'static [&'static str];
}

/// Generic CSV file-backed table.
///
/// Nothing is cached between calls: every `load` reads the whole file and
/// every `save` rewrites it. There is no locking, so two concurrent
/// load/save cycles may lose one of the writes.
pub struct CsvTableStore<T> {
    file_path: PathBuf,
    _row: PhantomData<fn() -> T>,
}

impl<T: TableRow> CsvTableStore<T> {
    /// Open the table at `path`. Creates the file with only the header row if
    /// missing; otherwise checks that the existing file parses.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let store = Self { file_path, _row: PhantomData };
        match fs::metadata(&store.file_path).await {
            Ok(_) => {
                let rows = store.load().await?;
                info!(table = T::TABLE, path = %store.file_path.display(), rows = rows.len(), "table opened");
            }
            Err(_) => {
                store.save(&[]).await?;
                info!(table = T::TABLE, path = %store.file_path.display(), "table created");
            }
        }
        Ok(Arc::new(store))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read every row in storage order.
    pub async fn load(&self) -> Result<Vec<T>, ServiceError> {
        let bytes = fs::read(&self.file_path).await?;
        let rows = decode::<T>(&bytes)?;
        debug!(table = T::TABLE, rows = rows.len(), "table loaded");
        Ok(rows)
    }

    /// Replace the whole file with `rows`.
    pub async fn save(&self, rows: &[T]) -> Result<(), ServiceError> {
        let data = encode(rows)?;
        fs::write(&self.file_path, data).await?;
        debug!(table = T::TABLE, rows = rows.len(), "table saved");
        Ok(())
    }
}

fn decode<T: TableRow>(bytes: &[u8]) -> Result<Vec<T>, ServiceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let headers = rdr.headers()?.clone();
    if headers.iter().ne(T::HEADERS.iter().copied()) {
        return Err(ServiceError::Storage(format!(
            "table {} has unexpected header {:?}",
            T::TABLE,
            headers.iter().collect::<Vec<_>>()
        )));
    }
    let rows = rdr.deserialize().collect::<Result<Vec<T>, _>>()?;
    Ok(rows)
}

fn encode<T: TableRow>(rows: &[T]) -> Result<Vec<u8>, ServiceError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(T::HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.into_inner()
        .map_err(|e| ServiceError::Storage(e.to_string()))
}
