//! redb-backed vector index
//!
//! One table per collection (`collection::<name>`, vector id -> JSON record)
//! plus a `manifests` table (collection name -> JSON manifest). Search is an
//! exact scan, which is fine for FAQ-sized collections.

use async_trait::async_trait;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition, TableError};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::{IndexedVector, RetrievedDocument};

use super::{CollectionManifest, DistanceMetric, VectorIndex};

const MANIFESTS: TableDefinition<&str, &str> = TableDefinition::new("manifests");

fn table_name(collection: &str) -> String {
    format!("collection::{}", collection)
}

fn index_err(e: impl std::fmt::Display) -> Error {
    Error::index(e.to_string())
}

/// Vector index persisted in a single redb file
#[derive(Clone)]
pub struct RedbVectorIndex {
    db: Arc<Database>,
}

impl RedbVectorIndex {
    /// Open or create the index file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::create(path)
            .map_err(|e| Error::index(format!("Failed to open {}: {}", path.display(), e)))?;

        tracing::info!("Vector index opened at {}", path.display());
        Ok(Self { db: Arc::new(db) })
    }

    /// Drop and recreate `collection` in one write transaction
    pub fn rebuild_blocking(
        &self,
        collection: &str,
        vectors: &[IndexedVector],
        manifest: &CollectionManifest,
    ) -> Result<()> {
        validate_vectors(vectors, manifest.dimensions)?;

        let name = table_name(collection);
        let definition: TableDefinition<&str, &[u8]> = TableDefinition::new(&name);
        let manifest_json = serde_json::to_string(manifest)?;

        let txn = self.db.begin_write().map_err(index_err)?;
        let existed = txn.delete_table(definition).map_err(index_err)?;
        if existed {
            tracing::info!("Dropped existing collection '{}'", collection);
        }
        {
            let mut table = txn.open_table(definition).map_err(index_err)?;
            for vector in vectors {
                let record = serde_json::to_vec(vector)?;
                table
                    .insert(vector.id.as_str(), record.as_slice())
                    .map_err(index_err)?;
            }

            let mut manifests = txn.open_table(MANIFESTS).map_err(index_err)?;
            manifests
                .insert(collection, manifest_json.as_str())
                .map_err(index_err)?;
        }
        txn.commit().map_err(index_err)?;

        tracing::info!(
            "Stored {} vectors in collection '{}'",
            vectors.len(),
            collection
        );
        Ok(())
    }

    /// Exact nearest-neighbor scan
    pub fn query_blocking(
        &self,
        collection: &str,
        query_vector: &[f32],
        k: usize,
    ) -> Result<Vec<RetrievedDocument>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let name = table_name(collection);
        let definition: TableDefinition<&str, &[u8]> = TableDefinition::new(&name);

        let txn = self.db.begin_read().map_err(index_err)?;
        let table = match txn.open_table(definition) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(index_err(e)),
        };

        let metric = DistanceMetric::Cosine;
        let mut scored: Vec<(String, RetrievedDocument)> = Vec::new();

        for row in table.iter().map_err(index_err)? {
            let (_, value) = row.map_err(index_err)?;
            let record: IndexedVector = serde_json::from_slice(value.value())?;

            if record.embedding.len() != query_vector.len() {
                return Err(Error::ConfigMismatch(format!(
                    "collection '{}' holds {}-dimensional vectors, query has {}",
                    collection,
                    record.embedding.len(),
                    query_vector.len()
                )));
            }

            let distance = metric.distance(query_vector, &record.embedding);
            scored.push((
                record.id,
                RetrievedDocument {
                    text: record.text,
                    metadata: record.metadata,
                    distance,
                },
            ));
        }

        scored.sort_by(|(id_a, a), (id_b, b)| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| id_a.cmp(id_b))
        });
        scored.truncate(k);

        Ok(scored.into_iter().map(|(_, doc)| doc).collect())
    }

    /// Read the manifest of `collection`
    pub fn manifest_blocking(&self, collection: &str) -> Result<Option<CollectionManifest>> {
        let txn = self.db.begin_read().map_err(index_err)?;
        let manifests = match txn.open_table(MANIFESTS) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(index_err(e)),
        };

        match manifests.get(collection).map_err(index_err)? {
            Some(raw) => Ok(Some(serde_json::from_str(raw.value())?)),
            None => Ok(None),
        }
    }

    /// Count vectors in `collection`
    pub fn count_blocking(&self, collection: &str) -> Result<usize> {
        let name = table_name(collection);
        let definition: TableDefinition<&str, &[u8]> = TableDefinition::new(&name);

        let txn = self.db.begin_read().map_err(index_err)?;
        match txn.open_table(definition) {
            Ok(table) => Ok(table.len().map_err(index_err)? as usize),
            Err(TableError::TableDoesNotExist(_)) => Ok(0),
            Err(e) => Err(index_err(e)),
        }
    }
}

fn validate_vectors(vectors: &[IndexedVector], dimensions: usize) -> Result<()> {
    let mut seen = HashSet::with_capacity(vectors.len());
    for vector in vectors {
        if !seen.insert(vector.id.as_str()) {
            return Err(Error::index(format!("Duplicate vector id '{}'", vector.id)));
        }
        if vector.embedding.len() != dimensions {
            return Err(Error::index(format!(
                "Vector '{}' has {} dimensions, expected {}",
                vector.id,
                vector.embedding.len(),
                dimensions
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl VectorIndex for RedbVectorIndex {
    async fn rebuild(
        &self,
        collection: &str,
        vectors: Vec<IndexedVector>,
        manifest: CollectionManifest,
    ) -> Result<()> {
        let index = self.clone();
        let collection = collection.to_string();
        tokio::task::spawn_blocking(move || index.rebuild_blocking(&collection, &vectors, &manifest))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))?
    }

    async fn query(
        &self,
        collection: &str,
        query_vector: &[f32],
        k: usize,
    ) -> Result<Vec<RetrievedDocument>> {
        let index = self.clone();
        let collection = collection.to_string();
        let query = query_vector.to_vec();
        tokio::task::spawn_blocking(move || index.query_blocking(&collection, &query, k))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))?
    }

    async fn manifest(&self, collection: &str) -> Result<Option<CollectionManifest>> {
        let index = self.clone();
        let collection = collection.to_string();
        tokio::task::spawn_blocking(move || index.manifest_blocking(&collection))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))?
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let index = self.clone();
        let collection = collection.to_string();
        tokio::task::spawn_blocking(move || index.count_blocking(&collection))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))?
    }

    fn name(&self) -> &str {
        "redb"
    }
}
