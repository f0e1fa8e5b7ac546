//! Persistence for fitted pipelines and their metadata sidecars.

use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use refund_structs::ModelMetadata;
use tracing::debug;

use crate::EtaPipeline;

/// Object name of the serialized pipeline.
pub const ARTIFACT_OBJECT: &str = "eta_model.json";

/// Object name of the metadata sidecar.
pub const METADATA_OBJECT: &str = "eta_model_meta.json";

/// Version stamp for a training run completed at the given instant.
///
/// Stamps are second-resolution UTC timestamps, so they sort
/// lexicographically in training order.
pub fn version_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Store for the current model artifact and its metadata.
///
/// Exactly one pipeline lives in the store; every save supersedes the
/// previous one.
#[derive(Clone)]
pub struct ArtifactStore {
    store: Arc<dyn ObjectStore>,
    artifact: ObjectPath,
    metadata: ObjectPath,
}

impl ArtifactStore {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            artifact: ObjectPath::from(ARTIFACT_OBJECT),
            metadata: ObjectPath::from(METADATA_OBJECT),
        }
    }

    /// Persists a fitted pipeline, then its metadata sidecar.
    ///
    /// The pipeline goes first: each put lands atomically, and writing the
    /// sidecar last means metadata never describes a pipeline that is not
    /// fully written yet.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or either write fails.
    pub async fn save(&self, pipeline: &EtaPipeline, meta: &ModelMetadata) -> anyhow::Result<()> {
        let blob = serde_json::to_vec(pipeline).context("serialize pipeline artifact")?;
        self.store
            .put(&self.artifact, Bytes::from(blob).into())
            .await
            .context("write pipeline artifact")?;

        let sidecar = serde_json::to_vec(meta).context("serialize model metadata")?;
        self.store
            .put(&self.metadata, Bytes::from(sidecar).into())
            .await
            .context("write model metadata")?;

        debug!(version = %meta.model_version, "persisted model artifact");
        Ok(())
    }

    /// Loads the current fitted pipeline, or `None` when nothing has been
    /// trained yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails for any reason other than the
    /// artifact being absent, or if the artifact does not decode.
    pub async fn load(&self) -> anyhow::Result<Option<EtaPipeline>> {
        let result = match self.store.get(&self.artifact).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Ok(None),
            Err(err) => return Err(err).context("read pipeline artifact"),
        };
        let data = result.bytes().await.context("read pipeline artifact")?;
        let pipeline = serde_json::from_slice(&data).context("decode pipeline artifact")?;
        Ok(Some(pipeline))
    }

    /// Loads the current model metadata, or the untrained placeholder when no
    /// training run has completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails for any reason other than the
    /// sidecar being absent, or if the sidecar does not decode.
    pub async fn load_metadata(&self) -> anyhow::Result<ModelMetadata> {
        let result = match self.store.get(&self.metadata).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Ok(ModelMetadata::untrained()),
            Err(err) => return Err(err).context("read model metadata"),
        };
        let data = result.bytes().await.context("read model metadata")?;
        let meta = serde_json::from_slice(&data).context("decode model metadata")?;
        Ok(meta)
    }
}
