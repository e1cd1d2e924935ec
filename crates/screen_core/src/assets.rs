use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use futures::{stream, StreamExt};
use shared::{domain::ScreenId, error::PipelineError};
use tracing::warn;

use crate::pipeline::Pipeline;

#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn read_text_asset(&self, path: &str) -> Result<String, PipelineError>;
}

#[derive(Debug, Clone)]
pub struct DirAssetStore {
    root: PathBuf,
}

impl DirAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl AssetStore for DirAssetStore {
    async fn read_text_asset(&self, path: &str) -> Result<String, PipelineError> {
        let full_path = self.root.join(path);
        tokio::fs::read_to_string(&full_path).await.map_err(|err| {
            warn!(path = %full_path.display(), %err, "failed to read asset");
            PipelineError::asset_load(format!(
                "failed to read asset '{}': {err}",
                full_path.display()
            ))
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryAssetStore {
    assets: HashMap<String, String>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.assets.insert(path.into(), text.into());
        self
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn read_text_asset(&self, path: &str) -> Result<String, PipelineError> {
        self.assets
            .get(path)
            .cloned()
            .ok_or_else(|| PipelineError::asset_load(format!("asset not found: {path}")))
    }
}

pub fn source_listing(store: Arc<dyn AssetStore>, screen: ScreenId) -> Pipeline<String> {
    stream::once(async move { store.read_text_asset(&screen.asset_path()).await }).boxed()
}
