//! Sentence embedding backends.
//!
//! `FastEmbedder` runs a pretrained sentence-transformer locally through
//! fastembed (ONNX). Weights are downloaded from the model hub on first use and
//! read from the local cache afterwards.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Failed to initialize embedding model {model}: {message}. Ensure the model hub is reachable for the first download")]
    ModelInit { model: String, message: String },

    #[error("Failed to generate embeddings: {0}")]
    Generation(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding model {model} is still loading")]
    Loading { model: String },
}

/// Anything that turns text into fixed-size vectors.
///
/// Carried in `AppState` behind an `Arc<dyn Embedder>` so tests can swap in a
/// deterministic implementation.
pub trait Embedder: Send + Sync {
    /// One vector per input text, in input order.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    fn model_name(&self) -> &str;
}

/// Supported pretrained models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModelChoice {
    #[default]
    AllMpnetBaseV2,
    AllMiniLmL6V2,
    AllMiniLmL12V2,
    BgeSmallEnV15,
    BgeBaseEnV15,
}

impl ModelChoice {
    pub fn hub_name(&self) -> &'static str {
        match self {
            ModelChoice::AllMpnetBaseV2 => "sentence-transformers/all-mpnet-base-v2",
            ModelChoice::AllMiniLmL6V2 => "sentence-transformers/all-MiniLM-L6-v2",
            ModelChoice::AllMiniLmL12V2 => "sentence-transformers/all-MiniLM-L12-v2",
            ModelChoice::BgeSmallEnV15 => "BAAI/bge-small-en-v1.5",
            ModelChoice::BgeBaseEnV15 => "BAAI/bge-base-en-v1.5",
        }
    }

    fn fastembed_model(&self) -> EmbeddingModel {
        match self {
            ModelChoice::AllMpnetBaseV2 => EmbeddingModel::AllMpnetBaseV2,
            ModelChoice::AllMiniLmL6V2 => EmbeddingModel::AllMiniLML6V2,
            ModelChoice::AllMiniLmL12V2 => EmbeddingModel::AllMiniLML12V2,
            ModelChoice::BgeSmallEnV15 => EmbeddingModel::BGESmallENV15,
            ModelChoice::BgeBaseEnV15 => EmbeddingModel::BGEBaseENV15,
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hub_name())
    }
}

impl FromStr for ModelChoice {
    type Err = String;

    /// Accepts the short name with or without the hub organisation prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let name = name.rsplit('/').next().unwrap_or_default();
        match name {
            "all-mpnet-base-v2" => Ok(ModelChoice::AllMpnetBaseV2),
            "all-minilm-l6-v2" => Ok(ModelChoice::AllMiniLmL6V2),
            "all-minilm-l12-v2" => Ok(ModelChoice::AllMiniLmL12V2),
            "bge-small-en-v1.5" => Ok(ModelChoice::BgeSmallEnV15),
            "bge-base-en-v1.5" => Ok(ModelChoice::BgeBaseEnV15),
            other => Err(format!("unknown embedding model '{other}'")),
        }
    }
}

/// A model handle that is loaded on first use and then kept.
///
/// The load runs outside the lock. While one caller is loading, every other
/// caller gets `EmbeddingError::Loading` immediately instead of waiting, and a
/// failed or panicked load leaves the slot empty so the next call retries.
pub struct LazyModel<M> {
    slot: Mutex<Option<M>>,
    loading: AtomicBool,
}

impl<M> Default for LazyModel<M> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
            loading: AtomicBool::new(false),
        }
    }
}

/// Clears the loading flag even when the loader panics.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<M> LazyModel<M> {
    /// Runs `run` against the loaded model, calling `load` first if needed.
    pub fn with_model<R>(
        &self,
        name: &str,
        load: impl FnOnce() -> Result<M, EmbeddingError>,
        run: impl FnOnce(&mut M) -> Result<R, EmbeddingError>,
    ) -> Result<R, EmbeddingError> {
        {
            let mut slot = self.lock_slot();
            if let Some(model) = slot.as_mut() {
                return run(model);
            }
        }

        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(EmbeddingError::Loading {
                model: name.to_string(),
            });
        }
        let _guard = LoadingGuard(&self.loading);
        // Another caller may have finished loading between the two checks.
        if let Some(model) = self.lock_slot().as_mut() {
            return run(model);
        }

        let model = load()?;
        let mut slot = self.lock_slot();
        run(slot.insert(model))
    }

    pub fn is_loaded(&self) -> bool {
        self.lock_slot().is_some()
    }

    // A panic while the model was in use may have left it half-updated; drop
    // it and let the next call reload.
    fn lock_slot(&self) -> MutexGuard<'_, Option<M>> {
        self.slot.lock().unwrap_or_else(|poisoned| {
            warn!("Embedding model lock was poisoned, discarding the cached model");
            let mut slot = poisoned.into_inner();
            *slot = None;
            self.slot.clear_poison();
            slot
        })
    }
}

/// fastembed-backed embedder with a lazily loaded, cached model handle.
pub struct FastEmbedder {
    choice: ModelChoice,
    cache_dir: PathBuf,
    model: LazyModel<TextEmbedding>,
}

impl fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastEmbedder")
            .field("choice", &self.choice)
            .field("cache_dir", &self.cache_dir)
            .field("loaded", &self.model.is_loaded())
            .finish()
    }
}

impl FastEmbedder {
    pub fn new(choice: ModelChoice, cache_dir: PathBuf) -> Self {
        Self {
            choice,
            cache_dir,
            model: LazyModel::default(),
        }
    }

    /// Forces the model to load (and download on first run).
    pub fn warm_up(&self) -> Result<(), EmbeddingError> {
        self.model
            .with_model(self.choice.hub_name(), || self.load(), |_| Ok(()))
    }

    fn load(&self) -> Result<TextEmbedding, EmbeddingError> {
        let has_cached_models = self.cache_dir.exists()
            && self
                .cache_dir
                .read_dir()
                .is_ok_and(|mut entries| entries.next().is_some());
        if has_cached_models {
            info!("Loading embedding model {} from cache", self.choice);
        } else {
            info!("Downloading embedding model {} (first run only)", self.choice);
        }

        TextEmbedding::try_new(
            InitOptions::new(self.choice.fastembed_model())
                .with_cache_dir(self.cache_dir.clone())
                .with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::ModelInit {
            model: self.choice.to_string(),
            message: e.to_string(),
        })
    }
}

impl Embedder for FastEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self.model.with_model(
            self.choice.hub_name(),
            || self.load(),
            |model| {
                model
                    .embed(texts.to_vec(), None)
                    .map_err(|e| EmbeddingError::Generation(e.to_string()))
            },
        )?;

        check_dimensions(&embeddings)?;
        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        self.choice.hub_name()
    }
}

/// All vectors in a batch must share the first vector's dimension.
pub fn check_dimensions(embeddings: &[Vec<f32>]) -> Result<(), EmbeddingError> {
    let Some(expected) = embeddings.first().map(Vec::len) else {
        return Ok(());
    };
    match embeddings.iter().find(|e| e.len() != expected) {
        Some(bad) => Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: bad.len(),
        }),
        None => Ok(()),
    }
}
