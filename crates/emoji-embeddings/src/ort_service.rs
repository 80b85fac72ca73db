//! ONNX Runtime embedding service (feature-gated behind `ort`).
//!
//! Downloads a sentence-transformers ONNX export via `hf-hub`, tokenizes with
//! `tokenizers`, runs inference via `ort`, then mean-pools the last hidden
//! state over the attention mask and L2-normalizes.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::config::EmbeddingConfig;
use crate::errors::{EmbeddingError, Result};
use crate::normalize::{l2_normalize, mean_pool};
use crate::service::EmbeddingService;

/// Loaded model state. The session needs `&mut` to run.
struct Model {
    session: ort::session::Session,
    tokenizer: Tokenizer,
}

/// ONNX-based sentence embedding service.
pub struct OnnxEmbeddingService {
    config: EmbeddingConfig,
    model: Arc<Mutex<Option<Model>>>,
    ready: AtomicBool,
}

impl OnnxEmbeddingService {
    /// Create a new ONNX embedding service (not yet initialized).
    pub fn new(config: EmbeddingConfig) -> Self {
        Self {
            config,
            model: Arc::new(Mutex::new(None)),
            ready: AtomicBool::new(false),
        }
    }

    /// Download model + tokenizer and create the ONNX session.
    ///
    /// Runs on the blocking pool. Failure here is fatal for the caller;
    /// there is no retry.
    pub async fn initialize(&self) -> Result<()> {
        let model = tokio::task::spawn_blocking({
            let config = self.config.clone();
            move || load_model(&config)
        })
        .await
        .map_err(|e| EmbeddingError::Internal(format!("join error: {e}")))??;

        *self.model.lock() = Some(model);
        self.ready.store(true, Ordering::SeqCst);

        info!(model = %self.config.model, "ONNX embedding service ready");
        Ok(())
    }
}

fn load_model(config: &EmbeddingConfig) -> Result<Model> {
    if config.max_sequence_length == 0 {
        return Err(EmbeddingError::Config(
            "max sequence length must be at least 1".into(),
        ));
    }

    let (model_path, tokenizer_path) = download_model(config)?;
    info!(model = %model_path.display(), "loading ONNX model");

    let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
        .map_err(|e| EmbeddingError::ModelInit(format!("tokenizer load: {e}")))?;
    let _ = tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: config.max_sequence_length,
            ..TruncationParams::default()
        }))
        .map_err(|e| EmbeddingError::Config(format!("tokenizer truncation: {e}")))?;

    let session = ort::session::Session::builder()
        .map_err(|e| EmbeddingError::ModelInit(format!("session builder: {e}")))?
        .with_intra_threads(config.intra_threads)
        .map_err(|e| EmbeddingError::ModelInit(format!("thread config: {e}")))?
        .with_log_level(ort::logging::LogLevel::Warning)
        .map_err(|e| EmbeddingError::ModelInit(format!("log level: {e}")))?
        .commit_from_file(&model_path)
        .map_err(|e| EmbeddingError::ModelInit(format!("model load: {e}")))?;

    Ok(Model { session, tokenizer })
}

/// Download model files via `hf-hub`, returning (`model_path`, `tokenizer_path`).
fn download_model(config: &EmbeddingConfig) -> Result<(PathBuf, PathBuf)> {
    let cache_dir = config.resolved_cache_dir();
    debug!(cache_dir, model = %config.model, "fetching model via hf-hub");

    let api = hf_hub::api::sync::ApiBuilder::new()
        .with_cache_dir(PathBuf::from(&cache_dir))
        .build()
        .map_err(|e| EmbeddingError::ModelInit(format!("hf-hub api: {e}")))?;

    let repo = api.model(config.model.clone());

    let model_path = repo.get(&config.model_file).map_err(|e| {
        EmbeddingError::ModelInit(format!("model download ({}): {e}", config.model_file))
    })?;
    let tokenizer_path = repo
        .get("tokenizer.json")
        .map_err(|e| EmbeddingError::ModelInit(format!("tokenizer download: {e}")))?;

    info!(model = %model_path.display(), tokenizer = %tokenizer_path.display(), "model files ready");
    Ok((model_path, tokenizer_path))
}

/// Pad a batch of token sequences to `max_len` as a flat row-major buffer.
fn pad_batch<'a>(rows: impl Iterator<Item = &'a [u32]>, max_len: usize) -> Vec<i64> {
    let mut flat = Vec::new();
    for row in rows {
        let start = flat.len();
        flat.extend(row.iter().map(|&v| i64::from(v)));
        flat.resize(start + max_len, 0);
    }
    flat
}

/// Run inference on a batch of texts.
fn run_inference(model: &mut Model, texts: &[String]) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let encodings = model
        .tokenizer
        .encode_batch(texts.to_vec(), true)
        .map_err(|e| EmbeddingError::Inference(format!("tokenize: {e}")))?;

    let max_len = encodings
        .iter()
        .map(|e| e.get_ids().len())
        .max()
        .unwrap_or(0);
    if max_len == 0 {
        return Err(EmbeddingError::Inference("empty tokenization".into()));
    }

    let batch_size = texts.len();
    let input_ids = pad_batch(encodings.iter().map(tokenizers::Encoding::get_ids), max_len);
    let attention_mask = pad_batch(
        encodings.iter().map(tokenizers::Encoding::get_attention_mask),
        max_len,
    );
    let token_type_ids = pad_batch(encodings.iter().map(tokenizers::Encoding::get_type_ids), max_len);

    let shape = vec![batch_size as i64, max_len as i64];
    let input_ids_tensor = ort::value::Tensor::from_array((shape.clone(), input_ids))
        .map_err(|e| EmbeddingError::Inference(format!("input_ids tensor: {e}")))?;
    let attention_mask_tensor =
        ort::value::Tensor::from_array((shape.clone(), attention_mask.clone()))
            .map_err(|e| EmbeddingError::Inference(format!("attention_mask tensor: {e}")))?;
    let token_type_ids_tensor = ort::value::Tensor::from_array((shape, token_type_ids))
        .map_err(|e| EmbeddingError::Inference(format!("token_type_ids tensor: {e}")))?;

    let outputs = model
        .session
        .run(ort::inputs![
            "input_ids" => input_ids_tensor,
            "attention_mask" => attention_mask_tensor,
            "token_type_ids" => token_type_ids_tensor
        ])
        .map_err(|e| EmbeddingError::Inference(format!("inference: {e}")))?;

    // last_hidden_state: [batch_size, seq_len, hidden_dim]
    let (output_shape, output_data) = outputs[0]
        .try_extract_tensor::<f32>()
        .map_err(|e| EmbeddingError::Inference(format!("extract tensor: {e}")))?;

    let dims: Vec<usize> = output_shape.iter().map(|&d| d as usize).collect();
    if dims.len() != 3 || dims[0] != batch_size || dims[1] != max_len {
        return Err(EmbeddingError::Inference(format!(
            "unexpected output shape: {output_shape:?}"
        )));
    }
    let hidden_dim = dims[2];
    let item_len = max_len * hidden_dim;

    let results = output_data
        .chunks_exact(item_len)
        .zip(attention_mask.chunks_exact(max_len))
        .map(|(hidden, mask)| {
            let mut pooled = mean_pool(hidden, mask, hidden_dim);
            l2_normalize(&mut pooled);
            pooled
        })
        .collect();

    Ok(results)
}

#[async_trait]
impl EmbeddingService for OnnxEmbeddingService {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if !self.is_ready() {
            return Err(EmbeddingError::NotReady);
        }

        let state = Arc::clone(&self.model);
        let texts = texts.to_vec();
        tokio::task::spawn_blocking(move || {
            let mut guard = state.lock();
            let model = guard.as_mut().ok_or(EmbeddingError::NotReady)?;
            run_inference(model, &texts)
        })
        .await
        .map_err(|e| EmbeddingError::Internal(format!("join error: {e}")))?
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}
