//! Curator Pipeline
//!
//! Orchestrates classification for a batch of documents and places the
//! results into category storage and the ledger.
//!
//! # Architecture
//!
//! ```text
//! Document → extract_text → Classifier → storage placement → LedgerRecord
//!                                    ↘ irrelevant: optional source removal
//! ```
//!
//! # Key Features
//!
//! - **Per-document isolation**: A failing document is reported and the batch moves on
//! - **Idempotent placement**: Files already in category storage are never overwritten or re-recorded
//! - **Batch cooldown**: A pause after every `batch_size` documents, interruptible within a second
//! - **Cancellation**: A [`CancellationToken`] is checked between documents and during cooldown
//! - **Progress**: [`PipelineObserver`] implementations receive an event per step
//!
//! # Example Usage
//!
//! ```no_run
//! use curator_classifier::{Classifier, InferenceConfig};
//! use curator_domain::ClassificationPolicy;
//! use curator_llm::OllamaProvider;
//! use curator_pipeline::{Pipeline, PipelineConfig};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = InferenceConfig::default();
//! let provider = OllamaProvider::new(&config.endpoint_url, &config.model_id, config.timeout())?;
//! let classifier = Classifier::new(provider, config, ClassificationPolicy::retail_default())?;
//! let pipeline = Pipeline::new(classifier, PipelineConfig::default())?;
//!
//! let summary = pipeline.classify_directory(Path::new("downloads"), &[], Path::new("library"))?;
//! println!("{}", summary.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod observer;
mod orphans;
mod outcome;
mod pipeline;
mod storage;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use observer::{
    NoopObserver, PipelineEvent, PipelineObserver, StatusBoard, StatusSnapshot, TracingObserver,
};
pub use orphans::{find_orphans, Orphan};
pub use outcome::{BatchOutcome, DocumentOutcome, RunSummary};
pub use pipeline::Pipeline;
pub use storage::{
    initialize_category_folders, load_articles, load_documents, match_articles, LoadedDocuments,
};
pub use tokio_util::sync::CancellationToken;
