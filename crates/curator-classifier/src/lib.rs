//! Curator Classifier
//!
//! Decides, for one document, which configured category it belongs to or
//! whether it should be discarded as irrelevant.
//!
//! # Architecture
//!
//! ```text
//! raw markup → text::extract_text → summary → PromptBuilder + ChatProvider → normalize → Verdict
//! ```
//!
//! # Key Features
//!
//! - **Text extraction**: Markdown/HTML markup stripped to a single line of plain text
//! - **Deterministic prompts**: The same policy always renders byte-identical instructions
//! - **Short-circuiting**: Texts below the minimum length never reach the endpoint
//! - **Fixed-delay retries**: Transport failures are retried, then reported as an error verdict
//! - **Fail-closed normalization**: Anything but an exact category name is irrelevant
//!
//! # Example Usage
//!
//! ```
//! use curator_classifier::{Classifier, InferenceConfig};
//! use curator_domain::{ClassificationPolicy, Verdict};
//! use curator_llm::MockProvider;
//!
//! let provider = MockProvider::new("<think>checking rules</think>运营操作类");
//! let classifier = Classifier::new(
//!     provider,
//!     InferenceConfig::default(),
//!     ClassificationPolicy::retail_default(),
//! )?;
//!
//! let text = "门店标准化作业流程".repeat(30);
//! let result = classifier.classify(&text);
//! assert_eq!(result.verdict, Verdict::Category("运营操作类".to_string()));
//! # Ok::<(), curator_classifier::ClassifierError>(())
//! ```

#![warn(missing_docs)]

mod classifier;
mod config;
mod error;
mod prompt;
mod response;
pub mod text;

pub use classifier::{summarize, Classifier};
pub use config::InferenceConfig;
pub use error::{ClassifierError, ConfigError};
pub use prompt::PromptBuilder;
pub use response::{normalize_response, strip_think_blocks};
