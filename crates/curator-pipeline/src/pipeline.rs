//! Core Pipeline implementation

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::observer::{PipelineEvent, PipelineObserver, TracingObserver};
use crate::orphans::Orphan;
use crate::outcome::{BatchOutcome, DocumentOutcome, RunSummary};
use crate::storage::{initialize_category_folders, load_documents, match_articles};
use chrono::{Local, TimeZone};
use curator_classifier::text::extract_text;
use curator_classifier::Classifier;
use curator_domain::traits::ChatProvider;
use curator_domain::{ArticleInfo, Document, LedgerRecord, Verdict};
use curator_ledger::Ledger;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// How often cancellation is polled during a cooldown pause
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Runs documents through classification, storage placement and the ledger
///
/// A pipeline is used from one thread at a time. Cancellation goes through
/// the token returned by [`Pipeline::cancellation_token`], which may be
/// cancelled from any thread.
pub struct Pipeline<P>
where
    P: ChatProvider,
{
    classifier: Classifier<P>,
    config: PipelineConfig,
    cancel: CancellationToken,
    observer: Arc<dyn PipelineObserver>,
}

impl<P> Pipeline<P>
where
    P: ChatProvider,
    P::Error: Display,
{
    /// Create a pipeline around a configured classifier
    pub fn new(classifier: Classifier<P>, config: PipelineConfig) -> Result<Self> {
        config.validate().map_err(PipelineError::Config)?;
        Ok(Self {
            classifier,
            config,
            cancel: CancellationToken::new(),
            observer: Arc::new(TracingObserver),
        })
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Send progress events to `observer` instead of the log
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Token that stops the current run when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The classifier
    pub fn classifier(&self) -> &Classifier<P> {
        &self.classifier
    }

    /// Mutable access to the classifier, for [`Classifier::reload`]
    pub fn classifier_mut(&mut self) -> &mut Classifier<P> {
        &mut self.classifier
    }

    /// Folder holding the category folders and the ledger
    pub fn group_folder(&self, destination: &Path) -> PathBuf {
        if self.config.nest_under_group {
            destination.join(&self.config.group_label)
        } else {
            destination.to_path_buf()
        }
    }

    /// Ledger for runs into `destination`
    pub fn ledger(&self, destination: &Path) -> Ledger {
        Ledger::new(
            self.group_folder(destination)
                .join(&self.config.ledger_file_name),
        )
    }

    /// Create a folder for every category of the active policy
    pub fn initialize_folders(&self, destination: &Path) -> Result<PathBuf> {
        let group = self.group_folder(destination);
        initialize_category_folders(&group, self.classifier.categories().names())?;
        Ok(group)
    }

    /// Classify and place a single document
    ///
    /// Never fails as a whole: every problem is reported through the
    /// returned outcome. `sequence_number` is used for the ledger row when
    /// the document is recorded.
    pub fn process(
        &self,
        document: &Document,
        sequence_number: u64,
        destination: &Path,
    ) -> DocumentOutcome {
        let text = extract_text(&document.raw_text);
        if text.is_empty() {
            debug!("{}: no text after extraction, skipping", document.file_name);
            return DocumentOutcome::Empty;
        }

        let result = self.classifier.classify(&text);
        match result.verdict {
            Verdict::Error(reason) => {
                error!("{}: classification failed: {}", document.file_name, reason);
                DocumentOutcome::Failed { reason }
            }
            Verdict::Irrelevant => DocumentOutcome::Irrelevant {
                source_removed: self.remove_irrelevant_source(document),
            },
            Verdict::Category(category) => {
                self.place(document, &category, sequence_number, destination)
            }
        }
    }

    fn remove_irrelevant_source(&self, document: &Document) -> bool {
        if !self.config.remove_irrelevant_sources {
            return false;
        }
        let Some(source) = &document.source_path else {
            return false;
        };
        match fs::remove_file(source) {
            Ok(()) => {
                info!("Removed irrelevant source {}", source.display());
                true
            }
            Err(e) => {
                warn!("Failed to remove {}: {}", source.display(), e);
                false
            }
        }
    }

    fn place(
        &self,
        document: &Document,
        category: &str,
        sequence_number: u64,
        destination: &Path,
    ) -> DocumentOutcome {
        let folder = self.group_folder(destination).join(category);
        let target = folder.join(&document.file_name);

        if target.exists() {
            debug!("{} already stored", target.display());
            return DocumentOutcome::AlreadyStored { path: target };
        }

        if let Err(e) = self.write_target(document, &folder, &target) {
            error!("Failed to store {}: {}", target.display(), e);
            // do not leave a partial copy behind
            if let Err(cleanup) = fs::remove_file(&target) {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    debug!("Could not remove partial {}: {}", target.display(), cleanup);
                }
            }
            return DocumentOutcome::Failed {
                reason: format!("failed to store {}: {}", target.display(), e),
            };
        }

        let record = LedgerRecord {
            sequence_number,
            group_label: self.config.group_label.clone(),
            category: category.to_string(),
            title: document.title.clone(),
            ingestion_date: Local::now().format("%Y-%m-%d").to_string(),
            source_link: document.link.clone().unwrap_or_default(),
            publish_date: document
                .publish_timestamp
                .and_then(format_publish_date)
                .unwrap_or_default(),
        };

        debug!("{} stored as {}", document.file_name, category);
        DocumentOutcome::Recorded {
            record,
            path: target,
        }
    }

    fn write_target(
        &self,
        document: &Document,
        folder: &Path,
        target: &Path,
    ) -> std::io::Result<()> {
        fs::create_dir_all(folder)?;
        match &document.source_path {
            Some(source) => fs::copy(source, target).map(|_| ()),
            None => fs::write(target, &document.raw_text),
        }
    }

    /// Process `documents` in order
    ///
    /// Only recorded documents receive sequence numbers, consecutively from
    /// 1. Cancellation is checked before each document and during the
    /// cooldown that follows every `batch_size` documents.
    pub fn process_all(&self, documents: &[Document], destination: &Path) -> BatchOutcome {
        let total = documents.len();
        let mut batch = BatchOutcome {
            records: Vec::new(),
            summary: RunSummary::new(total),
        };

        self.observer.on_event(&PipelineEvent::RunStarted { total });

        for (i, document) in documents.iter().enumerate() {
            if self.cancel.is_cancelled() {
                self.stop(&mut batch.summary);
                break;
            }

            let index = i + 1;
            self.observer.on_event(&PipelineEvent::DocumentStarted {
                index,
                total,
                file_name: document.file_name.clone(),
            });

            let sequence_number = batch.records.len() as u64 + 1;
            let outcome = self.process(document, sequence_number, destination);
            if let Some(record) = outcome.record() {
                batch.records.push(record.clone());
            }
            batch.summary.record(&document.file_name, &outcome);

            self.observer.on_event(&PipelineEvent::DocumentFinished {
                index,
                total,
                file_name: document.file_name.clone(),
                outcome,
                progress: batch.summary.progress(),
            });

            if index % self.config.batch_size == 0 && index < total && !self.cooldown(index) {
                self.stop(&mut batch.summary);
                break;
            }
        }

        self.observer.on_event(&PipelineEvent::RunFinished {
            summary: batch.summary.clone(),
        });
        batch
    }

    fn stop(&self, summary: &mut RunSummary) {
        summary.cancelled = true;
        warn!("Run cancelled after {} document(s)", summary.handled);
        self.observer.on_event(&PipelineEvent::Cancelled {
            handled: summary.handled,
        });
    }

    /// Pause between batches; false when cancelled during the pause
    fn cooldown(&self, handled: usize) -> bool {
        let pause = self.config.cooldown();
        if pause.is_zero() {
            return true;
        }

        self.observer.on_event(&PipelineEvent::CooldownStarted {
            handled,
            seconds: self.config.cooldown_seconds,
        });

        let deadline = Instant::now() + pause;
        loop {
            if self.cancel.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep(CANCEL_POLL_INTERVAL.min(deadline - now));
        }
    }

    /// Classify every document in `source_dir` into `destination`
    ///
    /// Category folders are created first, `articles` metadata is matched by
    /// title, and the recorded rows are appended to the ledger at the end.
    pub fn classify_directory(
        &self,
        source_dir: &Path,
        articles: &[ArticleInfo],
        destination: &Path,
    ) -> Result<RunSummary> {
        if !source_dir.is_dir() {
            return Err(PipelineError::SourceNotFound(source_dir.to_path_buf()));
        }

        self.initialize_folders(destination)?;

        let loaded = load_documents(source_dir, &self.config.document_extension)?;
        let documents = match_articles(loaded.documents, articles);
        info!(
            "Loaded {} document(s) from {}",
            documents.len(),
            source_dir.display()
        );

        let batch = self.process_all(&documents, destination);
        let mut summary = batch.summary;
        for (path, reason) in loaded.failures {
            summary.total += 1;
            summary.handled += 1;
            summary.failed += 1;
            summary.failures.push((path.display().to_string(), reason));
        }

        let ledger = self.ledger(destination);
        let rows = if batch.records.is_empty() {
            ledger.read()?.len()
        } else {
            ledger.append(&batch.records)?.len()
        };
        summary.ledger_path = Some(ledger.path().to_path_buf());
        summary.ledger_rows = Some(rows);

        info!(
            "Ledger {} now holds {} row(s)",
            ledger.path().display(),
            rows
        );
        Ok(summary)
    }

    /// Stored files in `destination` that have no ledger row
    pub fn find_orphans(&self, destination: &Path) -> Result<Vec<Orphan>> {
        crate::orphans::find_orphans(
            &self.group_folder(destination),
            self.classifier.categories().names(),
            &self.ledger(destination),
            &self.config.document_extension,
        )
    }
}

/// Unix seconds to a local calendar date
fn format_publish_date(timestamp: i64) -> Option<String> {
    Local
        .timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
}
