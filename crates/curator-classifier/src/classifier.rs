//! Core Classifier implementation

use crate::config::InferenceConfig;
use crate::error::ClassifierError;
use crate::prompt::PromptBuilder;
use crate::response::normalize_response;
use curator_domain::traits::{ChatProvider, ChatRequest};
use curator_domain::{CategorySet, ClassificationPolicy, ClassificationResult, Verdict};
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Prefix of `text` holding at most `max_chars` characters
pub fn summarize(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Classifies extracted document text with a chat provider
///
/// The policy and inference settings are fixed at construction and only
/// change through [`Classifier::reload`]. One call is in flight at a time.
pub struct Classifier<P>
where
    P: ChatProvider,
{
    provider: P,
    config: InferenceConfig,
    policy: ClassificationPolicy,
    categories: CategorySet,
    system_prompt: String,
}

impl<P> Classifier<P>
where
    P: ChatProvider,
    P::Error: Display,
{
    /// Create a classifier, validating configuration and policy
    pub fn new(
        provider: P,
        config: InferenceConfig,
        policy: ClassificationPolicy,
    ) -> Result<Self, ClassifierError> {
        config.validate()?;
        let categories = CategorySet::from_policy(&policy)?;
        let system_prompt = PromptBuilder::new(&policy).build();

        debug!(
            "Classifier ready: {} categories, prompt length {} chars",
            categories.len(),
            system_prompt.chars().count()
        );

        Ok(Self {
            provider,
            config,
            policy,
            categories,
            system_prompt,
        })
    }

    /// Replace configuration and policy
    ///
    /// Both are validated before anything changes. A changed endpoint, model
    /// or timeout is handed to the provider first; on any error the
    /// classifier keeps its previous settings.
    pub fn reload(
        &mut self,
        config: InferenceConfig,
        policy: ClassificationPolicy,
    ) -> Result<(), ClassifierError> {
        config.validate()?;
        let categories = CategorySet::from_policy(&policy)?;
        let system_prompt = PromptBuilder::new(&policy).build();

        let settings = config.provider_settings();
        if settings != self.config.provider_settings() {
            self.provider
                .reconfigure(&settings)
                .map_err(|e| ClassifierError::Provider(e.to_string()))?;
            info!(
                "Provider now uses {} at {}",
                settings.model, settings.endpoint
            );
        }

        self.config = config;
        self.policy = policy;
        self.categories = categories;
        self.system_prompt = system_prompt;

        info!("Classifier reloaded: categories {:?}", self.categories.names());
        Ok(())
    }

    /// Active inference configuration
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Active policy
    pub fn policy(&self) -> &ClassificationPolicy {
        &self.policy
    }

    /// Closed category set of the active policy
    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// Rendered system instructions
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Classify already-extracted plain text
    ///
    /// Texts shorter than `min_text_length` characters are irrelevant without
    /// a model call. Otherwise the first `max_summary_length` characters are
    /// sent, retrying failed calls with a fixed delay. When every attempt
    /// fails the verdict is [`Verdict::Error`].
    pub fn classify(&self, extracted_text: &str) -> ClassificationResult {
        let length = extracted_text.chars().count();
        if length < self.config.min_text_length {
            debug!(
                "Text too short ({} < {} chars), irrelevant without inference",
                length, self.config.min_text_length
            );
            return ClassificationResult::short_circuit();
        }

        let request = ChatRequest {
            system: self.system_prompt.clone(),
            user: summarize(extracted_text, self.config.max_summary_length).to_string(),
            temperature: self.config.temperature,
            context_window: self.config.context_window,
        };

        let attempts = self.config.attempts();
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.provider.chat(&request) {
                Ok(raw) => {
                    let verdict = normalize_response(&raw, &self.categories);
                    debug!("Model answered {:?} -> {:?}", raw, verdict);
                    return ClassificationResult {
                        verdict,
                        raw_output: Some(raw),
                    };
                }
                Err(e) => {
                    last_error = e.to_string();
                    warn!(
                        "Inference attempt {}/{} failed: {}",
                        attempt, attempts, last_error
                    );
                    if attempt < attempts {
                        std::thread::sleep(self.config.retry_delay());
                    }
                }
            }
        }

        ClassificationResult::failed(format!(
            "inference failed after {} attempt(s): {}",
            attempts, last_error
        ))
    }

    /// Classify and return just the verdict
    pub fn verdict(&self, extracted_text: &str) -> Verdict {
        self.classify(extracted_text).verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_llm::MockProvider;
    use std::time::Duration;

    fn fast_config() -> InferenceConfig {
        InferenceConfig {
            retry_delay_seconds: 0,
            ..InferenceConfig::default()
        }
    }

    fn long_text() -> String {
        "胖东来门店通过标准化服务流程提升顾客体验。".repeat(20)
    }

    fn classifier(provider: MockProvider) -> Classifier<MockProvider> {
        Classifier::new(provider, fast_config(), ClassificationPolicy::retail_default()).unwrap()
    }

    #[test]
    fn test_short_text_makes_no_call() {
        let provider = MockProvider::new("运营操作类");
        let classifier = classifier(provider.clone());

        let text = "短".repeat(149);
        let result = classifier.classify(&text);

        assert_eq!(result.verdict, Verdict::Irrelevant);
        assert_eq!(result.raw_output, None);
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let provider = MockProvider::new("运营操作类");
        let classifier = classifier(provider.clone());

        // 150 CJK characters are 450 bytes
        let text = "长".repeat(150);
        let result = classifier.classify(&text);

        assert_eq!(result.verdict, Verdict::Category("运营操作类".to_string()));
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_summary_is_char_prefix() {
        let provider = MockProvider::new("无关");
        let classifier = classifier(provider.clone());

        let text = "字".repeat(1000);
        classifier.classify(&text);

        let request = provider.last_request().unwrap();
        assert_eq!(request.user.chars().count(), 600);
        assert_eq!(request.system, classifier.system_prompt());
        assert_eq!(request.context_window, 5120);
        assert!((request.temperature - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_retries_exhausted_is_error() {
        let provider = MockProvider::failing("connection refused");
        let classifier = classifier(provider.clone());

        let result = classifier.classify(&long_text());

        assert_eq!(provider.call_count(), 3);
        match result.verdict {
            Verdict::Error(reason) => assert!(reason.contains("connection refused")),
            other => panic!("Expected error verdict, got {:?}", other),
        }
    }

    #[test]
    fn test_transient_failure_then_success() {
        let provider = MockProvider::new("经营决策类");
        provider.push_failure("timeout");
        provider.push_failure("timeout");
        let classifier = classifier(provider.clone());

        let result = classifier.classify(&long_text());

        assert_eq!(result.verdict, Verdict::Category("经营决策类".to_string()));
        assert_eq!(provider.call_count(), 3);
    }

    #[test]
    fn test_zero_retries_makes_one_attempt() {
        let provider = MockProvider::failing("down");
        let config = InferenceConfig {
            max_retries: 0,
            ..fast_config()
        };
        let classifier =
            Classifier::new(provider.clone(), config, ClassificationPolicy::retail_default())
                .unwrap();

        assert!(classifier.verdict(&long_text()).is_error());
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_out_of_vocabulary_answer_is_irrelevant() {
        let provider = MockProvider::new("我认为属于运营操作类");
        let classifier = classifier(provider);

        let result = classifier.classify(&long_text());
        assert_eq!(result.verdict, Verdict::Irrelevant);
        assert_eq!(result.raw_output.as_deref(), Some("我认为属于运营操作类"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = InferenceConfig {
            temperature: 3.0,
            ..InferenceConfig::default()
        };
        let result = Classifier::new(
            MockProvider::default(),
            config,
            ClassificationPolicy::retail_default(),
        );
        assert!(matches!(result, Err(ClassifierError::Config(_))));
    }

    #[test]
    fn test_reload_swaps_policy_atomically() {
        let provider = MockProvider::new("Ops");
        let mut classifier = classifier(provider);
        assert_eq!(classifier.verdict(&long_text()), Verdict::Irrelevant);

        let mut bad = ClassificationPolicy::retail_default();
        bad.categories.clear();
        assert!(classifier.reload(fast_config(), bad).is_err());
        assert_eq!(classifier.categories().len(), 4);

        let mut policy = ClassificationPolicy::retail_default();
        policy.categories[0].name = "Ops".to_string();
        classifier.reload(fast_config(), policy).unwrap();

        assert_eq!(classifier.verdict(&long_text()), Verdict::Category("Ops".to_string()));
        assert!(classifier.system_prompt().contains("Ops："));
    }

    #[test]
    fn test_policy_without_rules_classifies() {
        let mut policy = ClassificationPolicy::retail_default();
        policy.disqualification_rules.clear();
        let classifier =
            Classifier::new(MockProvider::new("经营决策类"), fast_config(), policy).unwrap();

        assert!(!classifier.system_prompt().contains("【无关判定规则】"));
        assert_eq!(
            classifier.verdict(&long_text()),
            Verdict::Category("经营决策类".to_string())
        );
    }

    #[test]
    fn test_category_without_description_is_assignable() {
        let mut policy = ClassificationPolicy::retail_default();
        policy.categories[0].description = String::new();
        policy.examples.clear();
        let classifier =
            Classifier::new(MockProvider::new("合规风控类"), fast_config(), policy).unwrap();

        assert!(!classifier.system_prompt().contains("合规风控类："));
        assert!(classifier.system_prompt().contains("合规风控类/"));
        assert_eq!(
            classifier.verdict(&long_text()),
            Verdict::Category("合规风控类".to_string())
        );
    }

    #[test]
    fn test_reload_reconfigures_provider() {
        let provider = MockProvider::new("运营操作类");
        let mut classifier = classifier(provider.clone());
        assert_eq!(provider.settings(), None);

        // unchanged connection settings leave the provider alone
        classifier
            .reload(fast_config(), ClassificationPolicy::retail_default())
            .unwrap();
        assert_eq!(provider.settings(), None);

        let config = InferenceConfig {
            endpoint_url: "http://gpu-box:11434".to_string(),
            model_id: "qwen3:14b".to_string(),
            timeout_seconds: 30,
            ..fast_config()
        };
        classifier
            .reload(config.clone(), ClassificationPolicy::retail_default())
            .unwrap();

        let settings = provider.settings().unwrap();
        assert_eq!(settings.endpoint, "http://gpu-box:11434");
        assert_eq!(settings.model, "qwen3:14b");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(classifier.config(), &config);
    }

    #[test]
    fn test_reload_keeps_settings_when_provider_refuses() {
        let mut provider = MockProvider::new("运营操作类");
        provider.refuse_reconfigure("bad endpoint");
        let mut classifier = classifier(provider.clone());

        let config = InferenceConfig {
            model_id: "other".to_string(),
            ..fast_config()
        };
        let result = classifier.reload(config, ClassificationPolicy::retail_default());

        assert!(matches!(result, Err(ClassifierError::Provider(_))));
        assert_eq!(classifier.config(), &fast_config());
        assert_eq!(provider.settings(), None);
    }

    #[test]
    fn test_summarize_boundaries() {
        assert_eq!(summarize("abc", 10), "abc");
        assert_eq!(summarize("abc", 2), "ab");
        assert_eq!(summarize("零一二三", 3), "零一二");
        assert_eq!(summarize("", 5), "");
    }
}
