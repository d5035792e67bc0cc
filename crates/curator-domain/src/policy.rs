//! Classification policy and the closed category set derived from it
//!
//! A policy is loaded once per run and never mutated while documents are being
//! classified. Callers that want a different policy build a new one and hand it
//! to the classifier through its `reload` entry point.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Label the model emits for documents that fail a disqualification rule
pub const DEFAULT_IRRELEVANT_LABEL: &str = "无关";

/// Trailing line appended to the rendered instructions
pub const DEFAULT_CLOSING_DIRECTIVE: &str = "/no_think";

/// Errors raised while parsing or validating a policy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// Policy declares no categories
    #[error("policy must define at least one category")]
    NoCategories,

    /// A category has an empty name
    #[error("category #{0} has an empty name")]
    EmptyCategoryName(usize),

    /// Two categories share a name
    #[error("duplicate category name '{0}'")]
    DuplicateCategory(String),

    /// A category name collides with the irrelevant label
    #[error("category name '{0}' is reserved for the irrelevant outcome")]
    ReservedName(String),

    /// A category name cannot be used as a folder name
    #[error("category name '{0}' cannot be used as a folder name")]
    InvalidCategoryName(String),

    /// The irrelevant label is blank
    #[error("irrelevant label must not be empty")]
    EmptyIrrelevantLabel,

    /// The policy document could not be parsed
    #[error("failed to parse policy: {0}")]
    Parse(String),
}

/// One category the classifier may assign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    /// Category name, also used as the storage folder name
    pub name: String,

    /// Short description shown to the model
    #[serde(alias = "desc")]
    pub description: String,
}

impl CategoryDefinition {
    /// Create a category definition
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A worked example pairing a category with a representative title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyExample {
    /// Category the sample belongs to
    pub category: String,

    /// Sample text (usually an article title)
    #[serde(rename = "content", alias = "text", alias = "sample_text")]
    pub sample_text: String,
}

impl PolicyExample {
    /// Create an example
    pub fn new(category: impl Into<String>, sample_text: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            sample_text: sample_text.into(),
        }
    }
}

/// Complete classification policy
///
/// Field names follow the on-disk policy file: `irrelevant_rules`,
/// `categories[{name, description}]` and `examples[{category, content}]`.
/// The short aliases `desc` and `text` are accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationPolicy {
    /// Opening role statement for the model
    #[serde(default)]
    pub role_definition: String,

    /// Ordered disqualification rules, first match wins
    #[serde(rename = "irrelevant_rules", alias = "disqualification_rules", default)]
    pub disqualification_rules: Vec<String>,

    /// Ordered category definitions
    #[serde(default)]
    pub categories: Vec<CategoryDefinition>,

    /// Worked examples
    #[serde(default)]
    pub examples: Vec<PolicyExample>,

    /// Literal the model emits for irrelevant documents
    #[serde(default = "default_irrelevant_label")]
    pub irrelevant_label: String,

    /// Optional trailing line of the instructions
    #[serde(default = "default_closing_directive")]
    pub closing_directive: Option<String>,
}

fn default_irrelevant_label() -> String {
    DEFAULT_IRRELEVANT_LABEL.to_string()
}

fn default_closing_directive() -> Option<String> {
    Some(DEFAULT_CLOSING_DIRECTIVE.to_string())
}

impl ClassificationPolicy {
    /// Built-in policy for offline fast-moving consumer goods retail articles
    ///
    /// Used whenever no policy file has been configured.
    pub fn retail_default() -> Self {
        Self {
            role_definition: "你是一名专注于线下快消品零售行业文章分类的专家，负责为大卖场/超市/便利店企业筛选和归类具有实操价值的案例或经营规范类内容，严格按照以下规则执行：".to_string(),
            disqualification_rules: [
                "文字主旨非线下快消品零售业强相关",
                "未包含具体企业实操案例/规范",
                "不属于大卖场/超市/便利店之一的零售企业",
                "存在：培训班/公示/广告/课程/会议/邀约/评奖/招聘/招募/推广/论坛/年会任一性质的内容",
                "涉及电商/直播等线上渠道",
                "所述是供应商/品牌方/餐饮业",
                "纯新闻/报道/数据/主观内容/时效信息",
                "含大量图片url链接",
            ]
            .iter()
            .map(|rule| rule.to_string())
            .collect(),
            categories: vec![
                CategoryDefinition::new("合规风控类", "风险事件处理/监管合规案例"),
                CategoryDefinition::new("经营决策类", "战略调整/发展经营决策案例"),
                CategoryDefinition::new("运营操作类", "标准化流程/执行细则"),
                CategoryDefinition::new("创新实践类", "新技术应用/商业模式创新案例"),
            ],
            examples: vec![
                PolicyExample::new("创新实践类", "上品商超智慧零售驱动新增长，焕发行业新活力"),
                PolicyExample::new("经营决策类", "从做2B起家到靠2C逆袭，山姆在中国的生意经"),
                PolicyExample::new("运营操作类", "胖东来运营考核标准"),
                PolicyExample::new("合规风控类", "胖东来\"红内裤事件\"，一场信任危机下的企业合规警示录"),
            ],
            irrelevant_label: default_irrelevant_label(),
            closing_directive: default_closing_directive(),
        }
    }

    /// Parse a policy from JSON
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        serde_json::from_str(json).map_err(|e| PolicyError::Parse(e.to_string()))
    }

    /// Parse a policy from TOML
    pub fn from_toml(toml_str: &str) -> Result<Self, PolicyError> {
        toml::from_str(toml_str).map_err(|e| PolicyError::Parse(e.to_string()))
    }

    /// Serialize the policy as pretty JSON
    pub fn to_json(&self) -> Result<String, PolicyError> {
        serde_json::to_string_pretty(self).map_err(|e| PolicyError::Parse(e.to_string()))
    }

    /// Names of all categories, in policy order
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Validate the policy
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.irrelevant_label.trim().is_empty() {
            return Err(PolicyError::EmptyIrrelevantLabel);
        }
        if self.categories.is_empty() {
            return Err(PolicyError::NoCategories);
        }

        let mut seen = HashSet::new();
        for (index, category) in self.categories.iter().enumerate() {
            let name = category.name.trim();
            if name.is_empty() {
                return Err(PolicyError::EmptyCategoryName(index + 1));
            }
            if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
                return Err(PolicyError::InvalidCategoryName(name.to_string()));
            }
            if name == self.irrelevant_label.trim() {
                return Err(PolicyError::ReservedName(name.to_string()));
            }
            if !seen.insert(name) {
                return Err(PolicyError::DuplicateCategory(name.to_string()));
            }
        }

        Ok(())
    }
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self::retail_default()
    }
}

/// Closed set of category labels derived from a validated policy
///
/// Membership is exact string equality. The irrelevant label is not a member;
/// it is always an acceptable outcome and is reported separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    names: Vec<String>,
    irrelevant_label: String,
}

impl CategorySet {
    /// Build the set, validating the policy first
    pub fn from_policy(policy: &ClassificationPolicy) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self {
            names: policy
                .categories
                .iter()
                .map(|c| c.name.trim().to_string())
                .collect(),
            irrelevant_label: policy.irrelevant_label.trim().to_string(),
        })
    }

    /// Look up an exact category name
    pub fn resolve(&self, label: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|name| name.as_str() == label)
            .map(String::as_str)
    }

    /// Check whether a label is a configured category
    pub fn contains(&self, label: &str) -> bool {
        self.resolve(label).is_some()
    }

    /// Category names in policy order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The irrelevant label
    pub fn irrelevant_label(&self) -> &str {
        &self.irrelevant_label
    }

    /// Every answer the model may give, categories first
    pub fn allowed_outputs(&self) -> Vec<&str> {
        self.names
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.irrelevant_label.as_str()))
            .collect()
    }

    /// Number of categories (excluding the irrelevant label)
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the set holds no categories
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
