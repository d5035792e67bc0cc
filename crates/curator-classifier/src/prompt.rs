//! Instruction rendering for the classification model

use curator_domain::ClassificationPolicy;

/// Renders a policy into the system instructions sent with every request
///
/// Sections appear in a fixed order: role, disqualification rules, category
/// definitions, output requirements, worked examples, closing directive.
/// Sections with nothing to show are left out. Rendering is a pure function of
/// the policy.
pub struct PromptBuilder<'a> {
    policy: &'a ClassificationPolicy,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder for `policy`
    pub fn new(policy: &'a ClassificationPolicy) -> Self {
        Self { policy }
    }

    /// Build the complete instruction text
    pub fn build(&self) -> String {
        let policy = self.policy;
        let label = policy.irrelevant_label.trim();
        let mut lines: Vec<String> = Vec::new();

        // 1. Role
        if !policy.role_definition.trim().is_empty() {
            lines.push(policy.role_definition.clone());
        }

        // 2. Disqualification rules, numbered from 1
        let rules: Vec<&String> = policy
            .disqualification_rules
            .iter()
            .filter(|r| !r.trim().is_empty())
            .collect();
        if !rules.is_empty() {
            lines.push(format!(
                "【无关判定规则】（从前往后依次判定，满足任一条即输出\"{}\"）：",
                label
            ));
            for (i, rule) in rules.iter().enumerate() {
                lines.push(format!("{}.{} → {}", i + 1, rule, label));
            }
        }

        // 3. Category definitions
        let categories: Vec<_> = policy
            .categories
            .iter()
            .filter(|c| !c.name.trim().is_empty())
            .collect();
        if !categories.is_empty() {
            lines.push(
                "【分类标准】（仅当通过无关检测全部通过后执行，否则不允许执行分类）：".to_string(),
            );
            for category in categories.iter().filter(|c| !c.description.trim().is_empty()) {
                lines.push(format!("{}：{}", category.name.trim(), category.description));
            }

            // 4. Output requirements
            let mut allowed: Vec<&str> = categories.iter().map(|c| c.name.trim()).collect();
            allowed.push(label);
            lines.push("【输出要求】：".to_string());
            lines.push(format!(
                "-必须严格按优先级判定\"{}\"，你需要仔细阅读全文，理解文字表达的主旨，而不是仅依靠片面字眼进行判断",
                label
            ));
            lines.push(format!(
                "-仅输出以下{}种之一（不加任何解释）： {}",
                allowed.len(),
                allowed.join("/")
            ));
        }

        // 5. Worked examples
        let examples: Vec<_> = policy
            .examples
            .iter()
            .filter(|e| !e.category.trim().is_empty() && !e.sample_text.trim().is_empty())
            .collect();
        if !examples.is_empty() {
            lines.push("【参考例子】".to_string());
            for example in examples {
                lines.push(format!("{}：{}", example.category.trim(), example.sample_text));
            }
        }

        // 6. Closing directive
        if let Some(directive) = policy
            .closing_directive
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        {
            lines.push(directive.to_string());
        }

        lines.join("\n")
    }
}
