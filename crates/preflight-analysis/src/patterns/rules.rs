//! Pattern rules and the built-in rule set.

use std::sync::LazyLock;

use preflight_core::config::{ForbiddenRuleConfig, PatternsConfig};
use preflight_core::errors::PatternError;
use regex::Regex;

use super::types::{ContextExclusion, PatternCategory};
use crate::diagnostics::Severity;
use crate::scanner::{Category, Document};

static RE_CONFLICT_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?:<{7}|={7}|\|{7}|>{7})").ok());

static RE_SUSPICIOUS_RETURN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\breturn\s+(?:null|undefined)|^return;$").ok()
});

/// A matcher with its context-exclusion rule and scope.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub id: String,
    pub category: PatternCategory,
    pub matcher: Regex,
    pub exclusion: ContextExclusion,
    pub severity: Severity,
    pub message: String,
    /// Documents whose `/`-prefixed path contains any of these are skipped
    pub exempt_paths: Vec<String>,
    pub exempt_categories: Vec<Category>,
}

impl PatternRule {
    /// Compile a rule. The matcher runs against each trimmed line.
    pub fn new(
        id: impl Into<String>,
        category: PatternCategory,
        pattern: &str,
    ) -> Result<Self, PatternError> {
        let id = id.into();
        let matcher = Regex::new(pattern).map_err(|e| PatternError::InvalidRegex {
            rule: id.clone(),
            message: e.to_string(),
        })?;
        Ok(Self::from_regex(id, category, matcher))
    }

    fn from_regex(id: String, category: PatternCategory, matcher: Regex) -> Self {
        Self {
            message: format!("matches {}", matcher.as_str()),
            id,
            category,
            matcher,
            exclusion: ContextExclusion::CommentLines,
            severity: Severity::Warning,
            exempt_paths: Vec::new(),
            exempt_categories: Vec::new(),
        }
    }

    pub fn with_exclusion(mut self, exclusion: ContextExclusion) -> Self {
        self.exclusion = exclusion;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_exemptions(mut self, paths: Vec<String>, categories: Vec<Category>) -> Self {
        self.exempt_paths = paths;
        self.exempt_categories = categories;
        self
    }

    /// Unresolved `<<<<<<<`, `=======`, `|||||||`, `>>>>>>>` at line start.
    pub fn conflict_markers() -> Option<Self> {
        let matcher = RE_CONFLICT_MARKER.as_ref()?.clone();
        Some(
            Self::from_regex("conflict-marker".to_string(), PatternCategory::ConflictMarker, matcher)
                .with_exclusion(ContextExclusion::CommentsAndStrings)
                .with_severity(Severity::Defect)
                .with_message("unresolved merge-conflict marker"),
        )
    }

    pub fn suspicious_returns() -> Option<Self> {
        let matcher = RE_SUSPICIOUS_RETURN.as_ref()?.clone();
        Some(
            Self::from_regex(
                "suspicious-return".to_string(),
                PatternCategory::SuspiciousReturn,
                matcher,
            )
            .with_message("function returns null/undefined; callers may not expect it"),
        )
    }

    pub fn forbidden(config: &ForbiddenRuleConfig) -> Result<Self, PatternError> {
        let categories = config
            .exempt_categories
            .iter()
            .map(|name| {
                Category::from_name(name).ok_or_else(|| PatternError::UnknownCategory {
                    rule: config.id.clone(),
                    category: name.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let severity = if config.blocking {
            Severity::Defect
        } else {
            Severity::Warning
        };
        let message = config
            .message
            .clone()
            .unwrap_or_else(|| format!("forbidden reference ({})", config.pattern));

        Ok(
            Self::new(config.id.clone(), PatternCategory::ForbiddenReference, &config.pattern)?
                .with_exclusion(ContextExclusion::CommentsAndStrings)
                .with_severity(severity)
                .with_message(message)
                .with_exemptions(config.exempt_paths.clone(), categories),
        )
    }

    /// Whether the rule skips `doc` entirely.
    pub fn is_exempt(&self, doc: &Document) -> bool {
        if self.exempt_categories.contains(&doc.category) {
            return true;
        }
        let rooted = format!("/{}", doc.path);
        self.exempt_paths.iter().any(|fragment| rooted.contains(fragment.as_str()))
    }
}

/// Ordered collection of rules applied by the scanner.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    rules: Vec<PatternRule>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conflict markers and suspicious returns.
    pub fn builtin() -> Self {
        let rules = [PatternRule::conflict_markers(), PatternRule::suspicious_returns()]
            .into_iter()
            .flatten()
            .collect();
        Self { rules }
    }

    pub fn from_config(config: &PatternsConfig) -> Result<Self, PatternError> {
        let mut set = Self::new();
        if config.effective_conflict_markers() {
            set.rules.extend(PatternRule::conflict_markers());
        }
        for forbidden in config.effective_forbidden() {
            set.rules.push(PatternRule::forbidden(&forbidden)?);
        }
        if config.effective_suspicious_returns() {
            set.rules.extend(PatternRule::suspicious_returns());
        }
        Ok(set)
    }

    pub fn with_rule(mut self, rule: PatternRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
