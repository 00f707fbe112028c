//! Keyword-based intent parser.
//!
//! Routes plain-English query text to a backend and operation using fixed
//! keyword tables, and extracts the generic condition slots from simple word
//! patterns. Deliberately shallow: anything the tables don't cover falls back
//! to the defaults (postgres, select).

use async_trait::async_trait;

use fedquery_core::{Backend, Intent, IntentParser, Operation};

/// Resource nouns that both route to a backend and fill the `object` slot.
const RESOURCE_NOUNS: &[&str] = &["users", "user", "sessions", "logs", "journals", "articles", "documents"];

/// Words that introduce the `subject` slot ("find sessions for u-42").
const SUBJECT_MARKERS: &[&str] = &["named", "called", "for", "by"];

/// Backend routing table, checked in order; first hit wins.
const BACKEND_KEYWORDS: &[(Backend, &[&str])] = &[
    (Backend::Postgres, &["postgres", "postgresql", "users", "user", "admin"]),
    (Backend::Mongo, &["mongo", "mongodb", "sessions", "logs"]),
    (Backend::Mysql, &["mysql", "sql", "journals", "articles"]),
    (Backend::Elasticsearch, &["elasticsearch", "es", "search", "full-text"]),
];

/// Operation verb table, checked in order; first hit wins.
const OPERATION_VERBS: &[(Operation, &[&str])] = &[
    (Operation::Select, &["find", "get", "select", "show", "search"]),
    (Operation::Insert, &["insert", "add", "create"]),
    (Operation::Update, &["update", "modify", "change"]),
    (Operation::Delete, &["delete", "remove"]),
];

/// Keyword parser implementing the [`IntentParser`] seam.
#[derive(Debug, Default, Clone)]
pub struct KeywordParser;

impl KeywordParser {
    pub fn new() -> Self {
        Self
    }

    /// Lowercased words with leading/trailing punctuation stripped; inner
    /// hyphens and underscores survive ("u-42", "full-text").
    fn tokenize(text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|word| {
                word.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter(|token| !token.is_empty())
            .collect()
    }

    fn detect_backend(tokens: &[String]) -> Backend {
        for (backend, keywords) in BACKEND_KEYWORDS {
            if tokens.iter().any(|t| keywords.contains(&t.as_str())) {
                return *backend;
            }
        }
        Backend::Postgres
    }

    fn detect_operation(tokens: &[String]) -> Operation {
        for (operation, verbs) in OPERATION_VERBS {
            if tokens.iter().any(|t| verbs.contains(&t.as_str())) {
                return *operation;
            }
        }
        Operation::Select
    }

    fn extract_object(tokens: &[String]) -> Option<String> {
        tokens
            .iter()
            .find(|t| RESOURCE_NOUNS.contains(&t.as_str()))
            .cloned()
    }

    fn extract_subject(tokens: &[String]) -> Option<String> {
        tokens
            .windows(2)
            .find(|pair| SUBJECT_MARKERS.contains(&pair[0].as_str()))
            .map(|pair| pair[1].clone())
    }

    fn extract_role(tokens: &[String]) -> Option<String> {
        tokens
            .windows(2)
            .find(|pair| pair[0] == "role")
            .map(|pair| pair[1].clone())
    }
}

#[async_trait]
impl IntentParser for KeywordParser {
    async fn parse(&self, text: &str) -> Result<Intent, Box<dyn std::error::Error + Send + Sync>> {
        let tokens = Self::tokenize(text);

        let mut intent = Intent::select(Self::detect_backend(&tokens));
        intent.operation = Self::detect_operation(&tokens);
        intent.conditions.subject = Self::extract_subject(&tokens);
        intent.conditions.object = Self::extract_object(&tokens);
        intent.conditions.role = Self::extract_role(&tokens);

        tracing::debug!(
            backend = %intent.backend,
            operation = %intent.operation,
            "parsed query text"
        );
        Ok(intent)
    }
}
