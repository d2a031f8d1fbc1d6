//! The seam to text extraction. Format parsing lives outside this crate; the
//! engine only sees `(bytes, format) -> (content, metadata)`.

use crate::error::{ExtractError, Result, SearchError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    pub content: String,
    pub metadata: DocumentMetadata,
}

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Format tags this extractor handles.
    fn formats(&self) -> &[&str];

    async fn extract(&self, data: &[u8], format: &str) -> std::result::Result<ExtractedDocument, ExtractError>;
}

/// Format tag -> extractor. Tags are matched case-insensitively.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self { Self::default() }

    /// Registry with the built-in [`PlainTextExtractor`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PlainTextExtractor);
        registry
    }

    pub fn register<E: Extractor + 'static>(&mut self, extractor: E) {
        let extractor: Arc<dyn Extractor> = Arc::new(extractor);
        for format in extractor.formats() {
            self.extractors.insert(format.to_lowercase(), extractor.clone());
        }
    }

    pub fn get(&self, format: &str) -> Option<Arc<dyn Extractor>> {
        self.extractors.get(&format.to_lowercase()).cloned()
    }

    pub fn supports(&self, format: &str) -> bool { self.extractors.contains_key(&format.to_lowercase()) }

    pub async fn extract(&self, data: &[u8], format: &str) -> Result<ExtractedDocument> {
        let extractor = self.get(format).ok_or_else(|| SearchError::UnsupportedFormat(format.to_string()))?;
        extractor
            .extract(data, format)
            .await
            .map_err(|source| SearchError::ExtractionFailed { format: format.to_string(), source })
    }
}

/// UTF-8 text and Markdown. A leading `# heading` becomes the title.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl Extractor for PlainTextExtractor {
    fn formats(&self) -> &[&str] { &["text", "txt", "md", "markdown"] }

    async fn extract(&self, data: &[u8], format: &str) -> std::result::Result<ExtractedDocument, ExtractError> {
        let content = std::str::from_utf8(data)?.to_string();
        let title = if matches!(format.to_lowercase().as_str(), "md" | "markdown") {
            content
                .lines()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .and_then(|l| l.strip_prefix('#'))
                .map(|h| h.trim_start_matches('#').trim().to_string())
                .filter(|h| !h.is_empty())
        } else {
            None
        };
        Ok(ExtractedDocument { content, metadata: DocumentMetadata { title, properties: BTreeMap::new() } })
    }
}
