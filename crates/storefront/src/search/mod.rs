//! Full-text product search using Tantivy.
//!
//! The index lives in memory and is built once at startup from the catalog.
//! Titles, descriptions and tags are indexed with an English stemmer; longer
//! query terms also match with one typo, short terms match as prefixes.

mod indexer;

use std::sync::Arc;

use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, FuzzyTermQuery, Occur, Query, RegexQuery, TermQuery};
use tantivy::schema::{
    FAST, Field, INDEXED, IndexRecordOption, STORED, Schema, TextFieldIndexing, TextOptions,
    Value,
};
use tantivy::tokenizer::TokenStream;
use tantivy::{Index, IndexReader, ReloadPolicy, Term};
use tracing::instrument;

use bazaar_core::ProductId;

use crate::services::Catalog;

/// Name of the stemming tokenizer registered on the index.
const STEM_TOKENIZER: &str = "en_stem";

/// Terms shorter than this are matched as prefixes instead of fuzzily.
const MIN_FUZZY_LENGTH: usize = 3;

/// A matching product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub product_id: ProductId,
    pub price_cents: u64,
    pub score: f32,
}

/// Schema field handles for the search index.
#[derive(Clone)]
pub struct SearchFields {
    pub product_id: Field,
    pub price_cents: Field,
    pub title_text: Field,
    pub description_text: Field,
    pub tags_text: Field,
}

struct ReadyIndex {
    index: Index,
    reader: IndexReader,
    fields: SearchFields,
}

/// The product search index.
#[derive(Clone)]
pub struct SearchIndex {
    inner: Arc<ReadyIndex>,
}

impl SearchIndex {
    /// Build the index from every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Build` if the index cannot be written.
    pub fn build(catalog: &Catalog) -> Result<Self, SearchError> {
        let (index, fields) = indexer::build_index(catalog)?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| SearchError::Index(format!("Failed to create reader: {e}")))?;

        Ok(Self {
            inner: Arc::new(ReadyIndex {
                index,
                reader,
                fields,
            }),
        })
    }

    /// Build the schema for the search index.
    pub(crate) fn build_schema() -> (Schema, SearchFields) {
        let mut schema_builder = Schema::builder();

        let product_id = schema_builder.add_u64_field("product_id", INDEXED | STORED);
        let price_cents = schema_builder.add_u64_field("price_cents", STORED | FAST);

        let text_indexing = TextFieldIndexing::default()
            .set_tokenizer(STEM_TOKENIZER)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions);
        let text_options = TextOptions::default().set_indexing_options(text_indexing);

        let title_text = schema_builder.add_text_field("title_text", text_options.clone());
        let description_text =
            schema_builder.add_text_field("description_text", text_options.clone());
        let tags_text = schema_builder.add_text_field("tags_text", text_options);

        let fields = SearchFields {
            product_id,
            price_cents,
            title_text,
            description_text,
            tags_text,
        };
        (schema_builder.build(), fields)
    }

    /// Search products matching the query.
    ///
    /// A blank query returns no hits.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Query` if the search fails.
    #[instrument(skip(self))]
    pub fn search(
        &self,
        query_str: &str,
        sort: SearchSort,
        limit: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let query_str = query_str.trim().to_lowercase();
        if query_str.is_empty() {
            return Ok(Vec::new());
        }

        let ready = &self.inner;
        let fields = &ready.fields;
        let mut subqueries: Vec<(Occur, Box<dyn Query>)> = Vec::new();

        for word in query_str.split_whitespace() {
            if word.chars().count() < MIN_FUZZY_LENGTH {
                // Prefix match (e.g., "mu" matches "mug")
                let prefix_pattern = format!("{}.*", escape_regex(word));
                for field in [fields.title_text, fields.tags_text] {
                    if let Ok(regex_query) = RegexQuery::from_pattern(&prefix_pattern, field) {
                        subqueries.push((Occur::Should, Box::new(regex_query)));
                    }
                }
                continue;
            }

            for term in self.stem(word) {
                let title_term = Term::from_field_text(fields.title_text, &term);
                subqueries.push((
                    Occur::Should,
                    Box::new(TermQuery::new(title_term.clone(), IndexRecordOption::Basic)),
                ));
                subqueries.push((
                    Occur::Should,
                    Box::new(FuzzyTermQuery::new(title_term, 1, true)),
                ));

                let desc_term = Term::from_field_text(fields.description_text, &term);
                subqueries.push((
                    Occur::Should,
                    Box::new(FuzzyTermQuery::new(desc_term, 1, true)),
                ));

                let tags_term = Term::from_field_text(fields.tags_text, &term);
                subqueries.push((
                    Occur::Should,
                    Box::new(TermQuery::new(tags_term, IndexRecordOption::Basic)),
                ));
            }
        }

        if subqueries.is_empty() {
            return Ok(Vec::new());
        }

        let query = BooleanQuery::new(subqueries);
        let searcher = ready.reader.searcher();
        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit.max(1)))
            .map_err(|e| SearchError::Query(format!("Search failed: {e}")))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc = searcher
                .doc::<tantivy::TantivyDocument>(doc_address)
                .map_err(|e| SearchError::Query(format!("Failed to retrieve doc: {e}")))?;

            let get_u64 = |field: Field| doc.get_first(field).and_then(|v| v.as_u64());
            let id = get_u64(fields.product_id)
                .and_then(|id| i32::try_from(id).ok())
                .ok_or_else(|| SearchError::Query("Document without product id".to_string()))?;

            hits.push(SearchHit {
                product_id: ProductId::new(id),
                price_cents: get_u64(fields.price_cents).unwrap_or(0),
                score,
            });
        }

        sort.apply(&mut hits);
        Ok(hits)
    }

    /// Run a word through the index's stemming analyzer.
    fn stem(&self, word: &str) -> Vec<String> {
        let Some(mut analyzer) = self.inner.index.tokenizers().get(STEM_TOKENIZER) else {
            return vec![word.to_string()];
        };
        let mut terms = Vec::new();
        let mut stream = analyzer.token_stream(word);
        while stream.advance() {
            terms.push(stream.token().text.clone());
        }
        terms
    }

    /// Get the number of documents in the index.
    #[must_use]
    pub fn num_docs(&self) -> u64 {
        self.inner.reader.searcher().num_docs()
    }
}

/// Escape regex metacharacters in a user-supplied term.
fn escape_regex(term: &str) -> String {
    term.chars()
        .flat_map(|c| match c {
            '.' | '*' | '+' | '?' | '^' | '$' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\' => {
                vec!['\\', c]
            }
            _ => vec![c],
        })
        .collect()
}

/// Search sort order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SearchSort {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
}

impl SearchSort {
    /// Parse from URL parameter value.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            _ => Self::Relevance,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }

    fn apply(self, hits: &mut [SearchHit]) {
        match self {
            Self::Relevance => {}
            Self::PriceAsc => hits.sort_by_key(|hit| hit.price_cents),
            Self::PriceDesc => hits.sort_by(|a, b| b.price_cents.cmp(&a.price_cents)),
        }
    }
}

/// Search errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Index error: {0}")]
    Index(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Build error: {0}")]
    Build(String),
}
