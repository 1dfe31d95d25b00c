//! Search index builder.

use tantivy::tokenizer::{Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, TextAnalyzer};
use tantivy::{Index, IndexWriter};
use tracing::{info, instrument};

use crate::services::Catalog;

use super::{STEM_TOKENIZER, SearchError, SearchFields, SearchIndex};

/// Build an in-memory index holding every catalog product.
#[instrument(skip_all)]
pub(super) fn build_index(catalog: &Catalog) -> Result<(Index, SearchFields), SearchError> {
    let (schema, fields) = SearchIndex::build_schema();
    let index = Index::create_in_ram(schema);

    // Register the English stemmer tokenizer
    index.tokenizers().register(
        STEM_TOKENIZER,
        TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(RemoveLongFilter::limit(40))
            .filter(LowerCaser)
            .filter(Stemmer::new(Language::English))
            .build(),
    );

    let mut writer: IndexWriter = index
        .writer(50_000_000) // 50MB buffer
        .map_err(|e| SearchError::Build(format!("Failed to create writer: {e}")))?;

    let mut count = 0;
    for product in catalog.all() {
        let product_id = u64::try_from(product.id.as_i32())
            .map_err(|_| SearchError::Build(format!("Negative product id {}", product.id)))?;
        let price_cents = u64::try_from(product.price.cents()).unwrap_or(0);

        writer
            .add_document(tantivy::doc!(
                fields.product_id => product_id,
                fields.price_cents => price_cents,
                fields.title_text => product.title.as_str(),
                fields.description_text => product.description.as_str(),
                fields.tags_text => product.tags.join(" ")
            ))
            .map_err(|e| SearchError::Build(format!("Failed to add product: {e}")))?;
        count += 1;
    }

    writer
        .commit()
        .map_err(|e| SearchError::Build(format!("Failed to commit index: {e}")))?;

    info!(count, "Search index built");
    Ok((index, fields))
}
