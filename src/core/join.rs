//! Name-keyed lookup from a school into the article table.

use crate::core::schema::{ArticleRecord, canonical_name};

/// All articles whose school name equals `name` under the same
/// canonicalization the normalizer applies. Order follows the article
/// table; an unmatched name yields an empty vector, never an error.
pub fn articles_for<'a>(name: &str, articles: &'a [ArticleRecord]) -> Vec<&'a ArticleRecord> {
    let key = canonical_name(name);
    articles.iter().filter(|a| a.school_name == key).collect()
}
