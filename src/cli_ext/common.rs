//! Shared plumbing for command handlers: source-path resolution and
//! dataset loading against the layered config.

use std::sync::Arc;

use anyhow::Result;
use camino::Utf8PathBuf;

use crate::core::schema::Dataset;
use crate::infra::{config::Config, load};

/// Resolve the two source paths: CLI wins, else config; `~` and
/// environment variables are expanded in either case.
pub fn resolve_sources(
    schools: Option<Utf8PathBuf>,
    articles: Option<Utf8PathBuf>,
    cfg: &Config,
) -> (Utf8PathBuf, Utf8PathBuf) {
    let expand = |p: Utf8PathBuf| Utf8PathBuf::from(shellexpand::tilde(p.as_str()).into_owned());

    (
        expand(schools.unwrap_or_else(|| cfg.datasets.schools.clone())),
        expand(articles.unwrap_or_else(|| cfg.datasets.articles.clone())),
    )
}

/// Load the normalized snapshot for a command invocation.
pub fn load_snapshot(
    schools: Option<Utf8PathBuf>,
    articles: Option<Utf8PathBuf>,
    cfg: &Config,
) -> Result<Arc<Dataset>> {
    let (schools_path, articles_path) = resolve_sources(schools, articles, cfg);
    let dataset = load::load_dataset(&schools_path, &articles_path, &cfg.alias_map())?;
    Ok(dataset)
}
