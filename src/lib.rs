//! **schoolscout** - Filtering and presentation engine for a Hong Kong
//! primary-school directory with cross-referenced articles.
//!
//! Two CSV sources (school records, related articles) are normalized
//! once into typed, immutable tables; a pure filter engine evaluates
//! multi-criteria selections over them and a name-keyed join resolves
//! a school's related articles. The CLI is a thin presentation layer
//! over those three entry points.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Core engine - normalization, filtering and joining over typed records
pub mod core {
    /// Typed record schema, canonical columns and sentinel rules
    pub mod schema;
    pub use schema::{ArticleRecord, Dataset, SchoolRecord};

    /// Raw tables → typed records, alias map, coercions, fatal errors
    pub mod normalize;
    pub use normalize::{DataError, RawTable, normalize};

    /// Multi-criteria filter evaluation and distinct-value listing
    pub mod filter;
    pub use filter::{AssessmentBand, FilterCriteria, apply as filter_apply};

    /// Name-keyed lookup into the article table
    pub mod join;
    pub use join::articles_for;
}

/// Infrastructure - Configuration, CSV I/O and cached loading
pub mod infra {
    /// Configuration management with TOML support and header aliases
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// Memory-mapped CSV reading into raw tables
    pub mod io;
    pub use io::read_table;

    /// Content-keyed, cached dataset loading
    pub mod load;
    pub use load::load_dataset;
}

/// CLI command handlers built on the core entry points
pub mod cli_ext {
    mod common;

    /// `filter` command: criteria evaluation and result rendering
    pub mod filter_cmd;

    /// `show` command: per-school detail view with related articles
    pub mod show_cmd;

    /// `values` command: distinct categorical values
    pub mod values_cmd;
}

// Strategic re-exports for clean external use
pub use cli::{AppContext, Cli, Commands};
pub use core::{ArticleRecord, Dataset, DataError, FilterCriteria, SchoolRecord};
pub use infra::{Config, load_config, load_dataset};
