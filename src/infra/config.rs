use camino::Utf8PathBuf;
use indexmap::IndexMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};
use crate::core::normalize::default_aliases;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config
{
    /// Dataset source locations
    #[serde(default)]
    pub datasets: DatasetsConfig,

    /// Extra header aliases applied on top of the built-in map
    /// (legacy header → canonical header)
    #[serde(default)]
    pub aliases: IndexMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetsConfig
{
    /// School table CSV
    pub schools: Utf8PathBuf,

    /// Related-articles table CSV
    pub articles: Utf8PathBuf,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self { datasets: DatasetsConfig::default(), aliases: IndexMap::new() }
    }
}

impl Default for DatasetsConfig
{
    fn default() -> Self
    {
        Self {
            schools: Utf8PathBuf::from("database - 學校資料.csv"),
            articles: Utf8PathBuf::from("database - 相關文章.csv"),
        }
    }
}

impl Config
{
    /// Full alias map in effect: built-in aliases extended (and
    /// possibly overridden) by the config's `[aliases]` table.
    pub fn alias_map(&self) -> IndexMap<String, String>
    {
        let mut map = default_aliases();
        for (from, to) in &self.aliases
        {
            map.insert(from.clone(), to.clone());
        }
        map
    }
}

pub fn load_config() -> Result<Config>
{
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    let config_paths = ["schoolscout.toml", ".schoolscout.toml"];

    for path in &config_paths
    {
        if std::path::Path::new(path).exists()
        {
            builder = builder.add_source(config::File::with_name(path));
            break;
        }
    }

    // Add environment variables with SCHOOLSCOUT_ prefix
    builder = builder.add_source(config::Environment::with_prefix("SCHOOLSCOUT").separator("_"));

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join("schoolscout.toml");

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
