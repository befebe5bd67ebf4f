//! CLI handler for the `values` command: sorted distinct values of one
//! categorical column, the same lists the original dashboard used to
//! populate its multi-select widgets.

use anyhow::{Context, Result};
use serde_json::json;

use crate::cli::{AppContext, ValuesArgs};
use crate::core::filter::distinct_values;
use crate::infra::config::load_config;

use super::common;

pub fn run(args: ValuesArgs, _ctx: &AppContext) -> Result<()> {
    let cfg = load_config().unwrap_or_default();
    let dataset = common::load_snapshot(args.schools.clone(), args.articles.clone(), &cfg)?;

    let values = distinct_values(&dataset.schools, args.field);

    if args.json {
        let payload = json!({
            "column": args.field.column(),
            "values": values,
        });
        println!("{}", serde_json::to_string(&payload).context("serialize values")?);
        return Ok(());
    }

    for value in values {
        println!("{value}");
    }

    Ok(())
}
