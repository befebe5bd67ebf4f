//! CLI handler for the `filter` command.
//!
//! Builds a `FilterCriteria` from the parsed flags, evaluates it over
//! the loaded snapshot and renders the hits as a text table, JSON or
//! CSV, optionally delivering to a file or the clipboard.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::json;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{AppContext, FilterArgs, OutputFormat};
use crate::core::filter::{self, FilterCriteria};
use crate::core::schema::SchoolRecord;
use crate::infra::config::load_config;

use super::common;

pub fn run(args: FilterArgs, ctx: &AppContext) -> Result<()> {
    let cfg = load_config().unwrap_or_default();
    let dataset = common::load_snapshot(args.schools.clone(), args.articles.clone(), &cfg)?;

    let criteria = criteria_from_args(&args);
    let hits = filter::apply(&dataset.schools, &criteria);

    if hits.is_empty() && matches!(args.format, OutputFormat::Text) {
        if !ctx.quiet {
            let notice = "No schools matched the given criteria.";
            if ctx.no_color {
                println!("{notice}");
            } else {
                println!("{}", notice.yellow());
            }
        }
        return Ok(());
    }

    let rendered = match args.format {
        OutputFormat::Text => render_table(&hits),
        OutputFormat::Json => render_json(&criteria, &hits)?,
        OutputFormat::Csv => render_csv(&hits)?,
    };

    deliver(rendered, &args, ctx)
}

/// Translate the flat CLI flags into the engine's criteria object.
/// Unset flags stay at their unconstrained defaults.
pub fn criteria_from_args(args: &FilterArgs) -> FilterCriteria {
    FilterCriteria {
        name_query: args.name.clone(),
        regions: args.regions.iter().cloned().collect(),
        funding_types: args.funding_types.iter().cloned().collect(),
        session_types: args.session_types.iter().cloned().collect(),
        genders: args.genders.iter().cloned().collect(),
        religions: args.religions.iter().cloned().collect(),
        teaching_languages: args.teaching_languages.iter().cloned().collect(),
        nets: args.nets.iter().cloned().collect(),
        related_secondary: args.related.iter().copied().collect(),
        transport: args.transport.iter().copied().collect(),
        g1_tests: args.g1_tests,
        g1_exams: args.g1_exams,
        g26_tests: args.g26_tests,
        g26_exams: args.g26_exams,
        diverse_assessment: args.diverse_assessment,
        tutorial_session: args.tutorial,
        // Negative thresholds behave as unset, same as 0.
        min_masters_pct: args.min_masters.max(0.0),
        min_seniority_pct: args.min_seniority.max(0.0),
        min_sen_training_pct: args.min_sen_training.max(0.0),
    }
}

/// Summary row for the result table; the full record is available via
/// `--format json` or the `show` command.
#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "學校名稱")]
    name: String,
    #[tabled(rename = "區域")]
    region: String,
    #[tabled(rename = "資助類型")]
    funding: String,
    #[tabled(rename = "上課時間")]
    session: String,
    #[tabled(rename = "學生性別")]
    gender: String,
    #[tabled(rename = "宗教")]
    religion: String,
    #[tabled(rename = "教學語言")]
    language: String,
    #[tabled(rename = "校網")]
    net: String,
}

fn render_table(hits: &[&SchoolRecord]) -> String {
    let rows: Vec<ResultRow> = hits
        .iter()
        .map(|s| ResultRow {
            name: s.name.clone(),
            region: s.region.clone(),
            funding: s.funding_type.clone(),
            session: s.session_type.clone(),
            gender: s.gender.clone(),
            religion: s.religion.clone(),
            language: s.teaching_language.clone(),
            net: s.net.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    format!("{table}\n{} school(s) matched", hits.len())
}

fn render_json(criteria: &FilterCriteria, hits: &[&SchoolRecord]) -> Result<String> {
    let payload = json!({
        "criteria": criteria,
        "total": hits.len(),
        "schools": hits,
    });
    serde_json::to_string(&payload).context("serialize filter results")
}

fn render_csv(hits: &[&SchoolRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record([
        "學校名稱",
        "區域",
        "資助類型",
        "上課時間",
        "學生性別",
        "宗教",
        "教學語言",
        "校網",
        "學費",
        "堂費",
        "家長教師會費",
        "校車",
        "保姆車",
    ])?;

    for s in hits {
        writer.write_record([
            s.name.as_str(),
            s.region.as_str(),
            s.funding_type.as_str(),
            s.session_type.as_str(),
            s.gender.as_str(),
            s.religion.as_str(),
            s.teaching_language.as_str(),
            s.net.as_str(),
            &s.tuition_fee.to_string(),
            &s.building_fee.to_string(),
            &s.pta_fee.to_string(),
            if s.has_school_bus { "有" } else { "無" },
            if s.has_nanny_van { "有" } else { "無" },
        ])?;
    }

    let bytes = writer.into_inner().context("flush csv output")?;
    String::from_utf8(bytes).context("csv output is valid utf-8")
}

fn deliver(rendered: String, args: &FilterArgs, ctx: &AppContext) -> Result<()> {
    if let Some(path) = &args.output {
        std::fs::write(path, &rendered).with_context(|| format!("write output to {path}"))?;
        if !ctx.quiet {
            eprintln!("Wrote {} bytes to {path}", rendered.len());
        }
        return Ok(());
    }

    if args.clipboard {
        let mut clipboard = arboard::Clipboard::new().context("open clipboard")?;
        clipboard.set_text(rendered).context("copy output to clipboard")?;
        if !ctx.quiet {
            eprintln!("Copied filter output to clipboard");
        }
        return Ok(());
    }

    println!("{rendered}");
    Ok(())
}
