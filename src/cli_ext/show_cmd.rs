//! CLI handler for the `show` command: one school's detail view plus
//! its related articles.
//!
//! Only informative fields are printed; cells that normalized to the
//! empty string (placeholders, missing columns) are suppressed rather
//! than shown as blanks. Duplicate school names are possible in the
//! source, so every record bearing the requested name is shown.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::json;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{AppContext, ShowArgs};
use crate::core::join;
use crate::core::schema::{SchoolRecord, canonical_name, columns};
use crate::infra::config::load_config;

use super::common;

pub fn run(args: ShowArgs, ctx: &AppContext) -> Result<()> {
    let cfg = load_config().unwrap_or_default();
    let dataset = common::load_snapshot(args.schools.clone(), args.articles.clone(), &cfg)?;

    let wanted = canonical_name(&args.name.join(" "));
    let schools: Vec<&SchoolRecord> =
        dataset.schools.iter().filter(|s| s.name == wanted).collect();
    let articles = join::articles_for(&wanted, &dataset.articles);

    if args.json {
        let payload = json!({
            "name": wanted,
            "schools": schools,
            "articles": articles,
        });
        println!("{}", serde_json::to_string(&payload).context("serialize detail view")?);
        return Ok(());
    }

    if schools.is_empty() {
        if !ctx.quiet {
            let notice = format!("No school named {wanted:?} in the dataset.");
            if ctx.no_color {
                println!("{notice}");
            } else {
                println!("{}", notice.yellow());
            }
        }
        return Ok(());
    }

    for school in &schools {
        if !ctx.quiet {
            if ctx.no_color {
                println!("{}", school.name);
            } else {
                println!("{}", school.name.bold());
            }
        }
        let mut table = Table::new(detail_rows(school));
        table.with(Style::psql());
        println!("{table}");
    }

    if articles.is_empty() {
        if !ctx.quiet {
            println!("No related articles for this school.");
        }
        return Ok(());
    }

    if !ctx.quiet {
        println!("Related articles:");
    }
    for article in articles {
        println!("  {} <{}>", article.title, article.url);
    }

    Ok(())
}

#[derive(Tabled)]
struct DetailRow {
    #[tabled(rename = "欄位")]
    field: String,
    #[tabled(rename = "內容")]
    value: String,
}

fn yes_no(flag: bool) -> String {
    if flag { "有".to_string() } else { "無".to_string() }
}

/// Flatten one record into labeled display rows, suppressing fields
/// that normalized to empty.
fn detail_rows(s: &SchoolRecord) -> Vec<DetailRow> {
    let mut rows: Vec<DetailRow> = Vec::new();

    let mut push = |field: &str, value: String| {
        if !value.is_empty() {
            rows.push(DetailRow { field: field.to_string(), value });
        }
    };

    push(columns::REGION, s.region.clone());
    push(columns::FUNDING_TYPE, s.funding_type.clone());
    push(columns::SESSION_TYPE, s.session_type.clone());
    push(columns::GENDER, s.gender.clone());
    push(columns::RELIGION, s.religion.clone());
    push(columns::TEACHING_LANGUAGE, s.teaching_language.clone());
    push(columns::NET, s.net.clone());

    // Numeric fields are total after normalization; always shown.
    push(columns::TUITION_FEE, s.tuition_fee.to_string());
    push(columns::BUILDING_FEE, s.building_fee.to_string());
    push(columns::PTA_FEE, s.pta_fee.to_string());
    push(columns::SITE_AREA, s.site_area.to_string());

    push(columns::G1_TESTS, s.g1_tests.to_string());
    push(columns::G1_EXAMS, s.g1_exams.to_string());
    push(columns::G26_TESTS, s.g26_tests.to_string());
    push(columns::G26_EXAMS, s.g26_exams.to_string());

    let classes = |c: &crate::core::schema::GradeCounts| {
        format!(
            "{}/{}/{}/{}/{}/{} (總數 {})",
            c.p1, c.p2, c.p3, c.p4, c.p5, c.p6, c.total
        )
    };
    push("本學年班數", classes(&s.classes_this_year));
    push("上學年班數", classes(&s.classes_last_year));

    push(columns::THROUGH_TRAIN, s.through_train_secondary.clone());
    push(columns::FEEDER, s.feeder_secondary.clone());
    push(columns::LINKED, s.linked_secondary.clone());

    push(columns::SCHOOL_BUS, yes_no(s.has_school_bus));
    push(columns::NANNY_VAN, yes_no(s.has_nanny_van));
    push(columns::DIVERSE_ASSESSMENT, yes_no(s.diverse_assessment));
    push(columns::TUTORIAL_SESSION, yes_no(s.tutorial_session));

    push(columns::MASTERS_PCT, format!("{}%", s.masters_pct));
    push(columns::SENIORITY_PCT, format!("{}%", s.seniority_pct));
    push(columns::SEN_TRAINING_PCT, format!("{}%", s.sen_training_pct));
    if s.teacher_count > 0 {
        push(columns::TEACHER_COUNT, s.teacher_count.to_string());
    }

    push(columns::ADDRESS, s.address.clone());
    push(columns::PHONE, s.phone.clone());
    push(columns::FAX, s.fax.clone());
    push(columns::EMAIL, s.email.clone());
    push(columns::WEBSITE, s.website.clone());
    push(columns::PRINCIPAL, s.principal.clone());
    push(columns::SUPERVISOR, s.supervisor.clone());
    push(columns::MISSION, s.mission.clone());
    push(columns::FACILITIES, s.facilities.clone());
    push(columns::TEACHER_DEVELOPMENT, s.teacher_development.clone());

    for (field, value) in &s.extras {
        push(field, value.clone());
    }

    rows
}
