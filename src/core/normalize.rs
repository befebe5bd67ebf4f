//! Dataset normalizer: raw tabular input → typed records.
//!
//! Runs once per dataset version and is deterministic: the same raw
//! tables always produce the same `Dataset`. Structural problems
//! (unreadable source, missing required column) are fatal; individual
//! bad cells are coerced to safe defaults and never abort a load.

use std::collections::HashSet;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, instrument, trace};

use crate::core::schema::{
    ArticleRecord, Dataset, GradeCounts, SchoolRecord, YES, canonical_name, columns,
    is_informative,
};

/// Fatal load-time errors. Either both tables normalize successfully or
/// the caller gets one of these and must not proceed to filtering.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DataError {
    /// Source file missing or unreadable.
    #[error("cannot read data source {path}")]
    #[diagnostic(
        code(schoolscout::source_unreadable),
        help("check that the file exists next to the binary or set the path in schoolscout.toml")
    )]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Source exists but is not a parsable CSV table.
    #[error("{path} is not a parsable CSV table: {detail}")]
    #[diagnostic(code(schoolscout::source_malformed))]
    Malformed { path: String, detail: String },

    /// A structurally required column is absent from the header row.
    #[error("{table} is missing the required column {column:?}")]
    #[diagnostic(
        code(schoolscout::missing_column),
        help("column headers may have drifted; map legacy names with an [aliases] entry in schoolscout.toml")
    )]
    MissingColumn { table: String, column: String },
}

/// Process exit codes for fatal data errors.
/// 0=success, 1=generic, 2=unreadable, 3=malformed, 4=missing column
pub fn exit_code_for(e: &DataError) -> i32 {
    match e {
        DataError::Unreadable { .. } => 2,
        DataError::Malformed { .. } => 3,
        DataError::MissingColumn { .. } => 4,
    }
}

/// A parsed-but-unnormalized table: trimmed headers plus string rows.
/// Produced by `infra::io`, consumed only by this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// Label used in error messages, normally the source path.
    pub source: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(source: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = headers.into_iter().map(|h| h.trim().to_string()).collect();
        Self { source: source.into(), headers, rows }
    }
}

/// Built-in header alias map: legacy column name → canonical name.
/// Config can extend this for further header drift.
pub fn default_aliases() -> IndexMap<String, String> {
    IndexMap::from([
        ("學校類別1".to_string(), columns::FUNDING_TYPE.to_string()),
        ("學校類別2".to_string(), columns::SESSION_TYPE.to_string()),
    ])
}

/// Normalize both raw tables into the immutable dataset snapshot.
///
/// `aliases` is the full alias map (start from `default_aliases` and
/// extend); it is applied to headers before any column lookup.
#[instrument(skip_all, fields(schools = schools.rows.len(), articles = articles.rows.len()))]
pub fn normalize(
    schools: &RawTable,
    articles: &RawTable,
    aliases: &IndexMap<String, String>,
) -> Result<Dataset, DataError> {
    let schools = normalize_schools(schools, aliases)?;
    let articles = normalize_articles(articles, aliases)?;
    debug!(schools = schools.len(), articles = articles.len(), "normalized dataset");
    Ok(Dataset { schools, articles })
}

/// Resolved column positions for the school table. Required columns
/// fail the load when absent; everything else degrades to defaults.
struct SchoolCols {
    name: usize,
    region: usize,
    funding_type: usize,
    session_type: usize,
    gender: usize,
    religion: usize,
    teaching_language: usize,
    net: usize,

    tuition_fee: Option<usize>,
    building_fee: Option<usize>,
    pta_fee: Option<usize>,
    site_area: Option<usize>,

    g1_tests: Option<usize>,
    g1_exams: Option<usize>,
    g26_tests: Option<usize>,
    g26_exams: Option<usize>,

    classes_this_year: [Option<usize>; 7],
    classes_last_year: [Option<usize>; 7],

    through_train: Option<usize>,
    feeder: Option<usize>,
    linked: Option<usize>,
    school_bus: Option<usize>,
    nanny_van: Option<usize>,
    diverse_assessment: Option<usize>,
    tutorial_session: Option<usize>,

    masters_pct: Option<usize>,
    seniority_pct: Option<usize>,
    sen_training_pct: Option<usize>,
    teacher_count: Option<usize>,

    address: Option<usize>,
    phone: Option<usize>,
    fax: Option<usize>,
    email: Option<usize>,
    website: Option<usize>,
    principal: Option<usize>,
    supervisor: Option<usize>,
    mission: Option<usize>,
    facilities: Option<usize>,
    teacher_development: Option<usize>,
}

/// Apply the alias map to one trimmed header.
fn resolve_header<'a>(header: &'a str, aliases: &'a IndexMap<String, String>) -> &'a str {
    aliases.get(header).map(String::as_str).unwrap_or(header)
}

/// Index of a required column, or the fatal error naming it.
fn require(
    headers: &[String],
    aliases: &IndexMap<String, String>,
    table: &str,
    column: &str,
) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| resolve_header(h, aliases) == column)
        .ok_or_else(|| DataError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        })
}

/// Index of an optional column.
fn find(headers: &[String], aliases: &IndexMap<String, String>, column: &str) -> Option<usize> {
    headers.iter().position(|h| resolve_header(h, aliases) == column)
}

fn normalize_schools(
    raw: &RawTable,
    aliases: &IndexMap<String, String>,
) -> Result<Vec<SchoolRecord>, DataError> {
    let h = &raw.headers;
    let req = |c| require(h, aliases, &raw.source, c);
    let opt = |c| find(h, aliases, c);

    let cols = SchoolCols {
        name: req(columns::NAME)?,
        region: req(columns::REGION)?,
        funding_type: req(columns::FUNDING_TYPE)?,
        session_type: req(columns::SESSION_TYPE)?,
        gender: req(columns::GENDER)?,
        religion: req(columns::RELIGION)?,
        teaching_language: req(columns::TEACHING_LANGUAGE)?,
        net: req(columns::NET)?,

        tuition_fee: opt(columns::TUITION_FEE),
        building_fee: opt(columns::BUILDING_FEE),
        pta_fee: opt(columns::PTA_FEE),
        site_area: opt(columns::SITE_AREA),

        g1_tests: opt(columns::G1_TESTS),
        g1_exams: opt(columns::G1_EXAMS),
        g26_tests: opt(columns::G26_TESTS),
        g26_exams: opt(columns::G26_EXAMS),

        classes_this_year: columns::CLASSES_THIS_YEAR.map(opt),
        classes_last_year: columns::CLASSES_LAST_YEAR.map(opt),

        through_train: opt(columns::THROUGH_TRAIN),
        feeder: opt(columns::FEEDER),
        linked: opt(columns::LINKED),
        school_bus: opt(columns::SCHOOL_BUS),
        nanny_van: opt(columns::NANNY_VAN),
        diverse_assessment: opt(columns::DIVERSE_ASSESSMENT),
        tutorial_session: opt(columns::TUTORIAL_SESSION),

        masters_pct: opt(columns::MASTERS_PCT),
        seniority_pct: opt(columns::SENIORITY_PCT),
        sen_training_pct: opt(columns::SEN_TRAINING_PCT),
        teacher_count: opt(columns::TEACHER_COUNT),

        address: opt(columns::ADDRESS),
        phone: opt(columns::PHONE),
        fax: opt(columns::FAX),
        email: opt(columns::EMAIL),
        website: opt(columns::WEBSITE),
        principal: opt(columns::PRINCIPAL),
        supervisor: opt(columns::SUPERVISOR),
        mission: opt(columns::MISSION),
        facilities: opt(columns::FACILITIES),
        teacher_development: opt(columns::TEACHER_DEVELOPMENT),
    };

    // Headers already consumed by the typed record; anything else goes
    // into `extras` in source order.
    let typed: HashSet<&str> = [
        columns::NAME,
        columns::REGION,
        columns::FUNDING_TYPE,
        columns::SESSION_TYPE,
        columns::GENDER,
        columns::RELIGION,
        columns::TEACHING_LANGUAGE,
        columns::NET,
        columns::TUITION_FEE,
        columns::BUILDING_FEE,
        columns::PTA_FEE,
        columns::SITE_AREA,
        columns::G1_TESTS,
        columns::G1_EXAMS,
        columns::G26_TESTS,
        columns::G26_EXAMS,
        columns::THROUGH_TRAIN,
        columns::FEEDER,
        columns::LINKED,
        columns::SCHOOL_BUS,
        columns::NANNY_VAN,
        columns::DIVERSE_ASSESSMENT,
        columns::TUTORIAL_SESSION,
        columns::MASTERS_PCT,
        columns::SENIORITY_PCT,
        columns::SEN_TRAINING_PCT,
        columns::TEACHER_COUNT,
        columns::ADDRESS,
        columns::PHONE,
        columns::FAX,
        columns::EMAIL,
        columns::WEBSITE,
        columns::PRINCIPAL,
        columns::SUPERVISOR,
        columns::MISSION,
        columns::FACILITIES,
        columns::TEACHER_DEVELOPMENT,
    ]
    .into_iter()
    .chain(columns::CLASSES_THIS_YEAR)
    .chain(columns::CLASSES_LAST_YEAR)
    .collect();

    let mut out = Vec::with_capacity(raw.rows.len());

    for row in &raw.rows {
        let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("");
        let text = |i: Option<usize>| i.map(cell).map(clean_text).unwrap_or_default();
        let amount = |i: Option<usize>| i.map(cell).map(coerce_amount).unwrap_or(0.0);
        let count = |i: Option<usize>| i.map(cell).map(coerce_count).unwrap_or(0);
        let flag = |i: Option<usize>| i.map(cell).is_some_and(|v| v.trim() == YES);

        let name = canonical_name(cell(cols.name));
        if name.is_empty() {
            // A school row without a name cannot be joined or shown.
            trace!(source = %raw.source, "skipping row with empty name");
            continue;
        }

        let through_train_secondary = text(cols.through_train);
        let feeder_secondary = text(cols.feeder);
        let linked_secondary = text(cols.linked);

        let mut record = SchoolRecord {
            name,
            region: clean_text(cell(cols.region)),
            funding_type: clean_text(cell(cols.funding_type)),
            session_type: clean_text(cell(cols.session_type)),
            gender: clean_text(cell(cols.gender)),
            religion: clean_text(cell(cols.religion)),
            teaching_language: clean_text(cell(cols.teaching_language)),
            net: clean_text(cell(cols.net)),

            tuition_fee: amount(cols.tuition_fee),
            building_fee: amount(cols.building_fee),
            pta_fee: amount(cols.pta_fee),
            site_area: amount(cols.site_area),

            g1_tests: count(cols.g1_tests),
            g1_exams: count(cols.g1_exams),
            g26_tests: count(cols.g26_tests),
            g26_exams: count(cols.g26_exams),

            classes_this_year: grade_counts(&cols.classes_this_year, row),
            classes_last_year: grade_counts(&cols.classes_last_year, row),

            has_through_train: is_informative(&through_train_secondary),
            has_feeder: is_informative(&feeder_secondary),
            has_linked: is_informative(&linked_secondary),
            through_train_secondary,
            feeder_secondary,
            linked_secondary,

            has_school_bus: flag(cols.school_bus),
            has_nanny_van: flag(cols.nanny_van),
            diverse_assessment: flag(cols.diverse_assessment),
            tutorial_session: flag(cols.tutorial_session),

            masters_pct: amount(cols.masters_pct),
            seniority_pct: amount(cols.seniority_pct),
            sen_training_pct: amount(cols.sen_training_pct),
            teacher_count: count(cols.teacher_count),

            address: text(cols.address),
            phone: text(cols.phone),
            fax: text(cols.fax),
            email: text(cols.email),
            website: text(cols.website),
            principal: text(cols.principal),
            supervisor: text(cols.supervisor),
            mission: text(cols.mission),
            facilities: text(cols.facilities),
            teacher_development: text(cols.teacher_development),

            extras: IndexMap::new(),
        };

        for (i, header) in raw.headers.iter().enumerate() {
            let canonical = resolve_header(header, aliases);
            if !typed.contains(canonical) {
                record.extras.insert(canonical.to_string(), clean_text(cell(i)));
            }
        }

        out.push(record);
    }

    Ok(out)
}

fn normalize_articles(
    raw: &RawTable,
    aliases: &IndexMap<String, String>,
) -> Result<Vec<ArticleRecord>, DataError> {
    let school = require(&raw.headers, aliases, &raw.source, columns::ARTICLE_SCHOOL)?;
    let title = require(&raw.headers, aliases, &raw.source, columns::ARTICLE_TITLE)?;
    let url = require(&raw.headers, aliases, &raw.source, columns::ARTICLE_URL)?;

    let mut out = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("");
        let school_name = canonical_name(cell(school));
        if school_name.is_empty() {
            trace!(source = %raw.source, "skipping article row with empty school name");
            continue;
        }
        out.push(ArticleRecord {
            school_name,
            title: clean_text(cell(title)),
            url: cell(url).trim().to_string(),
        });
    }
    Ok(out)
}

fn grade_counts(cols: &[Option<usize>; 7], row: &[String]) -> GradeCounts {
    let n = |i: usize| {
        cols[i]
            .and_then(|c| row.get(c))
            .map(|v| coerce_count(v))
            .unwrap_or(0)
    };
    GradeCounts {
        p1: n(0),
        p2: n(1),
        p3: n(2),
        p4: n(3),
        p5: n(4),
        p6: n(5),
        total: n(6),
    }
}

fn br_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("static pattern"))
}

/// Normalize one free-text cell: HTML line-break markers become real
/// newlines, placeholder tokens become the empty string, and the result
/// is trimmed.
pub fn clean_text(raw: &str) -> String {
    let replaced = br_re().replace_all(raw, "\n");
    let trimmed = replaced.trim();
    if is_informative(trimmed) {
        trimmed.to_string()
    } else {
        String::new()
    }
}

/// Coerce a currency-like or percentage cell: keep digits and `.`,
/// parse as float, 0 on failure. Always finite and non-negative.
pub fn coerce_amount(raw: &str) -> f64 {
    let filtered: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    match filtered.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

/// Coerce an integer count cell: keep digits, parse, 0 on failure.
pub fn coerce_count(raw: &str) -> u32 {
    let filtered: String = raw.chars().filter(char::is_ascii_digit).collect();
    filtered.parse::<u32>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_strips_currency_noise() {
        assert_eq!(coerce_amount("$1,234 "), 1234.0);
        assert_eq!(coerce_amount("N/A"), 0.0);
        assert_eq!(coerce_amount(""), 0.0);
        assert_eq!(coerce_amount("48.5%"), 48.5);
        // Two decimal points cannot parse; coerces to the default.
        assert_eq!(coerce_amount("1.2.3"), 0.0);
    }

    #[test]
    fn count_defaults_to_zero() {
        assert_eq!(coerce_count("3"), 3);
        assert_eq!(coerce_count(" 2 次"), 2);
        assert_eq!(coerce_count("-"), 0);
        assert_eq!(coerce_count(""), 0);
    }

    #[test]
    fn clean_text_rewrites_breaks_and_placeholders() {
        assert_eq!(clean_text("一行<br>二行"), "一行\n二行");
        assert_eq!(clean_text("a<BR/>b<br />c"), "a\nb\nc");
        assert_eq!(clean_text("  - "), "");
        assert_eq!(clean_text("nan"), "");
    }
}
