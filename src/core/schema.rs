//! Typed record schema for the two tabular sources.
//!
//! Raw CSV rows are stringly and header-addressed; everything downstream
//! of the normalizer works on these structs instead. Field validity and
//! name canonicalization rules live here because both the normalizer and
//! the filter/join engine depend on them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Canonical column headers, as they appear in the source CSVs.
///
/// Legacy headers are mapped onto these by the normalizer's alias table
/// (see `normalize::default_aliases`), so the rest of the crate only
/// ever sees this set.
pub mod columns {
    pub const NAME: &str = "學校名稱";
    pub const REGION: &str = "區域";
    pub const FUNDING_TYPE: &str = "資助類型";
    pub const SESSION_TYPE: &str = "上課時間";
    pub const GENDER: &str = "學生性別";
    pub const RELIGION: &str = "宗教";
    pub const TEACHING_LANGUAGE: &str = "教學語言";
    pub const NET: &str = "校網";

    pub const TUITION_FEE: &str = "學費";
    pub const BUILDING_FEE: &str = "堂費";
    pub const PTA_FEE: &str = "家長教師會費";
    pub const SITE_AREA: &str = "學校佔地面積";

    pub const G1_TESTS: &str = "小一全年測驗次數";
    pub const G1_EXAMS: &str = "小一全年考試次數";
    pub const G26_TESTS: &str = "小二至小六全年測驗次數";
    pub const G26_EXAMS: &str = "小二至小六全年考試次數";

    pub const THROUGH_TRAIN: &str = "一條龍中學";
    pub const FEEDER: &str = "直屬中學";
    pub const LINKED: &str = "聯繫中學";
    pub const SCHOOL_BUS: &str = "校車";
    pub const NANNY_VAN: &str = "保姆車";
    pub const DIVERSE_ASSESSMENT: &str = "多元學習評估";
    pub const TUTORIAL_SESSION: &str = "導修時段";

    pub const MASTERS_PCT: &str = "碩士或以上學歷教師百分率";
    pub const SENIORITY_PCT: &str = "年資十年或以上教師百分率";
    pub const SEN_TRAINING_PCT: &str = "特殊教育培訓教師百分率";
    pub const TEACHER_COUNT: &str = "教師人數";

    pub const ADDRESS: &str = "地址";
    pub const PHONE: &str = "電話";
    pub const FAX: &str = "傳真";
    pub const EMAIL: &str = "電郵";
    pub const WEBSITE: &str = "網址";
    pub const PRINCIPAL: &str = "校長";
    pub const SUPERVISOR: &str = "校監";
    pub const MISSION: &str = "辦學宗旨";
    pub const FACILITIES: &str = "學校設施";
    pub const TEACHER_DEVELOPMENT: &str = "教師專業培訓及發展";

    /// Per-grade class counts, current and previous school year.
    pub const CLASSES_THIS_YEAR: [&str; 7] = [
        "本學年小一班數",
        "本學年小二班數",
        "本學年小三班數",
        "本學年小四班數",
        "本學年小五班數",
        "本學年小六班數",
        "本學年總班數",
    ];
    pub const CLASSES_LAST_YEAR: [&str; 7] = [
        "上學年小一班數",
        "上學年小二班數",
        "上學年小三班數",
        "上學年小四班數",
        "上學年小五班數",
        "上學年小六班數",
        "上學年總班數",
    ];

    // Article table.
    pub const ARTICLE_SCHOOL: &str = "學校名稱";
    pub const ARTICLE_TITLE: &str = "文章標題";
    pub const ARTICLE_URL: &str = "文章連結";
}

/// The exact cell value meaning "yes" for flag columns (school bus,
/// nanny van, diverse assessment, tutorial session).
pub const YES: &str = "有";

/// Placeholder tokens meaning "no data", compared case-insensitively
/// after trimming.
pub const PLACEHOLDERS: [&str; 2] = ["nan", "-"];

/// Collapse runs of Unicode whitespace to a single space and trim.
///
/// This is the join key between the school and article tables; both
/// sides must pass through it before comparison.
pub fn canonical_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A field is informative iff, after trimming, it is non-empty and not
/// a placeholder token. Used for display suppression and for deriving
/// the related-secondary booleans.
pub fn is_informative(value: &str) -> bool {
    let v = value.trim();
    !v.is_empty() && !PLACEHOLDERS.iter().any(|p| v.eq_ignore_ascii_case(p))
}

/// Class counts for one school year across the six grades plus total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCounts {
    pub p1: u32,
    pub p2: u32,
    pub p3: u32,
    pub p4: u32,
    pub p5: u32,
    pub p6: u32,
    pub total: u32,
}

/// One normalized school row.
///
/// Numeric fields are total: unparsable source cells coerce to 0, never
/// to null, so comparisons against them need no missing-value handling.
/// Boolean flags are derived once during normalization instead of being
/// re-derived from sentinel strings at every call site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecord {
    /// Canonical (whitespace-collapsed, trimmed) school name; join key.
    pub name: String,

    // Categorical attributes.
    pub region: String,
    pub funding_type: String,
    pub session_type: String,
    pub gender: String,
    pub religion: String,
    /// School-net code; numeric-looking but kept opaque (codes may
    /// carry non-numeric markers).
    pub net: String,
    pub teaching_language: String,

    // Currency-like amounts, non-negative, 0 when unparsable.
    pub tuition_fee: f64,
    pub building_fee: f64,
    pub pta_fee: f64,
    /// Site area in square metres, non-negative.
    pub site_area: f64,

    // Assessment counts per school year.
    pub g1_tests: u32,
    pub g1_exams: u32,
    pub g26_tests: u32,
    pub g26_exams: u32,

    pub classes_this_year: GradeCounts,
    pub classes_last_year: GradeCounts,

    // Related secondary schools: original text plus derived presence.
    pub through_train_secondary: String,
    pub feeder_secondary: String,
    pub linked_secondary: String,
    pub has_through_train: bool,
    pub has_feeder: bool,
    pub has_linked: bool,

    // Transport and homework-policy flags, derived from the `有` sentinel.
    pub has_school_bus: bool,
    pub has_nanny_van: bool,
    pub diverse_assessment: bool,
    pub tutorial_session: bool,

    // Teacher statistics.
    pub masters_pct: f64,
    pub seniority_pct: f64,
    pub sen_training_pct: f64,
    pub teacher_count: u32,

    // Long-form text, `<br>` markers already rewritten to newlines.
    pub address: String,
    pub phone: String,
    pub fax: String,
    pub email: String,
    pub website: String,
    pub principal: String,
    pub supervisor: String,
    pub mission: String,
    pub facilities: String,
    pub teacher_development: String,

    /// Columns outside the typed set, kept for the detail view.
    /// Insertion order follows the source header order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extras: IndexMap<String, String>,
}

/// One normalized article row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Canonicalized school name; matched by exact equality against
    /// `SchoolRecord::name`.
    pub school_name: String,
    pub title: String,
    /// Expected to be a well-formed link but not validated.
    pub url: String,
}

/// The loaded, immutable snapshot both engine entry points consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub schools: Vec<SchoolRecord>,
    pub articles: Vec<ArticleRecord>,
}

/// Categorical school columns exposed to multi-select filtering and to
/// the `values` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CategoricalField {
    Region,
    Funding,
    Session,
    Gender,
    Religion,
    Language,
    Net,
}

impl CategoricalField {
    /// Borrow the record's value for this field.
    pub fn of<'a>(self, record: &'a SchoolRecord) -> &'a str {
        match self {
            CategoricalField::Region => &record.region,
            CategoricalField::Funding => &record.funding_type,
            CategoricalField::Session => &record.session_type,
            CategoricalField::Gender => &record.gender,
            CategoricalField::Religion => &record.religion,
            CategoricalField::Language => &record.teaching_language,
            CategoricalField::Net => &record.net,
        }
    }

    /// The canonical source column this field is read from.
    pub fn column(self) -> &'static str {
        match self {
            CategoricalField::Region => columns::REGION,
            CategoricalField::Funding => columns::FUNDING_TYPE,
            CategoricalField::Session => columns::SESSION_TYPE,
            CategoricalField::Gender => columns::GENDER,
            CategoricalField::Religion => columns::RELIGION,
            CategoricalField::Language => columns::TEACHING_LANGUAGE,
            CategoricalField::Net => columns::NET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_collapses_irregular_spacing() {
        assert_eq!(canonical_name("  ABC   Primary "), "ABC Primary");
        assert_eq!(canonical_name("ABC Primary"), "ABC Primary");
        assert_eq!(canonical_name("ABC\u{3000}Primary"), "ABC Primary");
        assert_eq!(canonical_name("   "), "");
    }

    #[test]
    fn informative_rejects_placeholders() {
        assert!(is_informative("聖公會小學"));
        assert!(!is_informative(""));
        assert!(!is_informative("   "));
        assert!(!is_informative("-"));
        assert!(!is_informative("nan"));
        assert!(!is_informative("NaN "));
    }
}
