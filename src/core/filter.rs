//! Multi-criteria filter evaluation over normalized school records.
//!
//! Criteria compose with logical AND across dimensions; within one
//! multi-select dimension membership is OR, and the related-secondary
//! and transport groups are OR internally before being AND-ed with the
//! rest. Unset criteria impose no constraint: filtering with the
//! default criteria returns every record, in input order.

use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::core::schema::{CategoricalField, SchoolRecord};

/// Band over an integer assessment count. `AtMost*` bands are inclusive
/// upper bounds starting from 0, so they overlap; `Exactly*` bands are
/// strict equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AssessmentBand {
    /// No constraint on the count.
    #[default]
    Any,
    /// Count must be exactly 0.
    #[value(name = "0")]
    Exactly0,
    /// Count must be 0 or 1.
    #[value(name = "le1")]
    AtMost1,
    /// Count must be 0, 1 or 2.
    #[value(name = "le2")]
    AtMost2,
    /// Count must be exactly 3.
    #[value(name = "3")]
    Exactly3,
}

impl AssessmentBand {
    pub fn admits(self, count: u32) -> bool {
        match self {
            AssessmentBand::Any => true,
            AssessmentBand::Exactly0 => count == 0,
            AssessmentBand::AtMost1 => count <= 1,
            AssessmentBand::AtMost2 => count <= 2,
            AssessmentBand::Exactly3 => count == 3,
        }
    }
}

/// Kinds of related secondary school a record can carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum RelatedKind {
    ThroughTrain,
    Feeder,
    Linked,
}

/// School-provided transport options.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum TransportKind {
    Bus,
    Van,
}

/// One user-submitted criteria set. Every field is optional in effect:
/// `None`, an empty set, `AssessmentBand::Any`, `false` and `0.0` all
/// mean "unconstrained" for their dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive substring match against the canonical name.
    pub name_query: Option<String>,

    // Multi-select dimensions: record value must be a member (OR),
    // empty set admits everything.
    pub regions: BTreeSet<String>,
    pub funding_types: BTreeSet<String>,
    pub session_types: BTreeSet<String>,
    pub genders: BTreeSet<String>,
    pub religions: BTreeSet<String>,
    pub teaching_languages: BTreeSet<String>,
    pub nets: BTreeSet<String>,

    /// At least one of the selected relation kinds must be present.
    pub related_secondary: BTreeSet<RelatedKind>,
    /// At least one of the selected transport options must be present.
    pub transport: BTreeSet<TransportKind>,

    // Per-field assessment-count bands.
    pub g1_tests: AssessmentBand,
    pub g1_exams: AssessmentBand,
    pub g26_tests: AssessmentBand,
    pub g26_exams: AssessmentBand,

    // Homework-policy flags: when set, the record's flag must be true.
    pub diverse_assessment: bool,
    pub tutorial_session: bool,

    // Percentage thresholds; 0 is indistinguishable from unset.
    pub min_masters_pct: f64,
    pub min_seniority_pct: f64,
    pub min_sen_training_pct: f64,
}

impl FilterCriteria {
    /// Evaluate this criteria set against one record.
    pub fn matches(&self, record: &SchoolRecord) -> bool {
        if let Some(q) = &self.name_query {
            let q = q.trim();
            if !q.is_empty() && !record.name.to_lowercase().contains(&q.to_lowercase()) {
                return false;
            }
        }

        if !member(&self.regions, &record.region)
            || !member(&self.funding_types, &record.funding_type)
            || !member(&self.session_types, &record.session_type)
            || !member(&self.genders, &record.gender)
            || !member(&self.religions, &record.religion)
            || !member(&self.teaching_languages, &record.teaching_language)
            || !member(&self.nets, &record.net)
        {
            return false;
        }

        // OR inside the group: any selected relation kind qualifies.
        if !self.related_secondary.is_empty()
            && !self.related_secondary.iter().any(|k| match k {
                RelatedKind::ThroughTrain => record.has_through_train,
                RelatedKind::Feeder => record.has_feeder,
                RelatedKind::Linked => record.has_linked,
            })
        {
            return false;
        }

        if !self.transport.is_empty()
            && !self.transport.iter().any(|k| match k {
                TransportKind::Bus => record.has_school_bus,
                TransportKind::Van => record.has_nanny_van,
            })
        {
            return false;
        }

        if !self.g1_tests.admits(record.g1_tests)
            || !self.g1_exams.admits(record.g1_exams)
            || !self.g26_tests.admits(record.g26_tests)
            || !self.g26_exams.admits(record.g26_exams)
        {
            return false;
        }

        if self.diverse_assessment && !record.diverse_assessment {
            return false;
        }
        if self.tutorial_session && !record.tutorial_session {
            return false;
        }

        meets(self.min_masters_pct, record.masters_pct)
            && meets(self.min_seniority_pct, record.seniority_pct)
            && meets(self.min_sen_training_pct, record.sen_training_pct)
    }
}

/// Empty selection admits every value.
fn member(selected: &BTreeSet<String>, value: &str) -> bool {
    selected.is_empty() || selected.contains(value)
}

/// Threshold of 0 (or below) means "no constraint applied".
fn meets(threshold: f64, value: f64) -> bool {
    threshold <= 0.0 || value >= threshold
}

/// Return the records matching every specified criterion, preserving
/// input order. Pure: no mutation, no I/O, cannot fail.
#[instrument(skip_all, fields(total = schools.len()))]
pub fn apply<'a>(schools: &'a [SchoolRecord], criteria: &FilterCriteria) -> Vec<&'a SchoolRecord> {
    let hits: Vec<&SchoolRecord> = schools.iter().filter(|s| criteria.matches(s)).collect();
    debug!(hits = hits.len(), "filter evaluated");
    hits
}

/// Sorted, duplicate-free values of one categorical column, skipping
/// blanks. This is what the original UI used to populate its
/// multi-select widgets.
pub fn distinct_values<'a>(
    schools: &'a [SchoolRecord],
    field: CategoricalField,
) -> Vec<&'a str> {
    schools
        .iter()
        .map(|s| field.of(s))
        .filter(|v| !v.is_empty())
        .unique()
        .sorted()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_inclusive_at_most_and_strict_exactly() {
        assert!(AssessmentBand::Any.admits(9));
        assert!(AssessmentBand::Exactly0.admits(0));
        assert!(!AssessmentBand::Exactly0.admits(1));
        assert!(AssessmentBand::AtMost1.admits(0));
        assert!(AssessmentBand::AtMost1.admits(1));
        assert!(!AssessmentBand::AtMost1.admits(2));
        assert!(AssessmentBand::AtMost2.admits(0));
        assert!(!AssessmentBand::AtMost2.admits(3));
        assert!(AssessmentBand::Exactly3.admits(3));
        assert!(!AssessmentBand::Exactly3.admits(2));
    }

    #[test]
    fn zero_threshold_is_unconstrained() {
        assert!(meets(0.0, 0.0));
        assert!(meets(0.0, 99.0));
        assert!(!meets(15.0, 14.9));
        assert!(meets(15.0, 15.0));
    }

    #[test]
    fn empty_selection_admits_all() {
        let none = BTreeSet::new();
        assert!(member(&none, "九龍"));
        let some: BTreeSet<String> = ["九龍".to_string()].into();
        assert!(member(&some, "九龍"));
        assert!(!member(&some, "港島"));
    }
}
