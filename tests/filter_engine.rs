//! Filter engine semantics: AND across dimensions, OR within groups,
//! band and threshold edge cases, stable ordering.

use std::collections::BTreeSet;

use schoolscout::core::filter::{
    AssessmentBand, FilterCriteria, RelatedKind, TransportKind, apply, distinct_values,
};
use schoolscout::core::schema::{CategoricalField, SchoolRecord};

fn school(name: &str) -> SchoolRecord {
    SchoolRecord { name: name.to_string(), ..Default::default() }
}

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// The two-school scenario used throughout: A in Kowloon with a school
/// bus, B on the island without one.
fn sample() -> Vec<SchoolRecord> {
    let mut a = school("A");
    a.region = "九龍".to_string();
    a.has_school_bus = true;

    let mut b = school("B");
    b.region = "港島".to_string();

    vec![a, b]
}

#[test]
fn open_criteria_return_everything_in_order() {
    let schools = sample();

    let hits = apply(&schools, &FilterCriteria::default());

    let names: Vec<&str> = hits.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn region_membership_selects_subset() {
    let schools = sample();

    let criteria = FilterCriteria { regions: set(&["九龍"]), ..Default::default() };
    let hits = apply(&schools, &criteria);

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "A");
}

#[test]
fn dimensions_compose_with_and() {
    let schools = sample();

    // Region admits A, but the transport requirement rejects B only;
    // combined they still yield A.
    let criteria = FilterCriteria {
        regions: set(&["九龍", "港島"]),
        transport: BTreeSet::from([TransportKind::Bus]),
        ..Default::default()
    };
    let hits = apply(&schools, &criteria);

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "A");
}

#[test]
fn transport_group_is_or_composed() {
    let mut bus_only = school("bus-only");
    bus_only.has_school_bus = true;
    let schools = vec![bus_only];

    // Selecting both options still admits a school with just one.
    let both = FilterCriteria {
        transport: BTreeSet::from([TransportKind::Bus, TransportKind::Van]),
        ..Default::default()
    };
    assert_eq!(apply(&schools, &both).len(), 1);

    // Selecting only the missing option excludes it.
    let van_only = FilterCriteria {
        transport: BTreeSet::from([TransportKind::Van]),
        ..Default::default()
    };
    assert!(apply(&schools, &van_only).is_empty());
}

#[test]
fn related_secondary_group_is_or_composed() {
    let mut feeder = school("feeder");
    feeder.has_feeder = true;
    let schools = vec![feeder];

    let any_relation = FilterCriteria {
        related_secondary: BTreeSet::from([
            RelatedKind::ThroughTrain,
            RelatedKind::Feeder,
            RelatedKind::Linked,
        ]),
        ..Default::default()
    };
    assert_eq!(apply(&schools, &any_relation).len(), 1);

    let through_train_only = FilterCriteria {
        related_secondary: BTreeSet::from([RelatedKind::ThroughTrain]),
        ..Default::default()
    };
    assert!(apply(&schools, &through_train_only).is_empty());
}

#[test]
fn bands_are_inclusive_and_overlapping() {
    let schools: Vec<SchoolRecord> = (0u32..=4)
        .map(|n| {
            let mut s = school(&format!("tests-{n}"));
            s.g1_tests = n;
            s
        })
        .collect();

    let with_band = |band| {
        let criteria = FilterCriteria { g1_tests: band, ..Default::default() };
        apply(&schools, &criteria)
            .into_iter()
            .map(|s| s.g1_tests)
            .collect::<Vec<_>>()
    };

    assert_eq!(with_band(AssessmentBand::Exactly0), vec![0]);
    assert_eq!(with_band(AssessmentBand::AtMost1), vec![0, 1]);
    assert_eq!(with_band(AssessmentBand::AtMost2), vec![0, 1, 2]);
    assert_eq!(with_band(AssessmentBand::Exactly3), vec![3]);
    assert_eq!(with_band(AssessmentBand::Any).len(), 5);

    // Band monotonicity: the wider at-most band is a superset.
    let exactly0 = with_band(AssessmentBand::Exactly0);
    let at_most2 = with_band(AssessmentBand::AtMost2);
    assert!(exactly0.iter().all(|n| at_most2.contains(n)));
}

#[test]
fn threshold_zero_is_unconstrained_and_boundary_is_inclusive() {
    let mut low = school("low");
    low.masters_pct = 14.9;
    let mut high = school("high");
    high.masters_pct = 15.0;
    let schools = vec![low, high];

    let unconstrained = FilterCriteria { min_masters_pct: 0.0, ..Default::default() };
    assert_eq!(apply(&schools, &unconstrained).len(), 2);

    let fifteen = FilterCriteria { min_masters_pct: 15.0, ..Default::default() };
    let hits = apply(&schools, &fifteen);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "high");
}

#[test]
fn name_query_is_case_insensitive_substring() {
    let schools = vec![school("ABC Primary"), school("XYZ Primary")];

    let criteria =
        FilterCriteria { name_query: Some("abc".to_string()), ..Default::default() };
    let hits = apply(&schools, &criteria);

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "ABC Primary");

    // Whitespace-only queries impose no constraint.
    let blank = FilterCriteria { name_query: Some("   ".to_string()), ..Default::default() };
    assert_eq!(apply(&schools, &blank).len(), 2);
}

#[test]
fn homework_policy_flags_require_true() {
    let mut diverse = school("diverse");
    diverse.diverse_assessment = true;
    let plain = school("plain");
    let schools = vec![diverse, plain];

    let criteria = FilterCriteria { diverse_assessment: true, ..Default::default() };
    let hits = apply(&schools, &criteria);

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "diverse");
}

#[test]
fn distinct_values_are_sorted_and_deduplicated() {
    let mut a = school("a");
    a.region = "九龍".to_string();
    let mut b = school("b");
    b.region = "港島".to_string();
    let mut c = school("c");
    c.region = "九龍".to_string();
    // A blank region (placeholder in the source) is skipped entirely.
    let d = school("d");

    let schools = vec![a, b, c, d];
    let values = distinct_values(&schools, CategoricalField::Region);

    assert_eq!(values, vec!["九龍", "港島"]);
}
