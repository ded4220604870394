//! Integration tests for the pipeline.
//!
//! These tests verify that filtering and scoring work together
//! in a realistic scenario.

use chrono::{DateTime, Duration, TimeZone, Utc};
use data_access::{Advisor, Course, Enrollment};
use pipeline::filters::*;
use pipeline::{FilterPipeline, ScoringEngine, StudentContext};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap()
}

fn create_test_setup() -> (Vec<Course>, Vec<Enrollment>) {
    let now = now();

    let courses = vec![
        Course::new(1)
            .with_field("title", "Intro to AI")
            .created_at(now.to_rfc3339())
            .with_advisor(Advisor::new(1, "AI")),
        Course::new(2)
            .with_field("title", "Databases")
            .created_at((now - Duration::days(100)).to_rfc3339()),
        Course::new(3)
            .with_field("title", "Deep Learning")
            .created_at((now - Duration::days(10)).to_rfc3339())
            .with_advisor(Advisor::new(1, "AI"))
            .with_advisor(Advisor::new(2, "Neural Networks")),
        Course::new(4)
            .with_field("title", "Compilers")
            .with_advisor(Advisor::new(3, "Programming Languages")),
    ];

    // Course 4 is the most popular; student 42 already took course 3
    let mut enrollments = vec![
        Enrollment::new(1, 99),
        Enrollment::new(3, 42),
        Enrollment::new(3, 7),
    ];
    for student in 100..105 {
        enrollments.push(Enrollment::new(4, student));
    }

    (courses, enrollments)
}

#[test]
fn test_full_pipeline_filters_correctly() {
    let (courses, _) = create_test_setup();
    let context = StudentContext::new(42).with_enrolled([3]);

    let pipeline = FilterPipeline::new().add_filter(AlreadyEnrolledFilter);
    let filtered = pipeline.apply(courses, &context).unwrap();

    let ids: Vec<_> = filtered.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 4], "Enrolled course removed, order kept");
}

#[test]
fn test_scoring_after_filtering() {
    let (courses, enrollments) = create_test_setup();
    let context = StudentContext::new(42)
        .with_enrolled([3])
        .with_interests(["ai", "networks"]);

    let filtered = FilterPipeline::standard().apply(courses, &context).unwrap();

    let engine = ScoringEngine::from_enrollments(&enrollments, context.interests.clone(), now());
    let breakdowns = engine.score_all(&filtered);

    assert_eq!(breakdowns.len(), filtered.len());

    // Course 1: 1 enrollment + "ai" match + brand new
    assert_eq!(breakdowns[0].popularity, 1);
    assert_eq!(breakdowns[0].interest_matches, 1);
    assert_eq!(breakdowns[0].total(), 14.0);

    // Course 2: nothing
    assert_eq!(breakdowns[1].total(), 0.0);

    // Course 4: five enrollments, "programming languages" has no match
    assert_eq!(breakdowns[2].total(), 5.0);
}

#[test]
fn test_popularity_is_global_not_per_student() {
    let (courses, enrollments) = create_test_setup();

    let engine = ScoringEngine::from_enrollments(&enrollments, vec![], now());
    let course_3 = courses.iter().find(|c| c.id == 3).unwrap();

    // Same count whichever student asks: 2 rows reference course 3
    assert_eq!(engine.popularity().get(&3), Some(&2));
    assert_eq!(engine.breakdown(course_3).popularity, 2);
}
