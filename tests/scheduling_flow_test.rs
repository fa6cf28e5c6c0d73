//! End-to-end flows: slot search, booking, lifecycle, feedback and calibration,
//! run against both the in-memory and the SQLite adapters.

mod common;

use chrono::{Duration, NaiveDate, Utc};
use panelkit::domain::errors::DomainError;
use panelkit::domain::models::{
    AuditAction, FeedbackDraft, InterviewEventType, InterviewStatus, Period, Recommendation, SchedulingConfig,
    SlotRequest,
};
use panelkit::domain::ports::InterviewFilter;

use common::{monday_at, panelists, Harness};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

async fn full_flow(h: Harness) {
    let panel = panelists(3);
    let (a, b, c) = (panel[0], panel[1], panel[2]);

    h.feedback.upsert_dimension(&h.ctx, "coding", 2.0).await.unwrap();
    h.feedback.upsert_dimension(&h.ctx, "communication", 1.0).await.unwrap();

    // Empty calendar: the first three business hours are perfect.
    let request = SlotRequest::new(vec![a, b], 60, monday_at(0, 0), monday_at(0, 0) + Duration::days(1))
        .with_max_suggestions(3);
    let slots = h.lifecycle.suggest_slots(&h.ctx, &request).await.unwrap();
    assert_eq!(slots.len(), 3);
    assert_eq!(slots[0].start, monday_at(9, 0));
    assert!(slots.iter().all(|s| s.score == 100));

    let interview = h
        .lifecycle
        .schedule(&h.ctx, h.interview(slots[0].start, 60, &[a, b]))
        .await
        .unwrap();

    // The booked hour drops below every open one.
    let slots = h.lifecycle.suggest_slots(&h.ctx, &request).await.unwrap();
    assert_eq!(slots[0].start, monday_at(10, 0));
    assert!(slots.iter().all(|s| s.start != monday_at(9, 0)));

    let load = h.loads.load_for(&h.ctx, a, monday()).await.unwrap();
    assert_eq!((load.scheduled_count, load.pending_feedback_count), (1, 1));

    h.lifecycle.start(&h.ctx, interview.id).await.unwrap();
    let done = h.lifecycle.complete(&h.ctx, interview.id).await.unwrap();
    assert_eq!(done.status, InterviewStatus::Completed);

    let first = h
        .feedback
        .submit(
            &h.ctx,
            FeedbackDraft::new(interview.id, a, Recommendation::LeanYes)
                .with_rating("coding", 4.0)
                .with_rating("communication", 1.0),
        )
        .await
        .unwrap();
    assert!((first.aggregate_score - 3.0).abs() < 1e-9);

    h.feedback
        .submit(
            &h.ctx,
            FeedbackDraft::new(interview.id, b, Recommendation::StrongYes)
                .with_rating("coding", 5.0)
                .with_rating("communication", 5.0),
        )
        .await
        .unwrap();

    let load = h.loads.load_for(&h.ctx, a, monday()).await.unwrap();
    assert_eq!((load.scheduled_count, load.pending_feedback_count), (1, 0));

    // Resubmission replaces the score, keeps the id and leaves load alone.
    let revised = h
        .feedback
        .submit(
            &h.ctx,
            FeedbackDraft::new(interview.id, a, Recommendation::Yes)
                .with_rating("coding", 5.0)
                .with_rating("communication", 2.0),
        )
        .await
        .unwrap();
    assert_eq!(revised.id, first.id);
    assert!((revised.aggregate_score - 4.0).abs() < 1e-9);
    let load = h.loads.load_for(&h.ctx, a, monday()).await.unwrap();
    assert_eq!(load.pending_feedback_count, 0);

    let outsider = h
        .feedback
        .submit(
            &h.ctx,
            FeedbackDraft::new(interview.id, c, Recommendation::No).with_rating("coding", 2.0),
        )
        .await;
    assert!(matches!(outsider, Err(DomainError::ReviewerNotOnPanel { .. })));

    let submissions = h.feedback.for_interview(&h.ctx, interview.id).await.unwrap();
    assert_eq!(submissions.len(), 2);

    let report = h
        .calibration
        .report(&h.ctx, Period::containing(Utc::now()))
        .await
        .unwrap();
    assert_eq!(report.reviewer_count, 2);
    assert!((report.mean - 4.5).abs() < 1e-9);
    assert!((report.variance - 0.25).abs() < 1e-9);
    assert!((report.sd - 0.5).abs() < 1e-9);
    assert!((report.icc_proxy - (1.0 - 0.5 / 4.5)).abs() < 1e-9);

    let stored = h
        .calibration
        .stored_aggregates(&h.ctx, Period::containing(Utc::now()))
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
    let a_row = stored.iter().find(|agg| agg.reviewer_id == a).unwrap();
    assert!((a_row.average_score - 4.0).abs() < 1e-9);
    assert_eq!(a_row.submission_count, 1);

    let events = h.lifecycle.events(&h.ctx, interview.id).await.unwrap();
    let kinds: Vec<_> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(
        kinds,
        vec![
            InterviewEventType::Scheduled,
            InterviewEventType::Started,
            InterviewEventType::Completed
        ]
    );

    let actions: Vec<_> = h.audit.entries().await.iter().map(|e| e.action).collect();
    for expected in [
        AuditAction::DimensionUpdated,
        AuditAction::InterviewScheduled,
        AuditAction::InterviewCompleted,
        AuditAction::FeedbackSubmitted,
        AuditAction::FeedbackResubmitted,
        AuditAction::AggregatesRecomputed,
    ] {
        assert!(actions.contains(&expected), "missing audit action {expected:?}");
    }
}

#[tokio::test]
async fn test_full_flow_in_memory() {
    full_flow(Harness::memory()).await;
}

#[tokio::test]
async fn test_full_flow_sqlite() {
    full_flow(Harness::sqlite().await).await;
}

async fn reschedule_flow(h: Harness) {
    let panel = panelists(2);
    let interview = h
        .lifecycle
        .schedule(&h.ctx, h.interview(monday_at(14, 0), 60, &panel))
        .await
        .unwrap();

    let tuesday = monday_at(14, 0) + Duration::days(1);
    let moved = h
        .lifecycle
        .reschedule(&h.ctx, interview.id, tuesday, tuesday + Duration::hours(1), Some("candidate asked".into()))
        .await
        .unwrap();
    assert_eq!(moved.reschedule_count, 1);
    assert_eq!(moved.status, InterviewStatus::Scheduled);

    let before = h.loads.load_for(&h.ctx, panel[0], monday()).await.unwrap();
    let after = h
        .loads
        .load_for(&h.ctx, panel[0], monday().succ_opt().unwrap())
        .await
        .unwrap();
    assert_eq!((before.scheduled_count, before.pending_feedback_count), (0, 0));
    assert_eq!((after.scheduled_count, after.pending_feedback_count), (1, 1));

    let listed = h
        .lifecycle
        .list(&h.ctx, InterviewFilter::new().panelist(panel[1]))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].scheduled_start, tuesday);

    // Only scheduled interviews may move.
    h.lifecycle.cancel(&h.ctx, interview.id, None).await.unwrap();
    let err = h
        .lifecycle
        .reschedule(&h.ctx, interview.id, monday_at(9, 0), monday_at(10, 0), None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition { .. }));
}

#[tokio::test]
async fn test_reschedule_moves_load_in_memory() {
    reschedule_flow(Harness::memory()).await;
}

#[tokio::test]
async fn test_reschedule_moves_load_sqlite() {
    reschedule_flow(Harness::sqlite().await).await;
}

async fn reschedule_after_feedback_flow(h: Harness) {
    let panel = panelists(2);
    let (a, b) = (panel[0], panel[1]);
    let interview = h
        .lifecycle
        .schedule(&h.ctx, h.interview(monday_at(9, 0), 60, &panel))
        .await
        .unwrap();

    // Feedback is accepted while the interview is still scheduled.
    h.feedback
        .submit(
            &h.ctx,
            FeedbackDraft::new(interview.id, a, Recommendation::Yes).with_rating("coding", 4.0),
        )
        .await
        .unwrap();

    let tuesday = monday_at(9, 0) + Duration::days(1);
    h.lifecycle
        .reschedule(&h.ctx, interview.id, tuesday, tuesday + Duration::hours(1), None)
        .await
        .unwrap();

    let tuesday_date = monday().succ_opt().unwrap();
    let old_a = h.loads.load_for(&h.ctx, a, monday()).await.unwrap();
    let new_a = h.loads.load_for(&h.ctx, a, tuesday_date).await.unwrap();
    assert_eq!((old_a.scheduled_count, old_a.pending_feedback_count), (0, 0));
    assert_eq!((new_a.scheduled_count, new_a.pending_feedback_count), (1, 0));

    let new_b = h.loads.load_for(&h.ctx, b, tuesday_date).await.unwrap();
    assert_eq!((new_b.scheduled_count, new_b.pending_feedback_count), (1, 1));

    // B's first submission releases the moved unit; nothing is left pending.
    h.feedback
        .submit(
            &h.ctx,
            FeedbackDraft::new(interview.id, b, Recommendation::No).with_rating("coding", 2.0),
        )
        .await
        .unwrap();
    for panelist in [a, b] {
        let mut pending = 0;
        for date in [monday(), tuesday_date] {
            pending += h.loads.load_for(&h.ctx, panelist, date).await.unwrap().pending_feedback_count;
        }
        assert_eq!(pending, 0);
    }
}

#[tokio::test]
async fn test_reschedule_after_feedback_in_memory() {
    reschedule_after_feedback_flow(Harness::memory()).await;
}

#[tokio::test]
async fn test_reschedule_after_feedback_sqlite() {
    reschedule_after_feedback_flow(Harness::sqlite().await).await;
}

#[tokio::test]
async fn test_concurrent_first_submissions_release_pending_once() {
    let h = Harness::memory();
    let panel = panelists(1);
    // Two interviews on the same day give the reviewer two pending units.
    let first = h
        .lifecycle
        .schedule(&h.ctx, h.interview(monday_at(9, 0), 60, &panel))
        .await
        .unwrap();
    h.lifecycle
        .schedule(&h.ctx, h.interview(monday_at(11, 0), 60, &panel))
        .await
        .unwrap();

    let draft = || FeedbackDraft::new(first.id, panel[0], Recommendation::Yes).with_rating("coding", 4.0);
    let (x, y) = tokio::join!(h.feedback.submit(&h.ctx, draft()), h.feedback.submit(&h.ctx, draft()));
    let (x, y) = (x.unwrap(), y.unwrap());
    assert_eq!(x.id, y.id);

    let load = h.loads.load_for(&h.ctx, panel[0], monday()).await.unwrap();
    assert_eq!(load.pending_feedback_count, 1);

    let actions: Vec<_> = h.audit.entries().await.iter().map(|e| e.action).collect();
    assert_eq!(actions.iter().filter(|a| **a == AuditAction::FeedbackSubmitted).count(), 1);
    assert_eq!(actions.iter().filter(|a| **a == AuditAction::FeedbackResubmitted).count(), 1);
}

#[tokio::test]
async fn test_feedback_rejected_for_cancelled_interview() {
    let h = Harness::memory();
    let panel = panelists(1);
    let interview = h
        .lifecycle
        .schedule(&h.ctx, h.interview(monday_at(9, 0), 45, &panel))
        .await
        .unwrap();
    h.lifecycle
        .cancel(&h.ctx, interview.id, Some("role closed".into()))
        .await
        .unwrap();

    let result = h
        .feedback
        .submit(
            &h.ctx,
            FeedbackDraft::new(interview.id, panel[0], Recommendation::Yes).with_rating("coding", 4.0),
        )
        .await;
    assert!(matches!(result, Err(DomainError::InvalidStateTransition { .. })));

    // Cancelling does not release the pending unit.
    let load = h.loads.load_for(&h.ctx, panel[0], monday()).await.unwrap();
    assert_eq!(load.pending_feedback_count, 1);
}

#[tokio::test]
async fn test_conflicting_booking_policy() {
    let panel = panelists(2);

    let lenient = Harness::memory();
    lenient
        .lifecycle
        .schedule(&lenient.ctx, lenient.interview(monday_at(9, 0), 60, &panel))
        .await
        .unwrap();
    assert!(lenient
        .lifecycle
        .schedule(&lenient.ctx, lenient.interview(monday_at(9, 30), 60, &panel[..1]))
        .await
        .is_ok());

    let strict = Harness::memory_with(SchedulingConfig {
        reject_conflicting_bookings: true,
        ..SchedulingConfig::default()
    });
    strict
        .lifecycle
        .schedule(&strict.ctx, strict.interview(monday_at(9, 0), 60, &panel))
        .await
        .unwrap();
    let err = strict
        .lifecycle
        .schedule(&strict.ctx, strict.interview(monday_at(9, 30), 60, &panel[..1]))
        .await
        .unwrap_err();
    match err {
        DomainError::SchedulingConflict(ids) => assert_eq!(ids, vec![panel[0]]),
        other => panic!("expected a scheduling conflict, got {other:?}"),
    }

    // Back-to-back bookings share only an endpoint and do not conflict.
    assert!(strict
        .lifecycle
        .schedule(&strict.ctx, strict.interview(monday_at(10, 0), 60, &panel))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_tenants_are_isolated() {
    let h = Harness::memory();
    let panel = panelists(1);
    let interview = h
        .lifecycle
        .schedule(&h.ctx, h.interview(monday_at(11, 0), 60, &panel))
        .await
        .unwrap();

    let other = panelkit::RequestContext::new(uuid::Uuid::new_v4(), h.ctx.actor_id);
    assert!(matches!(
        h.lifecycle.get(&other, interview.id).await,
        Err(DomainError::InterviewNotFound(_))
    ));
    assert!(h
        .lifecycle
        .list(&other, InterviewFilter::new())
        .await
        .unwrap()
        .is_empty());
}
