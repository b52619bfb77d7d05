//! Performance reports over reviews recorded through the workflow.

use super::helpers::{Engine, engine, monday_morning};
use chrono::{Duration, TimeZone, Utc};
use eyre::{OptionExt, ensure};
use qcflow::{
    analytics::{
        domain::{AchievementType, RejectionReasonSummary, ReportPeriod, WeeklyBreakdown},
        services::AnalyticsError,
    },
    task::{
        domain::{Task, TaskCategory},
        services::{CreateTaskRequest, TransitionTaskRequest},
    },
};
use rstest::rstest;

/// Creates a task, lets `minutes` pass, and records the reviewer's verdict.
async fn review(
    engine: &Engine,
    minutes: i64,
    status: &str,
    notes: Option<&str>,
) -> eyre::Result<Task> {
    let client = engine.client(false)?;
    let task = engine
        .workflow
        .create_task(
            engine.manager,
            CreateTaskRequest::new("Quarterly explainer", client, TaskCategory::Design)
                .with_reviewer(engine.reviewer.user_id),
        )
        .await?;
    engine.clock.advance(Duration::minutes(minutes));
    let verdict = TransitionTaskRequest::new(task.id(), task.version(), status);
    let request = match notes {
        Some(text) => verdict.with_rejection_notes(text),
        None => verdict,
    };
    let reviewed = engine
        .workflow
        .apply_transition(engine.reviewer, request)
        .await?;
    Ok(reviewed)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn workflow_reviews_feed_the_weekly_report(engine: Engine) -> eyre::Result<()> {
    engine.reviewers.register(engine.reviewer.user_id)?;
    review(&engine, 30, "COMPLETED", None).await?;
    let reworked = review(&engine, 30, "REJECTED", Some("Logo colour is off-brand")).await?;
    engine.clock.advance(Duration::minutes(30));
    engine
        .workflow
        .apply_transition(
            engine.reviewer,
            TransitionTaskRequest::new(reworked.id(), reworked.version(), "COMPLETED"),
        )
        .await?;
    review(&engine, 30, "REJECTED", Some("Font too small for mobile")).await?;

    let report = engine
        .reports
        .get_performance_report(engine.reviewer.user_id, ReportPeriod::Week)
        .await?;

    ensure!(report.is_complete(), "failed: {:?}", report.failed_sections());
    let metrics = report.metrics.data().ok_or_eyre("metrics missing")?;
    ensure!(metrics.total_reviewed == 3);
    ensure!(metrics.approval_rate.to_bits() == 66.7_f64.to_bits());
    ensure!(metrics.first_pass_rate.to_bits() == 33.3_f64.to_bits());
    ensure!(metrics.avg_review_time == 40);
    let weekly = report
        .weekly_breakdown
        .data()
        .ok_or_eyre("weekly breakdown missing")?;
    ensure!(weekly.approved == 2 && weekly.rejected == 1);
    let reasons = report
        .top_rejection_reasons
        .data()
        .ok_or_eyre("reasons missing")?;
    ensure!(
        reasons
            == &[RejectionReasonSummary {
                reason: "Typography".to_owned(),
                cases: 1,
            }],
        "only tasks still rejected are classified: {reasons:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clean_month_earns_quality_champion(engine: Engine) -> eyre::Result<()> {
    engine.reviewers.register(engine.reviewer.user_id)?;
    for _ in 0..3 {
        review(&engine, 20, "COMPLETED", None).await?;
    }
    let requested_at = monday_morning() + Duration::minutes(60);

    let report = engine
        .reports
        .get_performance_report(engine.reviewer.user_id, ReportPeriod::Month)
        .await?;

    let achievements = report
        .achievements
        .data()
        .ok_or_eyre("achievements missing")?;
    let champion = achievements
        .get(&AchievementType::QualityChampion)
        .ok_or_eyre("quality champion not granted")?;
    ensure!(champion.granted_at == requested_at);
    ensure!(!achievements.contains_key(&AchievementType::SpeedReviewer));
    let trend = report.monthly_trend.data().ok_or_eyre("trend missing")?;
    ensure!(trend.last().is_some_and(|row| row.review_count == 3));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn last_month_appears_in_trend_but_not_this_week(engine: Engine) -> eyre::Result<()> {
    engine.reviewers.register(engine.reviewer.user_id)?;
    let april = Utc
        .with_ymd_and_hms(2026, 4, 20, 14, 0, 0)
        .single()
        .ok_or_eyre("invalid date")?;
    engine.clock.set(april);
    review(&engine, 45, "COMPLETED", None).await?;
    review(&engine, 45, "REJECTED", Some("Audio clipping")).await?;
    engine.clock.set(monday_morning());

    let report = engine
        .reports
        .get_performance_report(engine.reviewer.user_id, ReportPeriod::Week)
        .await?;

    ensure!(report.weekly_breakdown.data() == Some(&WeeklyBreakdown::default()));
    let trend = report.monthly_trend.data().ok_or_eyre("trend missing")?;
    let [.., previous, current] = trend.as_slice() else {
        eyre::bail!("expected at least two trend rows, got {}", trend.len());
    };
    ensure!((previous.year, previous.month) == (2026, 4));
    ensure!(previous.review_count == 2 && previous.approved_count == 1);
    ensure!(previous.approval_rate.to_bits() == 50.0_f64.to_bits());
    ensure!(current.review_count == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unregistered_user_gets_no_report(engine: Engine) -> eyre::Result<()> {
    review(&engine, 10, "COMPLETED", None).await?;

    let result = engine
        .reports
        .get_performance_report(engine.reviewer.user_id, ReportPeriod::Year)
        .await;

    ensure!(matches!(
        result,
        Err(AnalyticsError::ReviewerNotFound(id)) if id == engine.reviewer.user_id
    ));
    Ok(())
}
