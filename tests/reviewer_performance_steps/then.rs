//! Then steps for reviewer performance BDD scenarios.

use super::world::PerformanceWorld;
use qcflow::analytics::{domain::WeeklyBreakdown, services::AnalyticsError};
use rstest_bdd_macros::then;

#[then("the report is complete")]
fn report_is_complete(world: &PerformanceWorld) -> Result<(), eyre::Report> {
    let report = world.report()?;
    if !report.is_complete() {
        return Err(eyre::eyre!(
            "sections failed: {:?}",
            report.failed_sections()
        ));
    }
    Ok(())
}

#[then("the approval rate is {rate}")]
fn approval_rate_is(world: &PerformanceWorld, rate: f64) -> Result<(), eyre::Report> {
    let metrics = world
        .report()?
        .metrics
        .data()
        .ok_or_else(|| eyre::eyre!("metrics section missing"))?;
    if metrics.approval_rate.to_bits() != rate.to_bits() {
        return Err(eyre::eyre!(
            "expected approval rate {rate}, found {}",
            metrics.approval_rate
        ));
    }
    Ok(())
}

#[then(r#"the "{reason}" rejection count is {cases:u64}"#)]
fn rejection_count_is(
    world: &PerformanceWorld,
    reason: String,
    cases: u64,
) -> Result<(), eyre::Report> {
    let reasons = world
        .report()?
        .top_rejection_reasons
        .data()
        .ok_or_else(|| eyre::eyre!("rejection reasons section missing"))?;
    let found = reasons
        .iter()
        .find(|summary| summary.reason == reason)
        .map(|summary| summary.cases);
    if found != Some(cases) {
        return Err(eyre::eyre!(
            "expected {cases} cases of {reason}, found {found:?} in {reasons:?}"
        ));
    }
    Ok(())
}

#[then("the weekly breakdown is all zero")]
fn weekly_breakdown_is_zero(world: &PerformanceWorld) -> Result<(), eyre::Report> {
    let weekly = world
        .report()?
        .weekly_breakdown
        .data()
        .ok_or_else(|| eyre::eyre!("weekly breakdown section missing"))?;
    if weekly != &WeeklyBreakdown::default() {
        return Err(eyre::eyre!("expected an empty week, found {weekly:?}"));
    }
    Ok(())
}

#[then("the reviewer is not found")]
fn reviewer_not_found(world: &PerformanceWorld) -> Result<(), eyre::Report> {
    match world.last_report.as_ref() {
        Some(Err(AnalyticsError::ReviewerNotFound(id))) if *id == world.reviewer => Ok(()),
        other => Err(eyre::eyre!("expected reviewer not found, got {other:?}")),
    }
}
