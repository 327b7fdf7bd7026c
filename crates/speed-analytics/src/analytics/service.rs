use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::dashboard::DashboardView;
use super::domain::{CaseManagerRow, TeamRow};
use super::filter::RecordFilter;
use super::normalizer::{normalize_case_managers, normalize_teams};
use super::ranking::{leaderboard, PodiumEntry};
use super::report::{Report, ReportKind};
use super::source::{AccessToken, PerformanceSource, SourceError};

/// A filtered view over one freshly normalized record set. `total` counts
/// the normalized records before filtering; `dropped` the raw records
/// discarded for having no identity.
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    pub rows: Vec<T>,
    pub total: usize,
    pub dropped: usize,
}

/// Orchestrates fetch, normalization, and the downstream selectors.
///
/// Every call re-fetches and rebuilds the record set from scratch; nothing
/// is cached or patched in place. Views needing several upstream lists
/// fail as a unit when any fetch fails.
pub struct AnalyticsService<S> {
    source: Arc<S>,
}

impl<S> AnalyticsService<S>
where
    S: PerformanceSource,
{
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Normalized, filtered case-manager rows.
    pub fn case_managers(
        &self,
        token: &AccessToken,
        filter: &RecordFilter,
    ) -> Result<Listing<CaseManagerRow>, SourceError> {
        let raw = self.source.case_manager_performance(token)?;
        let (rows, dropped) = normalize_case_managers(raw);
        let total = rows.len();
        Ok(Listing {
            rows: filter.apply(&rows),
            total,
            dropped,
        })
    }

    /// Normalized, filtered team rows.
    pub fn teams(
        &self,
        token: &AccessToken,
        filter: &RecordFilter,
    ) -> Result<Listing<TeamRow>, SourceError> {
        let raw = self.source.team_performance(token)?;
        let (rows, dropped) = normalize_teams(raw);
        let total = rows.len();
        Ok(Listing {
            rows: filter.apply(&rows),
            total,
            dropped,
        })
    }

    /// Cards plus both leaderboards. Joins three fetches all-or-nothing.
    pub fn dashboard(&self, token: &AccessToken) -> Result<DashboardView, SourceError> {
        let stats = self.source.dashboard_stats(token)?;
        let (case_managers, _) = normalize_case_managers(self.source.case_manager_performance(token)?);
        let (teams, _) = normalize_teams(self.source.team_performance(token)?);
        Ok(DashboardView::assemble(&stats, &case_managers, &teams))
    }

    /// Top-3 case managers in podium display order.
    pub fn top_case_managers(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<PodiumEntry<CaseManagerRow>>, SourceError> {
        let (rows, _) = normalize_case_managers(self.source.case_manager_performance(token)?);
        Ok(leaderboard(&rows))
    }

    /// Top-3 teams in podium display order.
    pub fn top_teams(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<PodiumEntry<TeamRow>>, SourceError> {
        let (rows, _) = normalize_teams(self.source.team_performance(token)?);
        Ok(leaderboard(&rows))
    }

    /// Project the requested report over the full normalized record set.
    pub fn report(
        &self,
        token: &AccessToken,
        kind: ReportKind,
        generated_on: NaiveDate,
    ) -> Result<Report, SourceError> {
        match kind {
            ReportKind::CaseManagersPerformance => {
                let (rows, _) = normalize_case_managers(self.source.case_manager_performance(token)?);
                Ok(Report::case_managers(&rows, generated_on))
            }
            ReportKind::TeamSummary => {
                let (rows, _) = normalize_teams(self.source.team_performance(token)?);
                Ok(Report::team_summary(&rows, generated_on))
            }
        }
    }
}
