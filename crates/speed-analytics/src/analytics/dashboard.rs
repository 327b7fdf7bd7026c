use serde::Serialize;

use super::domain::{CaseManagerRow, TeamRow};
use super::ranking::{leaderboard, PodiumEntry};
use super::rates::{group_thousands, rate};
use super::wire::RawDashboardStats;

/// One summary card on the landing dashboard. `display_value` is the
/// thousands-grouped rendering of the headline figure.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardCard {
    pub title: &'static str,
    pub value: u64,
    pub display_value: String,
    pub description: String,
}

impl DashboardCard {
    fn new(title: &'static str, value: u64, description: String) -> Self {
        Self {
            title,
            value,
            display_value: group_thousands(value),
            description,
        }
    }
}

/// Everything the dashboard view needs, assembled in one pass.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub cards: Vec<DashboardCard>,
    pub top_case_managers: Vec<PodiumEntry<CaseManagerRow>>,
    pub top_teams: Vec<PodiumEntry<TeamRow>>,
}

impl DashboardView {
    pub fn assemble(
        stats: &RawDashboardStats,
        case_managers: &[CaseManagerRow],
        teams: &[TeamRow],
    ) -> Self {
        Self {
            cards: summary_cards(stats),
            top_case_managers: leaderboard(case_managers),
            top_teams: leaderboard(teams),
        }
    }
}

/// The four fixed cards: active cohort, interruptions, drug pickups, and
/// viral load, with derived rates in the descriptions.
pub fn summary_cards(stats: &RawDashboardStats) -> Vec<DashboardCard> {
    let iit_rate = rate(stats.iit, stats.tx_cur);
    let coverage = rate(stats.viral_load.total_results, stats.viral_load.eligible);
    let suppression = rate(
        stats.viral_load.suppressed,
        stats.viral_load.total_results,
    );

    vec![
        DashboardCard::new(
            "TX_CURR",
            stats.tx_cur,
            "Currently active patients".to_string(),
        ),
        DashboardCard::new(
            "IIT",
            stats.iit,
            format!("{}% IIT rate", iit_rate.one_decimal()),
        ),
        DashboardCard::new(
            "Drug Pickups",
            stats.drug_pickup,
            "Completed pickups".to_string(),
        ),
        DashboardCard::new(
            "Viral Load",
            stats.viral_load.total_results,
            format!(
                "{}% coverage | {}% suppressed",
                coverage.display(),
                suppression.display()
            ),
        ),
    ]
}
