use std::sync::Arc;

use chrono::NaiveDate;
use speed_analytics::analytics::filter::RecordFilter;
use speed_analytics::analytics::report::ReportKind;
use speed_analytics::analytics::source::{AccessToken, PerformanceSource, SourceError};
use speed_analytics::analytics::wire::{
    RawCaseManagerPerformance, RawDashboardStats, RawTeamPerformance,
};
use speed_analytics::analytics::AnalyticsService;

struct StubSource {
    case_managers: serde_json::Value,
    teams: serde_json::Value,
    stats: serde_json::Value,
}

impl PerformanceSource for StubSource {
    fn case_manager_performance(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<RawCaseManagerPerformance>, SourceError> {
        authorize(token)?;
        serde_json::from_value(self.case_managers.clone())
            .map_err(|err| SourceError::Malformed(err.to_string()))
    }

    fn team_performance(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<RawTeamPerformance>, SourceError> {
        authorize(token)?;
        serde_json::from_value(self.teams.clone())
            .map_err(|err| SourceError::Malformed(err.to_string()))
    }

    fn dashboard_stats(&self, token: &AccessToken) -> Result<RawDashboardStats, SourceError> {
        authorize(token)?;
        serde_json::from_value(self.stats.clone())
            .map_err(|err| SourceError::Malformed(err.to_string()))
    }
}

fn authorize(token: &AccessToken) -> Result<(), SourceError> {
    if token.as_str() == "valid-token" {
        Ok(())
    } else {
        Err(SourceError::Denied)
    }
}

fn token() -> AccessToken {
    AccessToken::new("valid-token").expect("token is non-empty")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 23).expect("valid date")
}

fn stub() -> StubSource {
    let case_managers = serde_json::json!([
        {
            "case_manager": {
                "id": "7", "fullname": "Adaeze Obi", "role": "Nurse",
                "cmt": "Alpha", "facilities": "General Hospital", "state": "Lagos"
            },
            "performance": {
                "tx_cur": 100, "iit": 10,
                "appointments_schedule": 50, "appointments_completed": 40,
                "viral_load_eligible": 80, "viral_load_samples": 60,
                "viral_load_results": 55, "viral_load_suppressed": 44,
                "final_score": 90.0
            }
        },
        {
            "case_manager": {
                "id": "7", "fullname": "Adaeze Obi", "role": "Counselor",
                "cmt": "Beta", "facilities": "General Hospital", "state": "Lagos"
            },
            "performance": { "tx_cur": 1, "final_score": 5.0 }
        },
        {
            "case_manager": {
                "cm_id": 21, "fullname": "Bashir Musa", "role": "Pharmacist",
                "cmt": "Gamma", "facilities": "Central Clinic", "state": "Kano"
            },
            "performance": { "tx_cur": 60, "iit": 3, "final_score": 70.0 }
        },
        {
            "case_manager": {
                "cm_id": 34, "fullname": "Chidi Eze", "role": "Nurse",
                "cmt": "Gamma", "facilities": "Central Clinic", "state": "Kano"
            },
            "performance": { "tx_cur": 40, "iit": 2, "final_score": 70.0 }
        },
        {
            "case_manager": { "fullname": "No Identity" },
            "performance": { "tx_cur": 10, "final_score": 99.0 }
        }
    ]);

    let teams = serde_json::json!([
        {
            "cmt": "Team A", "state": "Lagos", "facility_name": "General Hospital",
            "case_managers_count": 8, "tx_cur": 100, "iit": 10,
            "appointments": { "scheduled": 50, "completed": 40 },
            "viral_load": { "eligible": 80, "samples": 60, "results": 55, "suppressed": 44 },
            "average_score": 82.0, "patient_count": 950
        },
        {
            "cmt": "Team B", "state": "Kano", "facility_name": "Central Clinic",
            "case_managers_count": 5, "tx_cur": 60, "iit": 9,
            "appointments": { "scheduled": 30, "completed": 12, "completion_rate": 40.0 },
            "viral_load": { "eligible": 50, "samples": 20, "results": 18, "suppressed": 9,
                            "suppression_rate": 50.0 },
            "average_score": 41.0, "patient_count": 400
        }
    ]);

    let stats = serde_json::json!({
        "tx_cur": 160, "iit": 19, "drug_pickup": 120,
        "viral_load": { "eligible": 130, "suppressed": 53, "total_results": 73 }
    });

    StubSource {
        case_managers,
        teams,
        stats,
    }
}

#[test]
fn duplicate_raw_records_collapse_and_keep_the_first_snapshot() {
    let service = AnalyticsService::new(Arc::new(stub()));
    let listing = service
        .case_managers(&token(), &RecordFilter::default())
        .expect("fetch succeeds");

    assert_eq!(listing.total, 3);
    assert_eq!(listing.dropped, 1);

    let adaeze = listing
        .rows
        .iter()
        .find(|row| row.id == "7")
        .expect("grouped row present");
    assert_eq!(adaeze.role, "Nurse / Counselor");
    assert_eq!(adaeze.team, "Alpha / Beta");
    assert_eq!(adaeze.summary.score, 90.0);
    assert_eq!(adaeze.summary.active_on_treatment, 100);
}

#[test]
fn end_to_end_team_rates_match_the_documented_scenario() {
    let service = AnalyticsService::new(Arc::new(stub()));
    let listing = service
        .teams(&token(), &RecordFilter::default())
        .expect("fetch succeeds");

    let team_a = listing
        .rows
        .iter()
        .find(|row| row.name == "Team A")
        .expect("team present");
    assert_eq!(team_a.summary.iit_rate().display(), 10);
    assert_eq!(team_a.summary.appointments.completion_rate.display(), 80);
    assert_eq!(team_a.summary.viral_load.coverage.display(), 75);
    assert_eq!(team_a.summary.viral_load.suppression.display(), 80);

    // Team B arrived with pre-aggregated rates; those win over derivation.
    let team_b = listing
        .rows
        .iter()
        .find(|row| row.name == "Team B")
        .expect("team present");
    assert_eq!(team_b.summary.appointments.completion_rate.raw(), 40.0);
    assert_eq!(team_b.summary.viral_load.suppression.raw(), 50.0);
}

#[test]
fn facet_sentinel_and_unset_facet_select_the_same_rows() {
    let service = AnalyticsService::new(Arc::new(stub()));

    let unset = service
        .case_managers(&token(), &RecordFilter::default())
        .expect("fetch succeeds");
    let sentinel = service
        .case_managers(
            &token(),
            &RecordFilter {
                search: None,
                team: Some("all".to_string()),
                state: Some("all".to_string()),
            },
        )
        .expect("fetch succeeds");

    let ids = |listing: &speed_analytics::analytics::Listing<_>| {
        listing
            .rows
            .iter()
            .map(|row: &speed_analytics::analytics::domain::CaseManagerRow| row.id.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&unset), ids(&sentinel));
}

#[test]
fn search_and_facets_narrow_the_listing() {
    let service = AnalyticsService::new(Arc::new(stub()));

    let by_team = service
        .case_managers(
            &token(),
            &RecordFilter {
                team: Some("beta".to_string()),
                ..RecordFilter::default()
            },
        )
        .expect("fetch succeeds");
    assert_eq!(by_team.rows.len(), 1);
    assert_eq!(by_team.rows[0].id, "7");
    assert_eq!(by_team.total, 3);

    let by_state_and_search = service
        .case_managers(
            &token(),
            &RecordFilter {
                search: Some("pharm".to_string()),
                state: Some("KANO".to_string()),
                team: None,
            },
        )
        .expect("fetch succeeds");
    assert_eq!(by_state_and_search.rows.len(), 1);
    assert_eq!(by_state_and_search.rows[0].fullname, "Bashir Musa");
}

#[test]
fn leaderboard_reorders_ranked_rows_for_the_podium() {
    let service = AnalyticsService::new(Arc::new(stub()));
    let podium = service
        .top_case_managers(&token())
        .expect("fetch succeeds");

    // Scores 90, 70, 70: winner center, tied managers keep arrival order.
    assert_eq!(podium.len(), 3);
    assert_eq!(podium[0].rank, 2);
    assert_eq!(podium[0].entry.fullname, "Bashir Musa");
    assert_eq!(podium[0].band, "Fair");
    assert_eq!(podium[1].rank, 1);
    assert_eq!(podium[1].entry.id, "7");
    assert_eq!(podium[1].band, "Good");
    assert_eq!(podium[2].rank, 3);
    assert_eq!(podium[2].entry.fullname, "Chidi Eze");
}

#[test]
fn dashboard_join_is_all_or_nothing() {
    let service = AnalyticsService::new(Arc::new(stub()));
    let view = service.dashboard(&token()).expect("all fetches succeed");
    assert_eq!(view.cards.len(), 4);
    assert_eq!(view.top_teams.len(), 2);

    let broken = StubSource {
        stats: serde_json::json!("not-an-object"),
        ..stub()
    };
    let service = AnalyticsService::new(Arc::new(broken));
    let error = service.dashboard(&token()).expect_err("join fails as a unit");
    assert!(matches!(error, SourceError::Malformed(_)));
}

#[test]
fn rejected_token_surfaces_denied_without_panicking() {
    let service = AnalyticsService::new(Arc::new(stub()));
    let bad_token = AccessToken::new("expired").expect("token is non-empty");
    let error = service
        .case_managers(&bad_token, &RecordFilter::default())
        .expect_err("source rejects the token");
    assert!(matches!(error, SourceError::Denied));
}

#[test]
fn exported_report_matches_the_on_screen_projection() {
    let service = AnalyticsService::new(Arc::new(stub()));
    let report = service
        .report(&token(), ReportKind::CaseManagersPerformance, today())
        .expect("fetch succeeds");

    assert_eq!(report.rows.len(), 3);
    let csv = report.to_csv().expect("serializes");
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().expect("header"),
        "Name,Role,State,CMT,TX_CURR,IIT,Appointment Compliance (%),Appointment Details,\
         VL Coverage (%),VL Coverage Details,VL Suppression (%),VL Suppression Details,\
         Overall Score"
    );
    let first = lines.next().expect("first row");
    assert!(first.starts_with("Adaeze Obi,Nurse / Counselor,Lagos,Alpha / Beta,100,10,80.0,40/50"));
    assert_eq!(report.file_name(), "case-managers-performance-2026-08-23.csv");
}
