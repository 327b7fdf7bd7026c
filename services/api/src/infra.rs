use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use speed_analytics::analytics::source::{AccessToken, PerformanceSource, SourceError};
use speed_analytics::analytics::wire::{
    RawCaseManagerPerformance, RawDashboardStats, RawTeamPerformance,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Token handed to [`FixtureSource`] by local commands that have no real
/// upstream to authenticate against.
pub(crate) const LOCAL_TOKEN: &str = "fixture-local";

/// Built-in data source used by the `export` command and local serving
/// until a SPEED upstream client is wired in. Accepts any non-blank token
/// and serves a small but representative record set, including one
/// manager split across two raw records and one record with no identity.
#[derive(Default, Clone)]
pub(crate) struct FixtureSource;

impl PerformanceSource for FixtureSource {
    fn case_manager_performance(
        &self,
        _token: &AccessToken,
    ) -> Result<Vec<RawCaseManagerPerformance>, SourceError> {
        let payload = json!([
            {
                "case_manager": {
                    "id": "cm-101", "fullname": "Adaeze Obi", "role": "Nurse",
                    "cmt": "Alpha", "facilities": "General Hospital", "state": "Lagos",
                    "created_at": "2024-03-12"
                },
                "performance": {
                    "tx_cur": 1240, "iit": 31,
                    "appointments_schedule": 310, "appointments_completed": 282,
                    "viral_load_eligible": 820, "viral_load_samples": 745,
                    "viral_load_results": 712, "viral_load_suppressed": 668,
                    "final_score": 91.4
                }
            },
            {
                "case_manager": {
                    "id": "cm-101", "fullname": "Adaeze Obi", "role": "Counselor",
                    "cmt": "Beta", "facilities": "General Hospital", "state": "Lagos"
                },
                "performance": { "tx_cur": 40, "final_score": 12.0 }
            },
            {
                "case_manager": {
                    "cm_id": 202, "fullname": "Bashir Musa", "role": "Pharmacist",
                    "cmt": "Gamma", "facilities": "Central Clinic", "state": "Kano"
                },
                "performance": {
                    "tx_cur": 860, "iit": 44,
                    "appointments_schedule": 240, "appointments_completed": 182,
                    "viral_load_eligible": 600, "viral_load_samples": 420,
                    "viral_load_results": 395, "viral_load_suppressed": 301,
                    "final_score": 74.8
                }
            },
            {
                "case_manager": {
                    "id": "cm-303", "fullname": "Chidi Eze", "role": "Nurse",
                    "cmt": "Gamma", "facilities": "Riverside PHC", "state": "Kano"
                },
                "performance": {
                    "tx_cur": 410, "iit": 58,
                    "appointments_schedule": 150, "appointments_completed": 61,
                    "viral_load_eligible": 300, "viral_load_samples": 120,
                    "viral_load_results": 102, "viral_load_suppressed": 55,
                    "final_score": 42.5
                }
            },
            {
                "case_manager": { "fullname": "Unattributed Import" },
                "performance": { "tx_cur": 12, "final_score": 99.0 }
            }
        ]);

        serde_json::from_value(payload).map_err(|err| SourceError::Malformed(err.to_string()))
    }

    fn team_performance(
        &self,
        _token: &AccessToken,
    ) -> Result<Vec<RawTeamPerformance>, SourceError> {
        let payload = json!([
            {
                "cmt": "Alpha", "state": "Lagos", "facility_name": "General Hospital",
                "case_managers_count": 9, "tx_cur": 4120, "iit": 118,
                "appointments": { "scheduled": 980, "completed": 861 },
                "viral_load": { "eligible": 2600, "samples": 2210, "results": 2105, "suppressed": 1937 },
                "average_score": 86.2, "patient_count": 4120,
                "case_managers": [
                    { "id": "cm-101", "fullname": "Adaeze Obi", "role": "Nurse" }
                ]
            },
            {
                "cmt": "Gamma", "state": "Kano", "facility_name": "Central Clinic",
                "case_managers_count": 6, "tx_cur": 1270, "iit": 102,
                "appointments": { "scheduled": 390, "completed": 243 },
                "viral_load": { "eligible": 900, "samples": 540, "results": 497, "suppressed": 356 },
                "average_score": 58.6, "patient_count": 1270,
                "case_managers": [
                    { "cm_id": 202, "fullname": "Bashir Musa", "role": "Pharmacist" },
                    { "id": "cm-303", "fullname": "Chidi Eze", "role": "Nurse" }
                ]
            },
            {
                "cmt": "Delta", "state": "Rivers", "facility_name": "Harbour Clinic",
                "case_managers_count": 4, "tx_cur": 640, "iit": 71,
                "appointments": { "scheduled": 210, "completed": 84 },
                "viral_load": { "eligible": 410, "samples": 150, "results": 131, "suppressed": 62 },
                "average_score": 39.1, "patient_count": 640
            }
        ]);

        serde_json::from_value(payload).map_err(|err| SourceError::Malformed(err.to_string()))
    }

    fn dashboard_stats(&self, _token: &AccessToken) -> Result<RawDashboardStats, SourceError> {
        let payload = json!({
            "tx_cur": 6030, "iit": 291, "drug_pickup": 4876,
            "viral_load": { "eligible": 3910, "suppressed": 2355, "total_results": 2733 }
        });

        serde_json::from_value(payload).map_err(|err| SourceError::Malformed(err.to_string()))
    }
}
