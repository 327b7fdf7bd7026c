use serde::Deserialize;

use super::domain::{AppointmentSummary, PerformanceSummary, ViralLoadSummary};
use super::rates::Rate;

/// Identity half of a raw case-manager record. A manager may appear in
/// several records, once per role/team/state combination upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCaseManager {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub cm_id: Option<i64>,
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub cmt: Option<String>,
    #[serde(default)]
    pub facilities: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl RawCaseManager {
    /// Stable identity key: the explicit `id`, falling back to the numeric
    /// `cm_id`. `None` when neither is usable.
    pub fn identity(&self) -> Option<String> {
        if let Some(id) = self.id.as_deref() {
            let trimmed = id.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        self.cm_id.map(|numeric| numeric.to_string())
    }
}

/// Flat metrics block attached to a case-manager record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCaseManagerMetrics {
    #[serde(default)]
    pub tx_cur: u64,
    #[serde(default)]
    pub iit: u64,
    #[serde(default)]
    pub discontinued: u64,
    #[serde(default)]
    pub transferred_out: u64,
    #[serde(default)]
    pub dead: u64,
    #[serde(default)]
    pub appointments_schedule: u64,
    #[serde(default)]
    pub appointments_completed: u64,
    #[serde(default)]
    pub appointment_compliance: Option<f64>,
    #[serde(default)]
    pub viral_load_eligible: u64,
    #[serde(default)]
    pub viral_load_samples: u64,
    #[serde(default)]
    pub viral_load_results: u64,
    #[serde(default)]
    pub viral_load_suppressed: u64,
    #[serde(default)]
    pub suppression_rate: Option<f64>,
    #[serde(default)]
    pub final_score: f64,
}

/// One raw case-manager performance record as served by
/// `/performance/case-managers`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCaseManagerPerformance {
    pub case_manager: RawCaseManager,
    #[serde(default)]
    pub performance: RawCaseManagerMetrics,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeamAppointments {
    #[serde(default)]
    pub scheduled: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub completion_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeamViralLoad {
    #[serde(default)]
    pub eligible: u64,
    #[serde(default)]
    pub samples: u64,
    #[serde(default)]
    pub results: u64,
    #[serde(default)]
    pub suppressed: u64,
    #[serde(default)]
    pub suppression_rate: Option<f64>,
}

/// One raw team performance record as served by `/performance/cmts`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTeamPerformance {
    #[serde(default)]
    pub cmt: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub facility_name: Option<String>,
    #[serde(default)]
    pub case_managers_count: u64,
    #[serde(default)]
    pub tx_cur: u64,
    #[serde(default)]
    pub iit: u64,
    #[serde(default)]
    pub transferred_out: u64,
    #[serde(default)]
    pub discontinued: u64,
    #[serde(default)]
    pub dead: u64,
    #[serde(default)]
    pub appointments: RawTeamAppointments,
    #[serde(default)]
    pub viral_load: RawTeamViralLoad,
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub case_managers: Vec<RawCaseManager>,
    #[serde(default)]
    pub patient_count: u64,
}

impl RawTeamPerformance {
    pub fn identity(&self) -> Option<String> {
        let name = self.cmt.as_deref()?.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

/// Aggregate counters behind the dashboard cards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDashboardStats {
    #[serde(default)]
    pub tx_cur: u64,
    #[serde(default)]
    pub iit: u64,
    #[serde(default)]
    pub drug_pickup: u64,
    #[serde(default)]
    pub viral_load: RawDashboardViralLoad,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDashboardViralLoad {
    #[serde(default)]
    pub eligible: u64,
    #[serde(default)]
    pub suppressed: u64,
    #[serde(default)]
    pub total_results: u64,
}

/// The two raw performance shapes, made an explicit tagged union instead
/// of duck-typing on field names. Each variant has its own adapter into
/// the shared [`PerformanceSummary`].
#[derive(Debug, Clone)]
pub enum PerformanceRecord {
    CaseManager(RawCaseManagerPerformance),
    Team(RawTeamPerformance),
}

impl PerformanceRecord {
    pub fn summary(&self) -> PerformanceSummary {
        match self {
            Self::CaseManager(record) => summarize_case_manager(&record.performance),
            Self::Team(record) => summarize_team(record),
        }
    }
}

/// Case-manager variant adapter. Compliance and suppression rates arrive
/// pre-aggregated when upstream has them; viral-load coverage counts
/// collected samples against the eligible cohort.
pub(crate) fn summarize_case_manager(metrics: &RawCaseManagerMetrics) -> PerformanceSummary {
    let completion_rate = match metrics.appointment_compliance {
        Some(value) if value.is_finite() => Rate::from_percent(value),
        _ => Rate::from_counts(metrics.appointments_completed, metrics.appointments_schedule),
    };
    let suppression = match metrics.suppression_rate {
        Some(value) if value.is_finite() => Rate::from_percent(value),
        _ => Rate::from_counts(metrics.viral_load_suppressed, metrics.viral_load_results),
    };

    PerformanceSummary {
        active_on_treatment: metrics.tx_cur,
        interrupted: metrics.iit,
        transferred_out: metrics.transferred_out,
        deceased: metrics.dead,
        discontinued: metrics.discontinued,
        appointments: AppointmentSummary {
            scheduled: metrics.appointments_schedule,
            completed: metrics.appointments_completed,
            completion_rate,
        },
        viral_load: ViralLoadSummary {
            eligible: metrics.viral_load_eligible,
            samples: metrics.viral_load_samples,
            results: metrics.viral_load_results,
            suppressed: metrics.viral_load_suppressed,
            coverage: Rate::from_counts(metrics.viral_load_samples, metrics.viral_load_eligible),
            suppression,
        },
        score: metrics.final_score,
    }
}

/// Team variant adapter.
pub(crate) fn summarize_team(record: &RawTeamPerformance) -> PerformanceSummary {
    let completion_rate = match record.appointments.completion_rate {
        Some(value) if value.is_finite() => Rate::from_percent(value),
        _ => Rate::from_counts(record.appointments.completed, record.appointments.scheduled),
    };
    let suppression = match record.viral_load.suppression_rate {
        Some(value) if value.is_finite() => Rate::from_percent(value),
        _ => Rate::from_counts(record.viral_load.suppressed, record.viral_load.results),
    };

    PerformanceSummary {
        active_on_treatment: record.tx_cur,
        interrupted: record.iit,
        transferred_out: record.transferred_out,
        deceased: record.dead,
        discontinued: record.discontinued,
        appointments: AppointmentSummary {
            scheduled: record.appointments.scheduled,
            completed: record.appointments.completed,
            completion_rate,
        },
        viral_load: ViralLoadSummary {
            eligible: record.viral_load.eligible,
            samples: record.viral_load.samples,
            results: record.viral_load.results,
            suppressed: record.viral_load.suppressed,
            coverage: Rate::from_counts(record.viral_load.samples, record.viral_load.eligible),
            suppression,
        },
        score: record.average_score,
    }
}
