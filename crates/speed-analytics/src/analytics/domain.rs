use serde::Serialize;

use super::rates::Rate;

/// Metrics shape shared by case-manager and team records once the raw
/// upstream variants have been adapted.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceSummary {
    pub active_on_treatment: u64,
    pub interrupted: u64,
    pub transferred_out: u64,
    pub deceased: u64,
    pub discontinued: u64,
    pub appointments: AppointmentSummary,
    pub viral_load: ViralLoadSummary,
    /// Composite 0-100 score, computed upstream and consumed as-is.
    pub score: f64,
}

impl PerformanceSummary {
    /// Treatment-interruption rate over the active cohort.
    pub fn iit_rate(&self) -> Rate {
        Rate::from_counts(self.interrupted, self.active_on_treatment)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentSummary {
    pub scheduled: u64,
    pub completed: u64,
    pub completion_rate: Rate,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViralLoadSummary {
    pub eligible: u64,
    pub samples: u64,
    pub results: u64,
    pub suppressed: u64,
    pub coverage: Rate,
    pub suppression: Rate,
}

/// One case manager after duplicate raw records have been grouped.
/// Multi-valued affiliations are flattened `" / "`-joined display strings.
#[derive(Debug, Clone, Serialize)]
pub struct CaseManagerRow {
    pub id: String,
    pub fullname: String,
    pub role: String,
    pub team: String,
    pub facilities: String,
    pub state: String,
    pub created_at: Option<String>,
    pub summary: PerformanceSummary,
}

/// One case-management team. Unlike [`CaseManagerRow`], affiliations here
/// are single-valued; members are carried for the detail view only.
#[derive(Debug, Clone, Serialize)]
pub struct TeamRow {
    pub name: String,
    pub state: String,
    pub facility: String,
    pub case_managers_count: u64,
    pub patient_count: u64,
    pub members: Vec<TeamMember>,
    pub summary: PerformanceSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamMember {
    pub fullname: String,
    pub role: String,
}

/// Field access used by the filter engine. A record exposes the fixed set
/// of searchable display strings; absent fields surface as `""`.
pub trait Searchable {
    fn name(&self) -> &str;
    fn role(&self) -> &str {
        ""
    }
    fn team(&self) -> &str;
    fn facility(&self) -> &str;
    fn state(&self) -> &str;
}

/// Composite-score access used by the ranking selector. Always the raw,
/// unrounded score.
pub trait Scored {
    fn score(&self) -> f64;
}

impl Searchable for CaseManagerRow {
    fn name(&self) -> &str {
        &self.fullname
    }

    fn role(&self) -> &str {
        &self.role
    }

    fn team(&self) -> &str {
        &self.team
    }

    fn facility(&self) -> &str {
        &self.facilities
    }

    fn state(&self) -> &str {
        &self.state
    }
}

impl Scored for CaseManagerRow {
    fn score(&self) -> f64 {
        self.summary.score
    }
}

impl Searchable for TeamRow {
    fn name(&self) -> &str {
        &self.name
    }

    fn team(&self) -> &str {
        &self.name
    }

    fn facility(&self) -> &str {
        &self.facility
    }

    fn state(&self) -> &str {
        &self.state
    }
}

impl Scored for TeamRow {
    fn score(&self) -> f64 {
        self.summary.score
    }
}
