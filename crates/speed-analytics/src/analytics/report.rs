use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{CaseManagerRow, TeamRow};
use super::rates::group_thousands;

/// The exportable report catalogue. Column sets are fixed per kind and
/// shared verbatim by the on-screen table, the CSV download, and any
/// document renderer downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    CaseManagersPerformance,
    TeamSummary,
}

impl ReportKind {
    pub const fn id(self) -> &'static str {
        match self {
            Self::CaseManagersPerformance => "case-managers-performance",
            Self::TeamSummary => "team-summary",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::CaseManagersPerformance => "Case Managers Performance",
            Self::TeamSummary => "CMT Performance Summary",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::CaseManagersPerformance => {
                "Detailed performance metrics for all case managers"
            }
            Self::TeamSummary => "Comprehensive summary of all case management teams",
        }
    }

    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            Self::CaseManagersPerformance => &[
                "Name",
                "Role",
                "State",
                "CMT",
                "TX_CURR",
                "IIT",
                "Appointment Compliance (%)",
                "Appointment Details",
                "VL Coverage (%)",
                "VL Coverage Details",
                "VL Suppression (%)",
                "VL Suppression Details",
                "Overall Score",
            ],
            Self::TeamSummary => &[
                "CMT",
                "State",
                "Case Managers",
                "TX_CURR",
                "IIT",
                "Appointment Compliance (%)",
                "Appointment Details",
                "VL Coverage (%)",
                "VL Coverage Details",
                "VL Suppression (%)",
                "VL Suppression Details",
                "Overall Score",
            ],
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "case-managers-performance" => Some(Self::CaseManagersPerformance),
            "team-summary" => Some(Self::TeamSummary),
            _ => None,
        }
    }
}

/// One projected row: values aligned positionally with the kind's columns.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    values: Vec<String>,
}

impl ReportRow {
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// A fully projected report ready for any of its consumers.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    pub generated_on: NaiveDate,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn case_managers(rows: &[CaseManagerRow], generated_on: NaiveDate) -> Self {
        Self {
            kind: ReportKind::CaseManagersPerformance,
            generated_on,
            rows: rows.iter().map(project_case_manager).collect(),
        }
    }

    pub fn team_summary(rows: &[TeamRow], generated_on: NaiveDate) -> Self {
        Self {
            kind: ReportKind::TeamSummary,
            generated_on,
            rows: rows.iter().map(project_team).collect(),
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.kind.columns()
    }

    /// Download name, e.g. `case-managers-performance-2026-08-23.csv`.
    pub fn file_name(&self) -> String {
        format!("{}-{}.csv", self.kind.id(), self.generated_on.format("%Y-%m-%d"))
    }

    /// Serialize with the column labels as the header row.
    pub fn to_csv(&self) -> Result<String, ReportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.columns())?;
        for row in &self.rows {
            writer.write_record(row.values())?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| ReportError::Flush(err.to_string()))?;
        Ok(String::from_utf8(bytes)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("could not serialize report: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not finish report output: {0}")]
    Flush(String),
    #[error("report output was not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Case-manager row projection: one function for every consumer, so the
/// exported file always matches what the table showed.
pub fn project_case_manager(row: &CaseManagerRow) -> ReportRow {
    let summary = &row.summary;
    ReportRow {
        values: vec![
            row.fullname.clone(),
            row.role.clone(),
            row.state.clone(),
            row.team.clone(),
            group_thousands(summary.active_on_treatment),
            group_thousands(summary.interrupted),
            summary.appointments.completion_rate.one_decimal(),
            format!(
                "{}/{}",
                summary.appointments.completed, summary.appointments.scheduled
            ),
            summary.viral_load.coverage.one_decimal(),
            format!(
                "{}/{}",
                summary.viral_load.samples, summary.viral_load.eligible
            ),
            summary.viral_load.suppression.one_decimal(),
            format!(
                "{}/{}",
                summary.viral_load.suppressed, summary.viral_load.results
            ),
            format!("{:.1}", summary.score),
        ],
    }
}

/// Team row projection.
pub fn project_team(row: &TeamRow) -> ReportRow {
    let summary = &row.summary;
    ReportRow {
        values: vec![
            row.name.clone(),
            row.state.clone(),
            group_thousands(row.case_managers_count),
            group_thousands(summary.active_on_treatment),
            group_thousands(summary.interrupted),
            summary.appointments.completion_rate.one_decimal(),
            format!(
                "{}/{}",
                summary.appointments.completed, summary.appointments.scheduled
            ),
            summary.viral_load.coverage.one_decimal(),
            format!(
                "{}/{}",
                summary.viral_load.samples, summary.viral_load.eligible
            ),
            summary.viral_load.suppression.one_decimal(),
            format!(
                "{}/{}",
                summary.viral_load.suppressed, summary.viral_load.results
            ),
            format!("{:.1}", summary.score),
        ],
    }
}
