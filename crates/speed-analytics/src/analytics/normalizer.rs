use std::collections::HashMap;

use tracing::warn;

use super::domain::{CaseManagerRow, TeamMember, TeamRow};
use super::wire::{
    summarize_case_manager, summarize_team, PerformanceRecord, RawCaseManager,
    RawCaseManagerPerformance, RawTeamPerformance,
};

/// Separator between values of a flattened multi-valued field.
pub const VALUE_SEPARATOR: &str = " / ";
/// Rendering for a multi-valued field with no observed values.
pub const EMPTY_PLACEHOLDER: &str = "N/A";

/// Output of a normalization pass. `dropped` counts raw records that had
/// no resolvable identity and therefore do not appear in either list.
#[derive(Debug, Default)]
pub struct NormalizedRecords {
    pub case_managers: Vec<CaseManagerRow>,
    pub teams: Vec<TeamRow>,
    pub dropped: usize,
}

/// Collapse raw records into one normalized record per unique identity.
///
/// Case managers group by identity key; within a group every multi-valued
/// affiliation keeps distinct non-empty values in first-seen order and the
/// first member supplies everything else, including the performance
/// snapshot. Teams key on their name and the first record wins outright.
/// Records without an identity are dropped, counted, and logged.
pub fn normalize(records: Vec<PerformanceRecord>) -> NormalizedRecords {
    let mut managers: Vec<ManagerGroup> = Vec::new();
    let mut manager_index: HashMap<String, usize> = HashMap::new();
    let mut teams: Vec<TeamRow> = Vec::new();
    let mut team_index: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0usize;

    for record in records {
        match record {
            PerformanceRecord::CaseManager(raw) => {
                let Some(identity) = raw.case_manager.identity() else {
                    dropped += 1;
                    continue;
                };
                match manager_index.get(&identity) {
                    Some(&slot) => managers[slot].absorb(&raw.case_manager),
                    None => {
                        manager_index.insert(identity.clone(), managers.len());
                        managers.push(ManagerGroup::open(identity, raw));
                    }
                }
            }
            PerformanceRecord::Team(raw) => {
                let Some(identity) = raw.identity() else {
                    dropped += 1;
                    continue;
                };
                if !team_index.contains_key(&identity) {
                    team_index.insert(identity, teams.len());
                    teams.push(team_row(raw));
                }
            }
        }
    }

    if dropped > 0 {
        warn!(
            dropped,
            "raw performance records without a resolvable identity were dropped"
        );
    }

    NormalizedRecords {
        case_managers: managers.into_iter().map(ManagerGroup::finish).collect(),
        teams,
        dropped,
    }
}

/// Convenience wrapper for the case-manager list endpoint.
pub fn normalize_case_managers(
    raw: Vec<RawCaseManagerPerformance>,
) -> (Vec<CaseManagerRow>, usize) {
    let normalized = normalize(raw.into_iter().map(PerformanceRecord::CaseManager).collect());
    (normalized.case_managers, normalized.dropped)
}

/// Convenience wrapper for the team list endpoint.
pub fn normalize_teams(raw: Vec<RawTeamPerformance>) -> (Vec<TeamRow>, usize) {
    let normalized = normalize(raw.into_iter().map(PerformanceRecord::Team).collect());
    (normalized.teams, normalized.dropped)
}

/// Flatten a multi-value set to its display string.
pub fn flatten(values: &[String]) -> String {
    if values.is_empty() {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        values.join(VALUE_SEPARATOR)
    }
}

struct ManagerGroup {
    identity: String,
    first: RawCaseManagerPerformance,
    roles: Vec<String>,
    teams: Vec<String>,
    facilities: Vec<String>,
    states: Vec<String>,
}

impl ManagerGroup {
    fn open(identity: String, raw: RawCaseManagerPerformance) -> Self {
        let mut group = Self {
            identity,
            roles: Vec::new(),
            teams: Vec::new(),
            facilities: Vec::new(),
            states: Vec::new(),
            first: raw,
        };
        let seed = group.first.case_manager.clone();
        group.absorb(&seed);
        group
    }

    fn absorb(&mut self, identity: &RawCaseManager) {
        push_unique(&mut self.roles, identity.role.as_deref());
        push_unique(&mut self.teams, identity.cmt.as_deref());
        push_unique(&mut self.facilities, identity.facilities.as_deref());
        push_unique(&mut self.states, identity.state.as_deref());
    }

    fn finish(self) -> CaseManagerRow {
        CaseManagerRow {
            id: self.identity,
            fullname: self
                .first
                .case_manager
                .fullname
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| EMPTY_PLACEHOLDER.to_string()),
            role: flatten(&self.roles),
            team: flatten(&self.teams),
            facilities: flatten(&self.facilities),
            state: flatten(&self.states),
            created_at: self.first.case_manager.created_at.clone(),
            summary: summarize_case_manager(&self.first.performance),
        }
    }
}

/// Append a trimmed, non-empty value not already present. First-seen order
/// is what the flattened display string preserves.
fn push_unique(values: &mut Vec<String>, candidate: Option<&str>) {
    let Some(candidate) = candidate else {
        return;
    };
    let trimmed = candidate.trim();
    if trimmed.is_empty() || values.iter().any(|existing| existing == trimmed) {
        return;
    }
    values.push(trimmed.to_string());
}

fn team_row(raw: RawTeamPerformance) -> TeamRow {
    let summary = summarize_team(&raw);
    let members = raw
        .case_managers
        .iter()
        .filter_map(|member| {
            let fullname = member.fullname.as_deref()?.trim();
            if fullname.is_empty() {
                return None;
            }
            Some(TeamMember {
                fullname: fullname.to_string(),
                role: member
                    .role
                    .clone()
                    .filter(|role| !role.trim().is_empty())
                    .unwrap_or_else(|| EMPTY_PLACEHOLDER.to_string()),
            })
        })
        .collect();

    TeamRow {
        name: raw.cmt.as_deref().unwrap_or(EMPTY_PLACEHOLDER).trim().to_string(),
        state: single_value(raw.state.as_deref()),
        facility: single_value(raw.facility_name.as_deref()),
        case_managers_count: raw.case_managers_count,
        patient_count: raw.patient_count,
        members,
        summary,
    }
}

fn single_value(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
        _ => EMPTY_PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::wire::{RawCaseManager, RawCaseManagerMetrics};

    fn raw_manager(
        id: Option<&str>,
        cm_id: Option<i64>,
        role: &str,
        cmt: &str,
        state: &str,
        score: f64,
    ) -> RawCaseManagerPerformance {
        RawCaseManagerPerformance {
            case_manager: RawCaseManager {
                id: id.map(str::to_string),
                cm_id,
                fullname: Some("Adaeze Obi".to_string()),
                role: Some(role.to_string()),
                cmt: Some(cmt.to_string()),
                facilities: Some("General Hospital".to_string()),
                state: Some(state.to_string()),
                created_at: Some("2025-01-15T08:00:00Z".to_string()),
            },
            performance: RawCaseManagerMetrics {
                tx_cur: 100,
                iit: 10,
                final_score: score,
                ..RawCaseManagerMetrics::default()
            },
        }
    }

    #[test]
    fn duplicate_records_group_into_one_row_with_flattened_fields() {
        let first = raw_manager(Some("7"), None, "Nurse", "Alpha", "Lagos", 90.0);
        let second = raw_manager(Some("7"), None, "Counselor", "Beta", "Lagos", 10.0);

        let (rows, dropped) = normalize_case_managers(vec![first, second]);
        assert_eq!(dropped, 0);
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.id, "7");
        assert_eq!(row.role, "Nurse / Counselor");
        assert_eq!(row.team, "Alpha / Beta");
        assert_eq!(row.state, "Lagos");
        // First member's snapshot only; the second's score is discarded.
        assert_eq!(row.summary.score, 90.0);
    }

    #[test]
    fn flattening_is_idempotent_and_never_produces_empty_segments() {
        let mut values = Vec::new();
        push_unique(&mut values, Some("Nurse"));
        push_unique(&mut values, Some("  "));
        push_unique(&mut values, Some("Nurse"));
        push_unique(&mut values, Some("Counselor"));
        push_unique(&mut values, None);

        let joined = flatten(&values);
        assert_eq!(joined, "Nurse / Counselor");
        assert!(!joined.contains("  /"));
        assert!(!joined.contains("/ /"));
        assert_eq!(flatten(&values), joined);
    }

    #[test]
    fn absent_multi_value_fields_render_the_placeholder() {
        let mut raw = raw_manager(Some("9"), None, "", "", "", 55.0);
        raw.case_manager.role = None;

        let (rows, _) = normalize_case_managers(vec![raw]);
        assert_eq!(rows[0].role, "N/A");
        assert_eq!(rows[0].team, "N/A");
        assert_eq!(rows[0].state, "N/A");
    }

    #[test]
    fn records_without_identity_are_dropped_and_counted() {
        let ghost = raw_manager(None, None, "Nurse", "Alpha", "Lagos", 70.0);
        let keeper = raw_manager(Some(""), Some(12), "Nurse", "Alpha", "Lagos", 70.0);

        let (rows, dropped) = normalize_case_managers(vec![ghost, keeper]);
        assert_eq!(dropped, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "12");
    }

    #[test]
    fn single_member_group_passes_through() {
        let raw = raw_manager(Some("3"), None, "Nurse", "Alpha", "Abuja", 64.0);
        let (rows, dropped) = normalize_case_managers(vec![raw]);
        assert_eq!(dropped, 0);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].role, "Nurse");
        assert_eq!(rows[0].team, "Alpha");
    }

    #[test]
    fn duplicate_team_names_keep_the_first_record() {
        let team = |name: &str, score: f64| RawTeamPerformance {
            cmt: Some(name.to_string()),
            state: Some("Lagos".to_string()),
            facility_name: None,
            case_managers_count: 4,
            tx_cur: 100,
            iit: 5,
            transferred_out: 0,
            discontinued: 0,
            dead: 0,
            appointments: Default::default(),
            viral_load: Default::default(),
            average_score: score,
            case_managers: Vec::new(),
            patient_count: 90,
        };

        let (teams, dropped) = normalize_teams(vec![
            team("Team A", 80.0),
            team("Team A", 20.0),
            team("", 50.0),
        ]);
        assert_eq!(dropped, 1);
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].summary.score, 80.0);
        assert_eq!(teams[0].facility, "N/A");
    }
}
