use serde::Deserialize;

use super::domain::Searchable;

/// Facet sentinel meaning "no restriction".
pub const ALL: &str = "all";

/// Conjunction of a free-text query and exact-match facets, applied over a
/// normalized record collection. Pure and synchronous; the same inputs
/// always select the same records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, alias = "cmt")]
    pub team: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl RecordFilter {
    pub fn is_unrestricted(&self) -> bool {
        facet_value(self.search.as_deref()).is_none()
            && facet_value(self.team.as_deref()).is_none()
            && facet_value(self.state.as_deref()).is_none()
    }

    /// A record passes when every set facet matches and, if a query is
    /// present, at least one searchable field contains it.
    pub fn matches<R: Searchable>(&self, record: &R) -> bool {
        if let Some(state) = facet_value(self.state.as_deref()) {
            if !record.state().eq_ignore_ascii_case(state) {
                return false;
            }
        }

        // The team field may itself be a flattened multi-value string, so
        // the facet is a containment check rather than equality.
        if let Some(team) = facet_value(self.team.as_deref()) {
            if !contains_ignore_case(record.team(), team) {
                return false;
            }
        }

        if let Some(query) = facet_value(self.search.as_deref()) {
            let hit = contains_ignore_case(record.name(), query)
                || contains_ignore_case(record.role(), query)
                || contains_ignore_case(record.facility(), query)
                || contains_ignore_case(record.state(), query)
                || contains_ignore_case(record.team(), query);
            if !hit {
                return false;
            }
        }

        true
    }

    pub fn apply<R: Searchable + Clone>(&self, records: &[R]) -> Vec<R> {
        if self.is_unrestricted() {
            return records.to_vec();
        }
        records
            .iter()
            .filter(|record| self.matches(*record))
            .cloned()
            .collect()
    }
}

/// Treat blank strings and the `"all"` sentinel the same as an unset facet.
fn facet_value(raw: Option<&str>) -> Option<&str> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
        None
    } else {
        Some(trimmed)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
