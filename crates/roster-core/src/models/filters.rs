//! Roster query filters.
//!
//! Filtering happens server-side; this type only carries the criteria and
//! serializes them into query parameters.

use serde::{Deserialize, Serialize};

/// Criteria restricting which trips a roster load returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterFilters {
    /// Operating sector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// One or more line codes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_codes: Vec<String>,
    /// Duty/service number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_number: Option<String>,
    /// Direction of travel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// Original driver name (substring match server-side)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    /// Original driver badge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_badge: Option<String>,
    /// Trip origin location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Trip destination location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Restrict to trips with (true) or without (false) saved edits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_only: Option<bool>,
    /// Free-text search across line, crew, and locations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
}

impl RosterFilters {
    /// True when no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Query pairs for the roster endpoint; empty criteria are omitted.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |key, value: &Option<String>| {
            if let Some(value) = value.as_deref().map(str::trim) {
                if !value.is_empty() {
                    pairs.push((key, value.to_string()));
                }
            }
        };
        push("sector", &self.sector);
        push("service_number", &self.service_number);
        push("direction", &self.direction);
        push("driver_name", &self.driver_name);
        push("driver_badge", &self.driver_badge);
        push("origin", &self.origin);
        push("destination", &self.destination);
        push("search_text", &self.search_text);
        for code in &self.line_codes {
            if !code.trim().is_empty() {
                pairs.push(("line_code", code.trim().to_string()));
            }
        }
        if let Some(edited) = self.edited_only {
            pairs.push(("edited_only", edited.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_produce_no_pairs() {
        assert!(RosterFilters::default().is_empty());
        assert!(RosterFilters::default().to_query_pairs().is_empty());
    }

    #[test]
    fn query_pairs_skip_blank_values() {
        let filters = RosterFilters {
            sector: Some("  ".to_string()),
            line_codes: vec!["0100".to_string(), String::new()],
            edited_only: Some(true),
            ..RosterFilters::default()
        };
        let pairs = filters.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("line_code", "0100".to_string()),
                ("edited_only", "true".to_string()),
            ]
        );
    }
}
