use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered, duplicate-free, non-empty set of canonical object type identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierSet {
    ids: Vec<String>,
}

impl IdentifierSet {
    /// Only the normalizer creates sets, so the non-empty invariant holds.
    pub(crate) fn from_unique(ids: Vec<String>) -> Self {
        debug_assert!(!ids.is_empty());
        Self { ids }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }
}

/// Normalized lookup input: the identifiers plus the optional region (ATU) code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    pub identifiers: IdentifierSet,
    pub region_code: Option<String>,
}

/// `<participantID scheme="...">value</participantID>` and friends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemedIdentifier {
    #[serde(rename = "@scheme", default)]
    pub scheme: String,
    #[serde(rename = "$text", default)]
    pub value: String,
}

impl SchemedIdentifier {
    pub fn new(scheme: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            value: value.into(),
        }
    }

    /// `scheme::value`, or just the value if no scheme is present.
    pub fn uri_encoded(&self) -> String {
        if self.scheme.is_empty() {
            self.value.trim().to_string()
        } else {
            format!("{}::{}", self.scheme.trim(), self.value.trim())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityName {
    #[serde(rename = "@language", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "$text", default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessEntity {
    #[serde(rename = "name", default)]
    pub names: Vec<EntityName>,
    #[serde(rename = "countryCode", default)]
    pub country_code: String,
    #[serde(rename = "geoInfo", default, skip_serializing_if = "Option::is_none")]
    pub geo_info: Option<String>,
    #[serde(rename = "website", default)]
    pub websites: Vec<String>,
    #[serde(rename = "regDate", default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
}

impl BusinessEntity {
    pub fn preferred_name(&self) -> Option<&str> {
        self.names
            .iter()
            .map(|n| n.value.trim())
            .find(|n| !n.is_empty())
    }
}

/// One registered participant for the queried document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
    #[serde(rename = "participantID")]
    pub participant_id: SchemedIdentifier,
    #[serde(rename = "docTypeID", default)]
    pub doc_type_ids: Vec<SchemedIdentifier>,
    #[serde(rename = "entity", default)]
    pub entities: Vec<BusinessEntity>,
}

/// Parsed `<resultlist>` of the directory search API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryResultList {
    #[serde(rename = "@total-result-count", default)]
    pub total_result_count: Option<u32>,
    #[serde(rename = "@query-terms", default)]
    pub query_terms: Option<String>,
    #[serde(rename = "match", default)]
    pub matches: Vec<MatchEntry>,
}

impl DirectoryResultList {
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// Identifier → directory result, only for identifiers with at least one match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedResults {
    results: HashMap<String, DirectoryResultList>,
}

impl AggregatedResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignores result lists without matches.
    pub fn insert(&mut self, identifier: impl Into<String>, list: DirectoryResultList) -> bool {
        if !list.has_matches() {
            return false;
        }
        self.results.insert(identifier.into(), list);
        true
    }

    pub fn get(&self, identifier: &str) -> Option<&DirectoryResultList> {
        self.results.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.results.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorEntry {
    pub code: String,
    pub text: String,
}

impl ErrorEntry {
    pub fn new(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Provision {
    pub data_owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data_owner_pref_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CountryRouting {
    pub country_code: String,
    #[serde(rename = "Provision", default)]
    pub provisions: Vec<Provision>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseItem {
    #[serde(rename = "CanonicalObjectTypeID")]
    pub canonical_object_type_id: String,
    #[serde(rename = "ResponsePerCountry", default)]
    pub countries: Vec<CountryRouting>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingResponse {
    #[serde(rename = "ResponseItem", default)]
    pub items: Vec<ResponseItem>,
    #[serde(rename = "Error", default)]
    pub errors: Vec<ErrorEntry>,
}

impl RoutingResponse {
    pub fn from_error(error: ErrorEntry) -> Self {
        Self {
            items: Vec::new(),
            errors: vec![error],
        }
    }

    pub fn add_error(&mut self, error: ErrorEntry) {
        self.errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with_matches(count: usize) -> DirectoryResultList {
        DirectoryResultList {
            total_result_count: Some(count as u32),
            query_terms: None,
            matches: (0..count)
                .map(|i| MatchEntry {
                    participant_id: SchemedIdentifier::new(
                        "iso6523-actorid-upis",
                        format!("9915:p{}", i),
                    ),
                    doc_type_ids: vec![],
                    entities: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn test_aggregated_results_skip_empty_lists() {
        let mut results = AggregatedResults::new();
        assert!(!results.insert("X", list_with_matches(0)));
        assert!(results.insert("Y", list_with_matches(2)));

        assert_eq!(results.len(), 1);
        assert!(!results.contains("X"));
        assert_eq!(results.get("Y").map(|l| l.matches.len()), Some(2));
    }

    #[test]
    fn test_schemed_identifier_uri_encoding() {
        let id = SchemedIdentifier::new("iso6523-actorid-upis", " 9915:test ");
        assert_eq!(id.uri_encoded(), "iso6523-actorid-upis::9915:test");
        assert_eq!(SchemedIdentifier::new("", "abc").uri_encoded(), "abc");
    }

    #[test]
    fn test_preferred_name_skips_blank_names() {
        let entity = BusinessEntity {
            names: vec![
                EntityName {
                    language: None,
                    value: "  ".into(),
                },
                EntityName {
                    language: Some("de".into()),
                    value: "Bundesamt".into(),
                },
            ],
            country_code: "AT".into(),
            geo_info: None,
            websites: vec![],
            registration_date: None,
        };
        assert_eq!(entity.preferred_name(), Some("Bundesamt"));
    }
}
