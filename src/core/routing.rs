use crate::domain::model::{
    AggregatedResults, CountryRouting, ErrorEntry, IdentifierSet, Provision, ResponseItem,
    RoutingResponse,
};
use std::collections::BTreeMap;

pub const NO_MATCH_CODE: &str = "no-match";
pub const NO_MATCH_MESSAGE: &str =
    "No routing information found for the requested Canonical Object Type IDs";

/// Builds the routing response: one item per matched identifier, in request order.
pub fn build_response(
    identifiers: &IdentifierSet,
    aggregated: &AggregatedResults,
) -> RoutingResponse {
    let items: Vec<ResponseItem> = identifiers
        .iter()
        .filter_map(|id| aggregated.get(id).map(|list| (id, list)))
        .map(|(id, list)| {
            // 以國家代碼分組，同一國家內以 data owner 去重
            let mut countries: BTreeMap<String, Vec<Provision>> = BTreeMap::new();
            for entry in &list.matches {
                let data_owner_id = entry.participant_id.uri_encoded();
                for entity in &entry.entities {
                    let country_code = entity.country_code.trim().to_ascii_uppercase();
                    if country_code.is_empty() {
                        continue;
                    }
                    let provisions = countries.entry(country_code).or_default();
                    if provisions.iter().any(|p| p.data_owner_id == data_owner_id) {
                        continue;
                    }
                    provisions.push(Provision {
                        data_owner_id: data_owner_id.clone(),
                        data_owner_pref_label: entity.preferred_name().map(str::to_string),
                    });
                }
            }

            ResponseItem {
                canonical_object_type_id: id.to_string(),
                countries: countries
                    .into_iter()
                    .map(|(country_code, provisions)| CountryRouting {
                        country_code,
                        provisions,
                    })
                    .collect(),
            }
        })
        .collect();

    let mut response = RoutingResponse {
        items,
        errors: Vec::new(),
    };
    if response.items.is_empty() {
        response.add_error(ErrorEntry::new(NO_MATCH_CODE, NO_MATCH_MESSAGE));
    }
    response
}
