use crate::domain::model::{IdentifierSet, LookupQuery};
use crate::utils::error::{GatewayError, Result};
use std::collections::HashSet;

pub const NO_IDENTIFIER_MESSAGE: &str = "No Canonical Object Type ID was passed";

/// Splits the comma-separated identifier parameter into an ordered, duplicate-free set.
pub fn normalize_identifiers(raw: Option<&str>) -> Result<IdentifierSet> {
    let mut seen = HashSet::new();
    let ids: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter(|token| seen.insert(*token))
        .map(str::to_string)
        .collect();

    if ids.is_empty() {
        return Err(GatewayError::invalid_request(NO_IDENTIFIER_MESSAGE));
    }
    Ok(IdentifierSet::from_unique(ids))
}

/// Normalizes both path parameters. A blank region code counts as absent.
pub fn normalize_request(raw_ids: Option<&str>, region_code: Option<&str>) -> Result<LookupQuery> {
    let identifiers = normalize_identifiers(raw_ids)?;
    let region_code = region_code
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string);

    Ok(LookupQuery {
        identifiers,
        region_code,
    })
}
