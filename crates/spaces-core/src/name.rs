// SPDX-License-Identifier: MIT

//! Display-name normalization and auto-derivation.

use crate::error::ValidationError;
use url::Url;

/// Trim leading/trailing whitespace and collapse any run of internal
/// whitespace (spaces, tabs, line breaks) to a single space. Rejects the
/// result if it comes out empty.
pub fn normalize_name(raw: &str) -> Result<String, ValidationError> {
    let collapsed = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if collapsed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(collapsed)
}

/// Derive an auto-name from a workspace's URL list: the host of the first
/// URL, or `"Workspace"` when the list is empty or the URL has no host.
pub fn derive_name(urls: &[String]) -> String {
    urls.first()
        .and_then(|first| Url::parse(first).ok())
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| "Workspace".to_string())
}

/// Checks a URL string is syntactically valid per the import validation pass.
pub fn validate_url(raw: &str) -> Result<(), ValidationError> {
    Url::parse(raw)
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidUrl(raw.to_string(), e.to_string()))
}

#[cfg(test)]
#[path = "name_tests.rs"]
mod tests;
