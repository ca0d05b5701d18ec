use heck::ToUpperCamelCase;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Logical ID for a construct path, e.g. `["demo", "green-target-group"]`
/// becomes `DemoGreenTargetGroup`.
pub fn logical_id(path: &[&str]) -> String {
    path.iter()
        .map(|segment| segment.to_upper_camel_case())
        .collect::<Vec<_>>()
        .join("")
}

/// Deterministic 8-hex-char suffix for generated resource names.
/// Derived from the construct path so repeated synthesis is stable.
pub fn unique_suffix(path: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for segment in path {
        hasher.update(segment.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    digest
        .iter()
        .take(4)
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Validate a load-balancer target group name.
/// Constraints: 1-32 chars, alphanumeric and hyphens, no leading or
/// trailing hyphen.
pub fn validate_target_group_name(field: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::naming_invalid_name(field, name, "Name is empty"));
    }
    if name.len() > 32 {
        return Err(Error::naming_invalid_name(
            field,
            name,
            format!("Name is {} chars; limit is 32", name.len()),
        ));
    }

    let pattern = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]*$")
        .map_err(|e| Error::internal_unexpected(e.to_string()))?;
    if !pattern.is_match(name) {
        return Err(Error::naming_invalid_name(
            field,
            name,
            "Only alphanumeric characters and hyphens are allowed, starting with an alphanumeric",
        ));
    }
    if name.ends_with('-') {
        return Err(Error::naming_invalid_name(
            field,
            name,
            "Name cannot end with a hyphen",
        ));
    }

    Ok(())
}

/// Validate a registry name: lowercase, digits, and separators
/// (hyphen, underscore, slash), 2-256 chars.
pub fn validate_registry_name(field: &str, name: &str) -> Result<()> {
    if name.len() < 2 || name.len() > 256 {
        return Err(Error::naming_invalid_name(
            field,
            name,
            "Registry name must be 2-256 chars",
        ));
    }

    let pattern = Regex::new(r"^[a-z0-9]+(?:[._/-][a-z0-9]+)*$")
        .map_err(|e| Error::internal_unexpected(e.to_string()))?;
    if !pattern.is_match(name) {
        return Err(Error::naming_invalid_name(
            field,
            name,
            "Registry names are lowercase alphanumeric with . _ / - separators",
        ));
    }

    Ok(())
}
