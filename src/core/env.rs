use serde::Serialize;

/// Account and region inputs for synthesis.
///
/// These are explicit inputs rather than an ambient lookup inside the
/// composition pass. A missing value degrades to the empty string so a
/// spec can be composed and validated on a machine with no cloud
/// credentials configured; the provisioning control plane resolves the
/// real values at deploy time.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthEnvironment {
    pub account: String,
    pub region: String,
}

pub const ACCOUNT_VAR: &str = "CUTOVER_ACCOUNT";
pub const REGION_VAR: &str = "CUTOVER_REGION";

impl SynthEnvironment {
    /// Build from optional values; `None` becomes the empty string.
    pub fn new(account: Option<String>, region: Option<String>) -> Self {
        Self {
            account: account.unwrap_or_default(),
            region: region.unwrap_or_default(),
        }
    }

    /// Read `CUTOVER_ACCOUNT` / `CUTOVER_REGION` from the process
    /// environment, falling back to empty strings.
    pub fn from_process_env() -> Self {
        Self::new(std::env::var(ACCOUNT_VAR).ok(), std::env::var(REGION_VAR).ok())
    }

    /// Explicit values win over the process environment.
    pub fn resolve(account: Option<String>, region: Option<String>) -> Self {
        let fallback = Self::from_process_env();
        Self {
            account: account.unwrap_or(fallback.account),
            region: region.unwrap_or(fallback.region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_become_empty_strings() {
        let env = SynthEnvironment::new(None, None);
        assert_eq!(env.account, "");
        assert_eq!(env.region, "");
    }

    #[test]
    fn explicit_values_pass_through() {
        let env = SynthEnvironment::new(Some("123456789012".into()), Some("us-east-1".into()));
        assert_eq!(env.account, "123456789012");
        assert_eq!(env.region, "us-east-1");
    }

    #[test]
    fn resolve_prefers_explicit_over_process_env() {
        let env = SynthEnvironment::resolve(Some("999".into()), Some("eu-west-1".into()));
        assert_eq!(env.account, "999");
        assert_eq!(env.region, "eu-west-1");
    }
}
