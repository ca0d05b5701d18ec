use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::naming;

/// Remote repository coordinates for a source checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSource {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl RepoSource {
    pub fn slug(&self) -> String {
        format!("{}/{}@{}", self.owner, self.repo, self.branch)
    }
}

/// Declarative input for topology composition.
///
/// Loaded from `cutover.toml` (or a JSON file / inline JSON spec). Every
/// field has a default, so an empty spec composes the reference topology:
/// a single-zone network, a port-80 service, and the standard
/// Source/Build/Deploy release pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopologySpec {
    /// Stack name; prefixes logical IDs and generated resource names.
    pub name: String,
    /// Availability-zone cap for the network boundary. Kept at 1 to stay
    /// inside per-zone resource quotas.
    pub zones: u8,
    pub registry_name: String,
    pub container_port: u16,
    pub image_tag: String,
    pub green_target_group_name: String,
    /// Path to the build-step definition consumed by the build project.
    /// Contents are interpreted by the external build service.
    pub build_spec_path: String,
    /// Name of the checkout credential in the external secret store.
    /// Always a reference; the value is never embedded here.
    pub token_secret: String,
    pub privileged_build: bool,
    /// Repository the build project checks out.
    pub build_source: RepoSource,
    /// Repository the pipeline's source stage watches.
    pub pipeline_source: RepoSource,
}

impl Default for TopologySpec {
    fn default() -> Self {
        Self {
            name: "cutover".to_string(),
            zones: 1,
            registry_name: "cdk-lb-ecs-service-ecr-repo".to_string(),
            container_port: 80,
            image_tag: "latest".to_string(),
            green_target_group_name: "alb-green-tg".to_string(),
            build_spec_path: "app/buildspec.yaml".to_string(),
            token_secret: "github_token1".to_string(),
            privileged_build: true,
            build_source: RepoSource {
                owner: "SavvasLearning".to_string(),
                repo: "pdf-viewer-bff-service".to_string(),
                branch: "develop".to_string(),
            },
            pipeline_source: RepoSource {
                owner: "ckgupta".to_string(),
                repo: "cdk-lb-ecs-service".to_string(),
                branch: "main".to_string(),
            },
        }
    }
}

impl TopologySpec {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::spec_missing_key("name", None));
        }
        if self.zones == 0 {
            return Err(Error::spec_invalid_value(
                "zones",
                Some(self.zones.to_string()),
                "Network boundary needs at least one availability zone",
            ));
        }
        if self.container_port == 0 {
            return Err(Error::spec_invalid_value(
                "containerPort",
                Some(self.container_port.to_string()),
                "Container port cannot be 0",
            ));
        }
        if self.image_tag.trim().is_empty() {
            return Err(Error::spec_missing_key("imageTag", None));
        }
        if self.build_spec_path.trim().is_empty() {
            return Err(Error::spec_missing_key("buildSpecPath", None));
        }
        if self.token_secret.trim().is_empty() {
            return Err(Error::spec_missing_key("tokenSecret", None));
        }

        naming::validate_registry_name("registryName", &self.registry_name)?;
        naming::validate_target_group_name(
            "greenTargetGroupName",
            &self.green_target_group_name,
        )?;

        validate_repo("buildSource", &self.build_source)?;
        validate_repo("pipelineSource", &self.pipeline_source)?;

        Ok(())
    }

    /// The two source repositories may legitimately differ, but a mismatch
    /// usually means one of them is stale. Surfaced as a warning, not an
    /// error.
    pub fn source_mismatch_warning(&self) -> Option<String> {
        if self.build_source == self.pipeline_source {
            return None;
        }
        Some(format!(
            "Build project checks out {} but the pipeline source stage watches {}; \
             confirm both repositories are intended",
            self.build_source.slug(),
            self.pipeline_source.slug()
        ))
    }
}

fn validate_repo(field: &str, repo: &RepoSource) -> Result<()> {
    for (key, value) in [
        ("owner", &repo.owner),
        ("repo", &repo.repo),
        ("branch", &repo.branch),
    ] {
        if value.trim().is_empty() {
            return Err(Error::spec_missing_key(format!("{}.{}", field, key), None));
        }
    }
    Ok(())
}

/// Load a spec from a TOML or JSON file, chosen by extension.
pub fn load(path: &Path) -> Result<TopologySpec> {
    let raw = crate::utils::io::read_to_string(path)?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(true);

    let spec: TopologySpec = if is_toml {
        toml::from_str(&raw)
            .map_err(|e| Error::spec_invalid_format(path.display().to_string(), e.to_string()))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| Error::spec_invalid_format(path.display().to_string(), e.to_string()))?
    };

    spec.validate()?;
    Ok(spec)
}

/// Parse an inline JSON spec (the `--json` CLI path).
pub fn from_json(raw: &str) -> Result<TopologySpec> {
    let spec: TopologySpec = serde_json::from_str(raw)
        .map_err(|e| Error::validation_invalid_json(e, Some("parse topology spec".to_string())))?;
    spec.validate()?;
    Ok(spec)
}

/// Starter spec file contents for `cutover init`.
pub fn starter_toml() -> Result<String> {
    toml::to_string_pretty(&TopologySpec::default())
        .map_err(|e| Error::internal_unexpected(e.to_string()))
}
