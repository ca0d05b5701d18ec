use serde::Serialize;

use crate::env::SynthEnvironment;
use crate::error::{Error, Result};
use crate::graph::ResourceNode;
use crate::stack::{OutputValue, Topology};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifestFormat {
    #[default]
    Json,
    Yaml,
}

impl ManifestFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(ManifestFormat::Json),
            "yaml" | "yml" => Ok(ManifestFormat::Yaml),
            other => Err(Error::validation_invalid_argument(
                "format",
                format!("Unknown manifest format '{}'", other),
                None,
                Some(vec!["json".to_string(), "yaml".to_string()]),
            )),
        }
    }
}

/// Serializable rendering of a composed topology, handed to the
/// provisioning control plane for reconciliation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub name: String,
    pub environment: SynthEnvironment,
    /// Resources listed in construction order.
    pub resources: Vec<ManifestResource>,
    pub pipeline: crate::pipeline::Pipeline,
    pub outputs: Vec<OutputValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestResource {
    pub id: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl Manifest {
    pub fn from_topology(topology: &Topology, env: &SynthEnvironment) -> Self {
        let resources = topology
            .graph
            .construction_order()
            .into_iter()
            .map(ManifestResource::from_node)
            .collect();

        Self {
            name: topology.name.clone(),
            environment: env.clone(),
            resources,
            pipeline: topology.pipeline.clone(),
            outputs: topology.outputs.clone(),
            warnings: topology.warnings.clone(),
        }
    }

    pub fn render(&self, format: ManifestFormat) -> Result<String> {
        match format {
            ManifestFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| Error::internal_json(e.to_string(), Some("render manifest".to_string()))),
            ManifestFormat::Yaml => serde_yml::to_string(self)
                .map_err(|e| Error::internal_yaml(e.to_string(), Some("render manifest".to_string()))),
        }
    }
}

impl ManifestResource {
    fn from_node(node: &ResourceNode) -> Self {
        Self {
            id: node.id.clone(),
            kind: node.kind.as_str().to_string(),
            depends_on: node.depends_on.clone(),
        }
    }
}
