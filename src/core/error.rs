use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    SpecMissingKey,
    SpecInvalidFormat,
    SpecInvalidValue,

    ValidationMissingArgument,
    ValidationInvalidArgument,
    ValidationInvalidJson,

    TopologyDuplicateResource,
    TopologyUnknownDependency,

    PipelineEmpty,
    PipelineStageOrder,
    PipelineDuplicateArtifact,
    PipelineArtifactUnresolved,

    DeploymentTargetGroupConflict,
    DeploymentMissingListener,

    NamingInvalidName,

    InternalIoError,
    InternalJsonError,
    InternalYamlError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SpecMissingKey => "spec.missing_key",
            ErrorCode::SpecInvalidFormat => "spec.invalid_format",
            ErrorCode::SpecInvalidValue => "spec.invalid_value",

            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
            ErrorCode::ValidationInvalidJson => "validation.invalid_json",

            ErrorCode::TopologyDuplicateResource => "topology.duplicate_resource",
            ErrorCode::TopologyUnknownDependency => "topology.unknown_dependency",

            ErrorCode::PipelineEmpty => "pipeline.empty",
            ErrorCode::PipelineStageOrder => "pipeline.stage_order",
            ErrorCode::PipelineDuplicateArtifact => "pipeline.duplicate_artifact",
            ErrorCode::PipelineArtifactUnresolved => "pipeline.artifact_unresolved",

            ErrorCode::DeploymentTargetGroupConflict => "deployment.target_group_conflict",
            ErrorCode::DeploymentMissingListener => "deployment.missing_listener",

            ErrorCode::NamingInvalidName => "naming.invalid_name",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalYamlError => "internal.yaml_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecMissingKeyDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecInvalidFormatDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDetails {
    pub resource: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageOrderDetails {
    pub expected: Vec<String>,
    pub found: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDetails {
    pub artifact: String,
    pub stage: String,
    pub action: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetGroupConflictDetails {
    pub blue: String,
    pub green: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidNameDetails {
    pub field: String,
    pub name: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    fn with_details<T: Serialize>(code: ErrorCode, message: impl Into<String>, details: T) -> Self {
        let details = serde_json::to_value(details)
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(code, message, details)
    }

    pub fn spec_missing_key(key: impl Into<String>, path: Option<String>) -> Self {
        Self::with_details(
            ErrorCode::SpecMissingKey,
            "Missing required spec key",
            SpecMissingKeyDetails {
                key: key.into(),
                path,
            },
        )
    }

    pub fn spec_invalid_format(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self::with_details(
            ErrorCode::SpecInvalidFormat,
            "Topology spec could not be parsed",
            SpecInvalidFormatDetails {
                path: path.into(),
                error: error.into(),
            },
        )
    }

    pub fn spec_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        Self::with_details(
            ErrorCode::SpecInvalidValue,
            "Invalid spec value",
            SpecInvalidValueDetails {
                key: key.into(),
                value,
                problem: problem.into(),
            },
        )
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::with_details(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            MissingArgumentDetails { args },
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        Self::with_details(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            InvalidArgumentDetails {
                field: field.into(),
                problem: problem.into(),
                id,
                tried,
            },
        )
    }

    pub fn validation_invalid_json(err: serde_json::Error, context: Option<String>) -> Self {
        let details = serde_json::json!({
            "error": err.to_string(),
            "context": context,
        });

        Self::new(ErrorCode::ValidationInvalidJson, "Invalid JSON", details)
    }

    pub fn topology_duplicate_resource(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self::with_details(
            ErrorCode::TopologyDuplicateResource,
            format!("Resource '{}' is already declared", resource),
            ResourceDetails {
                resource,
                dependency: None,
            },
        )
    }

    pub fn topology_unknown_dependency(
        resource: impl Into<String>,
        dependency: impl Into<String>,
    ) -> Self {
        let resource = resource.into();
        let dependency = dependency.into();
        Self::with_details(
            ErrorCode::TopologyUnknownDependency,
            format!(
                "Resource '{}' depends on '{}', which has not been declared",
                resource, dependency
            ),
            ResourceDetails {
                resource,
                dependency: Some(dependency),
            },
        )
        .with_hint("Declare resources in dependency order; a reference must exist before it is used")
    }

    pub fn pipeline_empty(field: impl Into<String>) -> Self {
        Self::with_details(
            ErrorCode::PipelineEmpty,
            "Pipeline has no stages",
            serde_json::json!({ "field": field.into() }),
        )
    }

    pub fn pipeline_stage_order(expected: Vec<String>, found: Vec<String>) -> Self {
        Self::with_details(
            ErrorCode::PipelineStageOrder,
            format!(
                "Release pipeline stages must be [{}], found [{}]",
                expected.join(", "),
                found.join(", ")
            ),
            StageOrderDetails { expected, found },
        )
    }

    pub fn pipeline_duplicate_artifact(
        artifact: impl Into<String>,
        stage: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        let artifact = artifact.into();
        Self::with_details(
            ErrorCode::PipelineDuplicateArtifact,
            format!("Artifact '{}' is produced more than once", artifact),
            ArtifactDetails {
                artifact,
                stage: stage.into(),
                action: action.into(),
            },
        )
    }

    pub fn pipeline_artifact_unresolved(
        artifact: impl Into<String>,
        stage: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        let artifact = artifact.into();
        let stage = stage.into();
        Self::with_details(
            ErrorCode::PipelineArtifactUnresolved,
            format!(
                "Stage '{}' consumes artifact '{}', which no earlier stage produces",
                stage, artifact
            ),
            ArtifactDetails {
                artifact,
                stage,
                action: action.into(),
            },
        )
        .with_hint("An action input must be the output of a strictly earlier stage")
    }

    pub fn deployment_target_group_conflict(
        blue: impl Into<String>,
        green: impl Into<String>,
    ) -> Self {
        Self::with_details(
            ErrorCode::DeploymentTargetGroupConflict,
            "Blue and green target groups must be distinct resources",
            TargetGroupConflictDetails {
                blue: blue.into(),
                green: green.into(),
            },
        )
    }

    pub fn deployment_missing_listener(resource: impl Into<String>) -> Self {
        Self::with_details(
            ErrorCode::DeploymentMissingListener,
            "Deployment group requires the listener produced by the service",
            ResourceDetails {
                resource: resource.into(),
                dependency: None,
            },
        )
    }

    pub fn naming_invalid_name(
        field: impl Into<String>,
        name: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        Self::with_details(
            ErrorCode::NamingInvalidName,
            "Invalid resource name",
            InvalidNameDetails {
                field: field.into(),
                name: name.into(),
                problem: problem.into(),
            },
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        Self::with_details(
            ErrorCode::InternalIoError,
            "IO error",
            InternalErrorDetails {
                error: error.into(),
                context,
            },
        )
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::with_details(
            ErrorCode::InternalJsonError,
            "JSON error",
            InternalErrorDetails {
                error: error.into(),
                context,
            },
        )
    }

    pub fn internal_yaml(error: impl Into<String>, context: Option<String>) -> Self {
        Self::with_details(
            ErrorCode::InternalYamlError,
            "YAML error",
            InternalErrorDetails {
                error: error.into(),
                context,
            },
        )
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_dotted_families() {
        assert_eq!(ErrorCode::SpecMissingKey.as_str(), "spec.missing_key");
        assert_eq!(
            ErrorCode::PipelineArtifactUnresolved.as_str(),
            "pipeline.artifact_unresolved"
        );
        assert_eq!(
            ErrorCode::DeploymentTargetGroupConflict.as_str(),
            "deployment.target_group_conflict"
        );
    }

    #[test]
    fn unknown_dependency_carries_both_ids() {
        let err = Error::topology_unknown_dependency("Service", "Cluster");
        assert_eq!(err.code, ErrorCode::TopologyUnknownDependency);
        assert_eq!(err.details["resource"], "Service");
        assert_eq!(err.details["dependency"], "Cluster");
        assert!(!err.hints.is_empty());
    }

    #[test]
    fn with_hint_accumulates() {
        let err = Error::pipeline_empty("pipeline.stages")
            .with_hint("first")
            .with_hint("second");
        assert_eq!(err.hints.len(), 2);
    }
}
