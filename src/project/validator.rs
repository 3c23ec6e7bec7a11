//! Project descriptor validation.
//!
//! # Responsibilities
//! - Turn raw JSON values into typed `ProjectDescriptor`s
//! - Reject malformed descriptors with a typed reason
//! - Filter a batch down to the valid projects, reporting each rejection
//!
//! # Rules
//! Checked in order, stopping at the first failure:
//! 1. the descriptor is an object
//! 2. `name`, `domain`, `port` are present
//! 3. `port` is an integer in 1..=65535
//! 4. `name`, `domain` and `subdomain` (if present) are strings
//! 5. `name` is a safe filename

use serde_json::{Map, Value};

use crate::project::descriptor::{is_safe_name, ProjectDescriptor};

const REQUIRED_KEYS: [&str; 3] = ["name", "domain", "port"];

/// Why a descriptor was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectError {
    #[error("project must be an object, got {0}")]
    MalformedProject(String),

    #[error("missing required key '{0}'")]
    MissingField(&'static str),

    #[error("invalid port '{0}': must be an integer between 1 and 65535")]
    InvalidPort(String),

    #[error("field '{0}' must be a string")]
    InvalidFieldType(&'static str),

    #[error("invalid name '{0}': must be a plain filename")]
    InvalidName(String),
}

/// A descriptor rejected during batch filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    /// Position in the input list.
    pub index: usize,
    /// Name, when one could be read.
    pub name: Option<String>,
    pub error: ProjectError,
}

/// Valid projects plus the rejections from one input list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectBatch {
    pub valid: Vec<ProjectDescriptor>,
    pub rejected: Vec<Rejected>,
}

impl ProjectBatch {
    /// Batch with no rejections.
    pub fn from_valid(valid: Vec<ProjectDescriptor>) -> Self {
        Self {
            valid,
            rejected: Vec::new(),
        }
    }
}

/// Validate one raw descriptor.
pub fn validate(raw: &Value) -> Result<ProjectDescriptor, ProjectError> {
    let map = raw
        .as_object()
        .ok_or_else(|| ProjectError::MalformedProject(describe(raw)))?;

    for key in REQUIRED_KEYS {
        if !map.contains_key(key) {
            return Err(ProjectError::MissingField(key));
        }
    }

    let port = parse_port(&map["port"])?;
    let name = string_field(map, "name")?;
    let domain = string_field(map, "domain")?;
    let subdomain = match map.get("subdomain") {
        Some(_) => Some(string_field(map, "subdomain")?),
        None => None,
    };

    if !is_safe_name(&name) {
        return Err(ProjectError::InvalidName(name));
    }

    Ok(ProjectDescriptor {
        name,
        domain,
        subdomain,
        port,
    })
}

/// Validate a descriptor, logging the reason on failure.
pub fn is_valid(raw: &Value) -> bool {
    match validate(raw) {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(project = %raw, error = %e, "Invalid project");
            false
        }
    }
}

/// Split a batch into valid projects and rejections, preserving input order.
pub fn filter_valid(raw: &[Value]) -> ProjectBatch {
    let mut valid = Vec::with_capacity(raw.len());
    let mut rejected = Vec::new();

    for (index, value) in raw.iter().enumerate() {
        match validate(value) {
            Ok(project) => valid.push(project),
            Err(error) => {
                tracing::error!(
                    index,
                    project = %value,
                    error = %error,
                    "Skipping invalid project"
                );
                rejected.push(Rejected {
                    index,
                    name: value.get("name").and_then(Value::as_str).map(str::to_owned),
                    error,
                });
            }
        }
    }

    ProjectBatch { valid, rejected }
}

fn parse_port(value: &Value) -> Result<u16, ProjectError> {
    value
        .as_u64()
        .filter(|port| (1..=65535).contains(port))
        .and_then(|port| u16::try_from(port).ok())
        .ok_or_else(|| ProjectError::InvalidPort(value.to_string()))
}

fn string_field(map: &Map<String, Value>, key: &'static str) -> Result<String, ProjectError> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(ProjectError::InvalidFieldType(key))
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(_) => "a boolean".into(),
        Value::Number(_) => "a number".into(),
        Value::String(_) => "a string".into(),
        Value::Array(_) => "a list".into(),
        Value::Object(_) => "an object".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_root_domain_project() {
        let project = validate(&json!({"name": "a", "domain": "a.com", "port": 8080})).unwrap();
        assert_eq!(project.name, "a");
        assert_eq!(project.domain, "a.com");
        assert_eq!(project.subdomain, None);
        assert_eq!(project.port, 8080);
    }

    #[test]
    fn test_subdomain_is_carried() {
        let project = validate(&json!({
            "name": "api", "domain": "a.com", "subdomain": "api", "port": 9000
        }))
        .unwrap();
        assert_eq!(project.subdomain.as_deref(), Some("api"));
    }

    #[test]
    fn test_non_object_is_malformed() {
        assert_eq!(
            validate(&json!(["a", "a.com", 80])),
            Err(ProjectError::MalformedProject("a list".into()))
        );
        assert!(matches!(validate(&json!("a")), Err(ProjectError::MalformedProject(_))));
    }

    #[test]
    fn test_missing_keys_in_order() {
        assert_eq!(validate(&json!({})), Err(ProjectError::MissingField("name")));
        assert_eq!(
            validate(&json!({"name": "a", "port": 80})),
            Err(ProjectError::MissingField("domain"))
        );
        assert_eq!(
            validate(&json!({"name": "a", "domain": "a.com"})),
            Err(ProjectError::MissingField("port"))
        );
    }

    #[test]
    fn test_port_bounds_and_type() {
        let ports = [
            json!(0),
            json!(65536),
            json!(99999),
            json!(-1),
            json!(80.5),
            json!("80"),
            json!(true),
        ];
        for port in ports {
            let raw = json!({"name": "a", "domain": "a.com", "port": port});
            assert!(
                matches!(validate(&raw), Err(ProjectError::InvalidPort(_))),
                "port {port} should be rejected"
            );
        }
        for port in [1, 65535] {
            assert!(validate(&json!({"name": "a", "domain": "a.com", "port": port})).is_ok());
        }
    }

    #[test]
    fn test_port_checked_before_field_types() {
        let raw = json!({"name": 5, "domain": "a.com", "port": 0});
        assert!(matches!(validate(&raw), Err(ProjectError::InvalidPort(_))));
    }

    #[test]
    fn test_field_types_and_names() {
        assert_eq!(
            validate(&json!({"name": 5, "domain": "a.com", "port": 80})),
            Err(ProjectError::InvalidFieldType("name"))
        );
        assert_eq!(
            validate(&json!({"name": "a", "domain": "a.com", "subdomain": null, "port": 80})),
            Err(ProjectError::InvalidFieldType("subdomain"))
        );
        assert_eq!(
            validate(&json!({"name": "../x", "domain": "a.com", "port": 80})),
            Err(ProjectError::InvalidName("../x".into()))
        );
    }

    #[test]
    fn test_filter_valid_keeps_order_and_reports() {
        let raw = vec![
            json!({"name": "b", "domain": "b.com", "port": 81}),
            json!({"name": "bad", "domain": "x.com", "port": 99999}),
            json!(42),
            json!({"name": "a", "domain": "a.com", "port": 80}),
        ];
        let ProjectBatch { valid, rejected } = filter_valid(&raw);

        let names: Vec<_> = valid.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].index, 1);
        assert_eq!(rejected[0].name.as_deref(), Some("bad"));
        assert_eq!(rejected[1].index, 2);
        assert_eq!(rejected[1].name, None);
        assert!(!is_valid(&raw[2]));
        assert!(is_valid(&raw[0]));
    }
}
