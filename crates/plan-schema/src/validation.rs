//! Plan validation utilities.

use crate::inclusion::InclusionEntry;
use crate::plan::InclusionPlan;
use crate::schema;
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Validation error type.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Schema validation failed: {0}")]
    SchemaError(String),

    #[error("Missing source: {0}")]
    MissingSource(String),

    #[error("Destination declared more than once: {0}")]
    DuplicateDestination(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result of plan validation.
#[derive(Debug)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// All error messages joined into one line.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a serialized plan against the JSON schema.
pub fn validate_plan_schema(plan: &Value) -> Result<ValidationResult, ValidationError> {
    let mut result = ValidationResult::new();

    let schema_value = schema::plan_schema();
    let compiled = JSONSchema::compile(&schema_value)
        .map_err(|e| ValidationError::SchemaError(e.to_string()))?;

    let validation = compiled.validate(plan);
    if let Err(errors) = validation {
        for error in errors {
            result.add_error(ValidationError::SchemaError(format!(
                "{} at {}",
                error, error.instance_path
            )));
        }
    }

    Ok(result)
}

/// Validate a complete plan: schema, unique destinations, and present sources.
///
/// Relative sources are resolved against the plan's project root.
pub fn validate_plan(plan: &InclusionPlan) -> Result<ValidationResult, ValidationError> {
    let plan_json = serde_json::to_value(plan)?;
    let mut result = validate_plan_schema(&plan_json)?;

    let mut destinations: HashSet<&str> = HashSet::new();
    let mut modules: HashSet<&str> = HashSet::new();

    for entry in &plan.entries {
        if let Some(dst) = entry.destination() {
            if !destinations.insert(dst) {
                result.add_error(ValidationError::DuplicateDestination(dst.to_string()));
            }
        }

        if let Some(name) = entry.module_name() {
            if !modules.insert(name) {
                result.add_warning(format!("module declared more than once: {}", name));
            }
        }

        if let Some(src) = entry.source() {
            let resolved = plan.project_root.join(src);
            let present = match entry {
                InclusionEntry::DataDir { .. } => resolved.is_dir(),
                _ => resolved.is_file(),
            };
            if !present {
                result.add_error(ValidationError::MissingSource(format!(
                    "{} ({})",
                    resolved.display(),
                    entry.kind()
                )));
            }
        }
    }

    let entry_script = plan.project_root.join(&plan.entry_script);
    if !entry_script.is_file() {
        result.add_error(ValidationError::MissingSource(format!(
            "{} (entry script)",
            entry_script.display()
        )));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::tests::sample_plan;
    use std::fs;

    fn plan_in(root: &std::path::Path) -> InclusionPlan {
        fs::create_dir_all(root.join("src/web/frontend")).unwrap();
        fs::write(root.join("src/photobooth_runner.py"), "").unwrap();
        let mut plan = sample_plan();
        plan.project_root = root.to_path_buf();
        plan
    }

    #[test]
    fn test_validate_plan_schema_minimal() {
        let plan = serde_json::json!({
            "schema_version": "1.0.0",
            "backend": "nuitka",
            "platform": "linux",
            "output_mode": "directory",
            "toolchain": null,
            "product_name": "photobooth",
            "entry_script": "src/photobooth_runner.py",
            "project_root": ".",
            "output_dir": "dist",
            "jobs": 4,
            "entries": [
                { "kind": "data_dir", "src": "src/web/frontend", "dst": "web/frontend" },
                { "kind": "import_module", "name": "photobooth.plugins.wled" }
            ],
            "warnings": []
        });

        let result = validate_plan_schema(&plan).unwrap();
        assert!(result.valid, "Errors: {:?}", result.errors);
    }

    #[test]
    fn test_validate_plan_schema_rejects_incomplete_entries() {
        let plan = serde_json::json!({
            "schema_version": "1.0.0",
            "backend": "nuitka",
            "platform": "linux",
            "output_mode": "directory",
            "toolchain": null,
            "product_name": "photobooth",
            "entry_script": "src/photobooth_runner.py",
            "project_root": ".",
            "output_dir": "dist",
            "jobs": 4,
            "entries": [
                { "kind": "data_dir", "src": "src/web/frontend" },
                { "kind": "import_module", "name": "not a module" }
            ],
            "warnings": []
        });

        let result = validate_plan_schema(&plan).unwrap();
        assert!(!result.valid);
        assert!(result.errors.len() >= 2, "Errors: {:?}", result.errors);
    }

    #[test]
    fn test_validate_plan_schema_missing_field() {
        let plan = serde_json::json!({
            "schema_version": "1.0.0"
        });

        let result = validate_plan_schema(&plan).unwrap();
        assert!(!result.valid);
    }

    #[test]
    fn test_validate_plan_ok() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(dir.path());

        let result = validate_plan(&plan).unwrap();
        assert!(result.valid, "Errors: {}", result.summary());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_plan_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = plan_in(dir.path());
        plan.entries.push(InclusionEntry::data_dir(
            "src/photobooth/database/alembic/versions",
            "photobooth/database/alembic/versions",
        ));

        let result = validate_plan(&plan).unwrap();
        assert!(!result.valid);
        assert!(result.summary().contains("versions"));
    }

    #[test]
    fn test_validate_plan_duplicate_destination() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = plan_in(dir.path());
        plan.entries
            .push(InclusionEntry::data_dir("src/web/frontend", "web/frontend"));
        plan.entries
            .push(InclusionEntry::import_module("photobooth.plugins.commander"));

        let result = validate_plan(&plan).unwrap();
        assert!(!result.valid);
        assert!(matches!(
            result.errors[0],
            ValidationError::DuplicateDestination(ref d) if d == "web/frontend"
        ));
        assert_eq!(result.warnings.len(), 1);
    }
}
