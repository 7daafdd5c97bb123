//! JSON schema definition for plan validation.

/// JSON Schema for plan.json.
pub const PLAN_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Boothpack Inclusion Plan",
  "type": "object",
  "required": [
    "schema_version", "backend", "platform", "output_mode", "toolchain",
    "product_name", "entry_script", "project_root", "output_dir", "jobs",
    "entries", "warnings"
  ],
  "properties": {
    "schema_version": {
      "type": "string",
      "pattern": "^\\d+\\.\\d+\\.\\d+$"
    },
    "fingerprint": {
      "type": "string",
      "pattern": "^[0-9a-f]{64}$"
    },
    "backend": { "type": "string", "enum": ["nuitka", "pyinstaller"] },
    "platform": { "type": "string", "enum": ["windows", "darwin", "linux"] },
    "output_mode": { "type": "string", "enum": ["single_file", "directory"] },
    "toolchain": { "type": ["string", "null"], "enum": ["mingw64", null] },
    "product_name": { "type": "string", "minLength": 1 },
    "entry_script": { "type": "string", "minLength": 1 },
    "project_root": { "type": "string" },
    "output_dir": { "type": "string", "minLength": 1 },
    "jobs": { "type": "integer", "minimum": 1 },
    "entries": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["kind"],
        "properties": {
          "kind": {
            "type": "string",
            "enum": ["data_file", "data_dir", "binary", "import_module", "import_package"]
          },
          "src": { "type": "string", "minLength": 1 },
          "dst": { "type": "string", "minLength": 1 },
          "name": {
            "type": "string",
            "pattern": "^[A-Za-z_][A-Za-z0-9_]*(\\.[A-Za-z_][A-Za-z0-9_]*)*$"
          }
        },
        "if": {
          "properties": { "kind": { "enum": ["data_file", "data_dir", "binary"] } }
        },
        "then": { "required": ["src", "dst"] },
        "else": { "required": ["name"] }
      }
    },
    "warnings": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["component", "message"],
        "properties": {
          "component": { "type": "string" },
          "message": { "type": "string" }
        }
      }
    }
  }
}"#;

/// Get the plan schema as a JSON value.
pub fn plan_schema() -> serde_json::Value {
    serde_json::from_str(PLAN_SCHEMA).expect("Invalid plan schema")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_parses() {
        let schema = plan_schema();
        assert_eq!(schema["title"], "Boothpack Inclusion Plan");
    }
}
