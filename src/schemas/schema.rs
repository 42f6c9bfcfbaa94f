use jsonschema::{Draft, JSONSchema};
use schemars::schema::RootSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, OnceLock};

/// Cached JSON schema handle associated with a response type.
#[derive(Clone)]
pub struct SchemaHandle {
    schema_name: &'static str,
    schema_json: Arc<Value>,
    compiled: Arc<OnceLock<Result<JSONSchema, String>>>,
}

impl std::fmt::Debug for SchemaHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaHandle")
            .field("schema_name", &self.schema_name)
            .field("compiled", &self.compiled.get().is_some())
            .finish_non_exhaustive()
    }
}

impl SchemaHandle {
    pub fn from_root_schema(schema_name: &'static str, root: RootSchema) -> Self {
        let schema_json = serde_json::to_value(root).unwrap_or_else(|err| {
            panic!("failed to serialize schema for {}: {}", schema_name, err)
        });

        Self {
            schema_name,
            schema_json: Arc::new(schema_json),
            compiled: Arc::new(OnceLock::new()),
        }
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn schema_json(&self) -> &Value {
        self.schema_json.as_ref()
    }

    /// Draft 7 validator for this schema, compiled on first use and shared afterwards
    pub(crate) fn compiled(&self) -> Result<&JSONSchema, String> {
        self.compiled
            .get_or_init(|| {
                JSONSchema::options()
                    .with_draft(Draft::Draft7)
                    .compile(&self.schema_json)
                    .map_err(|err| {
                        format!(
                            "failed to prepare `{}` schema for validation: {}",
                            self.schema_name, err
                        )
                    })
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Names of the properties the root object must carry
    pub fn required_fields(&self) -> Vec<&str> {
        self.schema_json
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// A document shape the model is asked to produce and that replies are checked against.
pub trait CompletionSchema: DeserializeOwned + Send + Sync + 'static {
    fn schema() -> &'static SchemaHandle;
}
