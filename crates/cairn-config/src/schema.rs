use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::CairnConfig;

/// JSON schema for `cairn.toml`, for editor integration and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    let mut schema = schema_for!(CairnConfig);
    if let Some(metadata) = schema.schema.metadata.as_mut() {
        metadata.title = Some("cairn.toml".to_owned());
    }
    schema
}
