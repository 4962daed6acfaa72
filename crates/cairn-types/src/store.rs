use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{OracleError, TypeDescriptor, TypeOracle};

/// On-disk type model: a list of type descriptors.
///
/// ```toml
/// [[types]]
/// name = "com.example.Base"
/// constructors = [{ parameters = [{ name = "x", type = "int" }] }]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeModel {
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read type model {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml type model: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse json type model: {0}")]
    Json(#[from] serde_json::Error),
    #[error("type `{0}` is declared more than once")]
    DuplicateType(String),
}

/// In-memory [`TypeOracle`] keyed by fully-qualified name.
#[derive(Clone, Debug, Default)]
pub struct TypeStore {
    types: BTreeMap<String, Arc<TypeDescriptor>>,
}

impl TypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a type. Returns the previous descriptor with that name.
    pub fn insert(&mut self, mut ty: TypeDescriptor) -> Option<Arc<TypeDescriptor>> {
        ty.normalize();
        self.types.insert(ty.name.clone(), Arc::new(ty))
    }

    #[must_use]
    pub fn with(mut self, ty: TypeDescriptor) -> Self {
        self.insert(ty);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn from_model(model: TypeModel) -> Result<Self, ModelError> {
        let mut store = Self::new();
        for ty in model.types {
            let name = ty.name.clone();
            if store.insert(ty).is_some() {
                return Err(ModelError::DuplicateType(name));
            }
        }
        tracing::debug!(target: "cairn.types", types = store.len(), "loaded type model");
        Ok(store)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ModelError> {
        Self::from_model(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ModelError> {
        Self::from_model(serde_json::from_str(text)?)
    }

    /// Load a model file; `.json` files are read as JSON, everything else as TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }
}

impl TypeOracle for TypeStore {
    fn resolve(&self, name: &str) -> Result<Option<Arc<TypeDescriptor>>, OracleError> {
        Ok(self.types.get(name).cloned())
    }
}
