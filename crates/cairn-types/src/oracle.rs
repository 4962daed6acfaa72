use std::sync::Arc;

use thiserror::Error;

use crate::TypeDescriptor;

/// Host failure while resolving a type name.
///
/// An unknown name is *not* an error: oracles return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("I/O failure while resolving `{name}`: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("type index unavailable while resolving `{name}`: {message}")]
    Unavailable { name: String, message: String },
}

/// Resolves fully-qualified type names to structural descriptors.
///
/// Implementations must be side-effect free from the engine's point of view and
/// safe for concurrent reads; each resolution request builds its own context on top
/// of a shared oracle.
pub trait TypeOracle {
    fn resolve(&self, name: &str) -> Result<Option<Arc<TypeDescriptor>>, OracleError>;
}

impl<T: TypeOracle + ?Sized> TypeOracle for &T {
    fn resolve(&self, name: &str) -> Result<Option<Arc<TypeDescriptor>>, OracleError> {
        (**self).resolve(name)
    }
}

impl<T: TypeOracle + ?Sized> TypeOracle for Arc<T> {
    fn resolve(&self, name: &str) -> Result<Option<Arc<TypeDescriptor>>, OracleError> {
        (**self).resolve(name)
    }
}
