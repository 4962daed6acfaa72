//! Structural type descriptors and the [`TypeOracle`] boundary.
//!
//! Cairn never parses source text. Hosts implement [`TypeOracle`] on top of whatever
//! index they have; tests and the CLI use the in-memory [`TypeStore`], which can be
//! loaded from a TOML or JSON type model.

mod descriptor;
mod oracle;
mod store;

pub use descriptor::{
    ConstructorDescriptor, FieldDescriptor, OperationDescriptor, TypeDescriptor, TypeKind,
};
pub use oracle::{OracleError, TypeOracle};
pub use store::{ModelError, TypeModel, TypeStore};
