//! Action signatures: parameter lists, prototypes and their expansion.
//!
//! A declared operation may be callable with several arities when its trailing
//! parameters carry default values. [`expand`] turns one declaration into the set of
//! [`ActionPrototype`]s it actually provides; those prototypes are the identity keys
//! used everywhere else in Cairn to decide whether two declarations denote the same
//! callable member.

mod expand;
mod signature;

pub use expand::{
    expand, find_signature_conflicts, is_override_of, FormalParameter, SignatureConflict,
    SignatureError, SignatureSource,
};
pub use signature::{ActionParameterTypes, ActionPrototype, ParameterSignature};
