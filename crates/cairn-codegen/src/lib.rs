//! Source stubs for a new type declaration.
//!
//! The writer takes a populated [`cairn_inherit::InheritanceContext`] and renders
//! the declaration header, one constructor per supertype constructor and one action
//! stub per operation that still has to be implemented.

mod names;
mod stub;

pub use names::{default_value, ImportSet};
pub use stub::{generate, GeneratedType, StubOptions, StubWriter};
