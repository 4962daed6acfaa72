//! Capability-inheritance resolution.
//!
//! Given a supertype and an ordered list of directly declared capabilities, this crate
//! walks the type hierarchy exposed by a [`cairn_types::TypeOracle`] and answers:
//!
//! - which operations are final, already implemented, or still missing
//!   ([`InheritanceContextBuilder`]);
//! - which constructors a subtype has to expose ([`ConstructorCollector`]);
//! - which declared capabilities are redundant ([`RedundancyDetector`]).
//!
//! Every traversal is synchronous, keeps a visited set (cycles and diamonds are
//! bounded, not errors) and iterates in a deterministic order.

mod builder;
mod constructors;
mod context;
mod redundancy;
mod walk;

pub use builder::InheritanceContextBuilder;
pub use constructors::{ConstructorCollector, ConstructorOutcome};
pub use context::{
    DuplicateConstructor, DuplicateOperation, InheritanceContext, Outputs, ResolutionAborted,
    ResolutionWarning,
};
pub use redundancy::{RedundancyDetector, RedundancyMode, RedundancyReport, RedundantCapability};
