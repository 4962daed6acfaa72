//! Declaration checks built on the inheritance resolution of `cairn-inherit`.
//!
//! [`Validator::check`] inspects one type declaration against the types it extends
//! and returns [`Diagnostic`]s. Every diagnostic carries a stable code from
//! [`codes`] and a `data` payload that quick fixes can act on.

pub mod codes;
mod diagnostic;
mod validator;

pub use diagnostic::{has_errors, Diagnostic, Severity};
pub use validator::{check_type, CheckOptions, Validator};
