//! Stable issue codes.

pub const MISSING_METHOD_IMPLEMENTATION: &str = "cairn.missing_method_implementation";
pub const OVERRIDDEN_FINAL_OPERATION: &str = "cairn.overridden_final_operation";
pub const OVERRIDDEN_FINAL_TYPE: &str = "cairn.overridden_final_type";
pub const REDUNDANT_INTERFACE_IMPLEMENTATION: &str = "cairn.redundant_interface_implementation";
pub const DUPLICATE_METHOD: &str = "cairn.duplicate_method";
pub const DUPLICATE_FIELD: &str = "cairn.duplicate_field";
pub const DUPLICATE_CONSTRUCTOR: &str = "cairn.duplicate_constructor";
pub const INVALID_USE_OF_VAR_ARG: &str = "cairn.invalid_use_of_var_arg";
pub const INVALID_DEFAULT_PLACEMENT: &str = "cairn.invalid_default_placement";
pub const UNRESOLVED_TYPE: &str = "cairn.unresolved_type";
pub const MISSING_CONSTRUCTOR: &str = "cairn.missing_constructor";

/// Code for a malformed parameter list.
pub fn for_signature_error(error: &cairn_signature::SignatureError) -> &'static str {
    if error.is_variadic_misuse() {
        INVALID_USE_OF_VAR_ARG
    } else {
        INVALID_DEFAULT_PLACEMENT
    }
}
