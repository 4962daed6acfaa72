use cairn_check::Severity;
use cairn_config::{discover_config_path, CairnConfig, GenerateConfig, LoggingConfig};
use pretty_assertions::assert_eq;

#[test]
fn check_section_maps_onto_validator_options() {
    let (config, _) = CairnConfig::load_from_str_with_diagnostics(
        "[check]\nredundant_capability_severity = \"info\"\n",
    )
    .unwrap();

    let options = config.check.options();
    assert_eq!(options.redundant_capability_severity, Severity::Info);
    assert!(options.report_redundant_capabilities);
}

#[test]
fn empty_action_comment_disables_the_comment() {
    let generate = GenerateConfig {
        action_comment: "  ".to_string(),
        ..GenerateConfig::default()
    };
    assert_eq!(generate.options().action_comment, None);
}

#[test]
fn empty_indent_falls_back_to_a_tab() {
    let generate = GenerateConfig {
        indent: String::new(),
        ..GenerateConfig::default()
    };
    assert_eq!(generate.options().indent, "\t");
}

#[test]
fn default_generate_options_match_the_writer_defaults() {
    assert_eq!(
        GenerateConfig::default().options(),
        cairn_codegen::StubOptions::default()
    );
}

#[test]
fn logging_level_accepts_directives() {
    let logging = LoggingConfig {
        level: "cairn.inherit=trace,warn".to_string(),
        ..LoggingConfig::default()
    };
    // Merged with RUST_LOG when set; either way a filter is produced.
    let filter = logging.env_filter().to_string();
    assert!(filter.contains("cairn.inherit=trace"), "{filter}");
}

#[test]
fn discovers_cairn_toml_in_a_directory() {
    if std::env::var_os(cairn_config::CAIRN_CONFIG_ENV_VAR).is_some() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(discover_config_path(dir.path()), None);

    std::fs::write(dir.path().join(".cairn.toml"), "").unwrap();
    assert_eq!(
        discover_config_path(dir.path()),
        Some(dir.path().join(".cairn.toml"))
    );
}
