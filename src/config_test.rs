use crate::common::TagScope;
use crate::config::*;
use crate::error::{DrRoonError, DrRoonExpectedError};
use crate::testing;
use std::path::Path;

#[test]
fn test_config_defaults() {
    let options = Options::default();
    assert!(!options.rename_folder);
    assert_eq!(options.scope, TagScope::Both);
    assert!(options.mark_processed);
    assert_eq!(options.report_filename, "foo_dr.txt");
    assert_eq!(options.processed_filename, "foo_dr_processed.txt");
}

#[test]
fn test_config_empty_file() {
    let options = Options::from_toml(Path::new("config.toml"), "").unwrap();
    assert_eq!(options, Options::default());
}

#[test]
fn test_config_full() {
    let temp_dir = testing::init();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
        rename_folder = true
        tags = "version-only"
        mark_processed = false
        report_filename = "dr.txt"
        processed_filename = "dr.done.txt"
        "#,
    )
    .unwrap();

    let options = Options::parse(Some(config_path.as_path())).unwrap();
    assert_eq!(
        options,
        Options {
            rename_folder: true,
            scope: TagScope::VersionOnly,
            mark_processed: false,
            report_filename: "dr.txt".to_string(),
            processed_filename: "dr.done.txt".to_string(),
        }
    );
}

#[test]
fn test_config_scope_names() {
    for (name, scope) in [
        ("both", TagScope::Both),
        ("version-only", TagScope::VersionOnly),
        ("roon-album-tag-only", TagScope::RoonAlbumTagOnly),
        ("none", TagScope::None),
    ] {
        let options = Options::from_toml(Path::new("config.toml"), &format!("tags = \"{name}\"")).unwrap();
        assert_eq!(options.scope, scope);
    }
}

#[test]
fn test_config_unknown_keys_are_ignored() {
    let options = Options::from_toml(Path::new("config.toml"), "rename_folder = true\nfrobnicate = 3\n").unwrap();
    assert!(options.rename_folder);
}

#[test]
fn test_config_missing_explicit_file() {
    let temp_dir = testing::init();
    let result = Options::parse(Some(temp_dir.path().join("nope.toml").as_path()));
    assert!(matches!(result, Err(DrRoonError::Expected(DrRoonExpectedError::ConfigNotFound { .. }))));
}

#[test]
fn test_config_decode_errors() {
    let path = Path::new("config.toml");
    assert!(matches!(
        Options::from_toml(path, "rename_folder = "),
        Err(DrRoonError::Expected(DrRoonExpectedError::ConfigDecode { .. }))
    ));
    assert!(matches!(
        Options::from_toml(path, "rename_folder = \"yes\""),
        Err(DrRoonError::Expected(DrRoonExpectedError::ConfigDecode { .. }))
    ));
    assert!(matches!(
        Options::from_toml(path, "tags = \"everything\""),
        Err(DrRoonError::Expected(DrRoonExpectedError::ConfigDecode { .. }))
    ));
}

#[test]
fn test_config_invalid_values() {
    let path = Path::new("config.toml");
    let key_of = |content: &str| match Options::from_toml(path, content) {
        Err(DrRoonError::Expected(DrRoonExpectedError::InvalidConfigValue { key, .. })) => key,
        other => panic!("expected InvalidConfigValue, got {other:?}"),
    };
    assert_eq!(key_of("report_filename = \"\""), "report_filename");
    assert_eq!(key_of("processed_filename = \"sub/dir.txt\""), "processed_filename");
    assert_eq!(key_of("processed_filename = \"foo_dr.txt\""), "processed_filename");
}
