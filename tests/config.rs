mod common;

use std::fs;

use common::scratch;
use fieldkeeper::{Field, FieldKeeper, KeeperConfig, KeeperError};

#[test]
fn defaults() {
    let config = KeeperConfig::default();
    assert_eq!(config.indent, 4);
    assert!(config.declaration);
    assert!(!config.create_parent_dirs);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let (dir, _) = scratch("unused.xml");
    let file = dir.path().join("keeper.toml");
    fs::write(&file, "indent = 1\n").unwrap();
    let config = KeeperConfig::from_file(&file).unwrap();
    assert_eq!(config, KeeperConfig { indent: 1, ..KeeperConfig::default() });
}

#[test]
fn config_drives_the_written_file() {
    let (dir, path) = scratch("settings.xml");
    let file = dir.path().join("keeper.json");
    fs::write(&file, r#"{ "indent": 0, "declaration": false }"#).unwrap();
    let config = KeeperConfig::from_file(&file).unwrap();

    let pair = Field::new((1, 2));
    let mut keeper = FieldKeeper::with_config(Some(path.clone()), config).unwrap();
    keeper.keep("pair", &pair, false).unwrap();
    keeper.save().unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "<Settings>\n<pair>\n<_0>1</_0>\n<_1>2</_1>\n</pair>\n</Settings>\n"
    );
}

#[test]
fn missing_config_file_is_a_config_error() {
    let (dir, _) = scratch("unused.xml");
    let result = KeeperConfig::from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(KeeperError::Config(_))));
}
