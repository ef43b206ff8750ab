use super::*;

#[test]
fn default_config_monitors_league_of_legends() {
    // Arrange / Act
    let config = Config::default();

    // Assert
    assert_eq!(
        config.window_titles,
        vec!["League of Legends (TM) Client", "League of Legends"]
    );
    assert!(config.tray);
    assert!(!config.logging.enabled);
}

#[test]
fn partial_toml_uses_defaults_for_missing_fields() {
    // Arrange
    let toml_str = "window_titles = [\"Elden Ring\"]\n";

    // Act
    let config = parse(toml_str, Format::Toml).unwrap();

    // Assert
    assert_eq!(config.window_titles, vec!["Elden Ring"]);
    assert!(config.tray);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn legacy_json_config_is_accepted() {
    // Arrange
    let json = r#"{ "window_titles": ["Game One", "Game Two"] }"#;

    // Act
    let config = parse(json, Format::Json).unwrap();

    // Assert
    assert_eq!(config.window_titles, vec!["Game One", "Game Two"]);
    assert_eq!(config.logging, crate::log::LogConfig::default());
}

#[test]
fn wrongly_typed_titles_are_rejected() {
    // Act
    let result = parse(r#"{ "window_titles": "Game" }"#, Format::Json);

    // Assert
    assert!(result.is_err());
}

#[test]
fn format_follows_extension() {
    assert_eq!(Format::from_path(Path::new("a/b.json")), Format::Json);
    assert_eq!(Format::from_path(Path::new("a/b.JSON")), Format::Json);
    assert_eq!(Format::from_path(Path::new("a/b.toml")), Format::Toml);
    assert_eq!(Format::from_path(Path::new("config")), Format::Toml);
}

#[test]
fn command_line_titles_override_config() {
    // Arrange
    let config = Config::default();

    // Act
    let overridden = config
        .clone()
        .with_titles(vec!["Game".into(), "Game".into()]);
    let untouched = config.clone().with_titles(Vec::new());

    // Assert
    assert_eq!(overridden.window_titles, vec!["Game", "Game"]);
    assert_eq!(overridden.monitored_titles().len(), 1);
    assert_eq!(untouched, config);
}

#[test]
fn missing_explicit_file_falls_back_to_defaults() {
    // Arrange
    let path = std::env::temp_dir().join(format!(
        "blackbars-missing-{}.toml",
        std::process::id()
    ));

    // Act
    let config = load(Some(&path));

    // Assert
    assert_eq!(config, Config::default());
}

#[test]
fn explicit_json_file_is_loaded() {
    // Arrange
    let path = std::env::temp_dir().join(format!("blackbars-test-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "window_titles": ["Hades"], "tray": false }"#).unwrap();

    // Act
    let config = load(Some(&path));
    let _ = std::fs::remove_file(&path);

    // Assert
    assert_eq!(config.window_titles, vec!["Hades"]);
    assert!(!config.tray);
}

#[test]
fn config_roundtrips_through_toml() {
    // Arrange
    let config = Config::default();

    // Act
    let serialized = toml::to_string(&config).unwrap();
    let deserialized = parse(&serialized, Format::Toml).unwrap();

    // Assert
    assert_eq!(deserialized, config);
}

#[test]
fn config_template_matches_default_values() {
    // Arrange
    let toml_str = template::generate_config();

    // Act
    let config = parse(&toml_str, Format::Toml);

    // Assert
    assert_eq!(config, Ok(Config::default()));
}
