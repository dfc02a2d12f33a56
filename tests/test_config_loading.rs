//! Configuration loading and validation tests
//!
//! Tests focus on the observable outcome of loading a file: parsed values,
//! defaults, and the error returned for each kind of bad input.

use name_steal_skill::config::{ConfigError, SkillConfig};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{content}").unwrap();
    temp_file
}

#[test]
fn test_config_loads_successfully_from_valid_toml() {
    let temp_file = write_config(
        r#"
[skill]
application_id = "amzn1.ask.skill.0f3c9a7e-11aa-4b2c-9d3e-55aa66bb77cc"

[server]
host = "127.0.0.1"
port = 3000
path = "skill"
verify_timestamp = false
timestamp_tolerance_secs = 60

[phonetic]
endpoint = "https://labs.goo.ne.jp/api/hiragana"
app_id_env = "SKILL_TEST_GOO_APP_ID"
output_type = "katakana"
timeout_ms = 1500
"#,
    );

    let config = SkillConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(
        config.skill.application_id.as_deref(),
        Some("amzn1.ask.skill.0f3c9a7e-11aa-4b2c-9d3e-55aa66bb77cc")
    );
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.path, "skill");
    assert!(!config.server.verify_timestamp);
    assert_eq!(config.server.timestamp_tolerance_secs, 60);

    let phonetic = config.phonetic.unwrap();
    assert_eq!(phonetic.app_id_env, "SKILL_TEST_GOO_APP_ID");
    assert_eq!(phonetic.output_type, "katakana");
    assert_eq!(phonetic.timeout_ms, 1500);
}

#[test]
fn test_empty_file_yields_defaults() {
    let temp_file = write_config("");
    let config = SkillConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config, SkillConfig::default());
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.path, "alexa");
    assert!(config.phonetic.is_none());
}

#[test]
fn test_empty_phonetic_section_uses_goo_defaults() {
    let temp_file = write_config("[phonetic]\n");
    let config = SkillConfig::load_from_file(temp_file.path()).unwrap();

    let phonetic = config.phonetic.unwrap();
    assert_eq!(phonetic.endpoint, "https://labs.goo.ne.jp/api/hiragana");
    assert_eq!(phonetic.app_id_env, "GOO_APP_ID");
    assert_eq!(phonetic.output_type, "hiragana");
    assert_eq!(phonetic.timeout_ms, 3000);
}

#[test]
fn test_missing_file_is_read_error() {
    let result = SkillConfig::load_from_file(std::path::Path::new("/nonexistent/skill.toml"));
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let temp_file = write_config("[server\nport = 80");
    let result = SkillConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_wrong_type_is_parse_error() {
    let temp_file = write_config("[server]\nport = \"eighty\"\n");
    let result = SkillConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_invalid_application_id_rejected() {
    let temp_file = write_config("[skill]\napplication_id = \"amzn1 ask skill\"\n");
    let result = SkillConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::InvalidApplicationId(_))));
}

#[test]
fn test_invalid_server_settings_rejected() {
    for content in [
        "[server]\npath = \"\"\n",
        "[server]\npath = \"a/b\"\n",
        "[server]\nhost = \"localhost\"\n",
    ] {
        let temp_file = write_config(content);
        let result = SkillConfig::load_from_file(temp_file.path());
        assert!(
            matches!(result, Err(ConfigError::InvalidConfig(_))),
            "{content}"
        );
    }
}

#[test]
fn test_invalid_phonetic_settings_rejected() {
    for content in [
        "[phonetic]\nendpoint = \"not a url\"\n",
        "[phonetic]\nendpoint = \"ftp://labs.goo.ne.jp/api\"\n",
        "[phonetic]\noutput_type = \"romaji\"\n",
        "[phonetic]\ntimeout_ms = 0\n",
    ] {
        let temp_file = write_config(content);
        let result = SkillConfig::load_from_file(temp_file.path());
        assert!(
            matches!(result, Err(ConfigError::InvalidConfig(_))),
            "{content}"
        );
    }
}

#[test]
fn test_phonetic_app_id_read_from_environment() {
    let config =
        SkillConfig::from_toml_str("[phonetic]\napp_id_env = \"SKILL_TEST_APP_ID_PRESENT\"\n")
            .unwrap();

    std::env::set_var("SKILL_TEST_APP_ID_PRESENT", "secret-id");
    assert_eq!(
        config.get_phonetic_app_id().unwrap().as_deref(),
        Some("secret-id")
    );
    std::env::remove_var("SKILL_TEST_APP_ID_PRESENT");
}

#[test]
fn test_missing_phonetic_app_id_env_is_error() {
    let config =
        SkillConfig::from_toml_str("[phonetic]\napp_id_env = \"SKILL_TEST_APP_ID_ABSENT\"\n")
            .unwrap();

    assert!(matches!(
        config.get_phonetic_app_id(),
        Err(ConfigError::EnvVarNotFound(name)) if name == "SKILL_TEST_APP_ID_ABSENT"
    ));
}

#[test]
fn test_no_phonetic_section_needs_no_app_id() {
    let config = SkillConfig::default();
    assert_eq!(config.get_phonetic_app_id().unwrap(), None);
}

#[test]
fn test_config_round_trips_through_toml() {
    let config = SkillConfig::from_toml_str(
        "[skill]\napplication_id = \"amzn1.ask.skill.abc\"\n[phonetic]\n",
    )
    .unwrap();

    let serialized = toml::to_string_pretty(&config).unwrap();
    assert_eq!(SkillConfig::from_toml_str(&serialized).unwrap(), config);
}
