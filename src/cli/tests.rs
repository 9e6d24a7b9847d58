use super::*;
use clap::CommandFactory;

#[test]
fn cli_definition_is_valid() {
    Args::command().debug_assert();
}

#[test]
fn defaults_to_chat() {
    let args = Args::try_parse_from(["physbot"]).unwrap();
    assert!(args.command.is_none());
    assert!(args.model.is_none());
}

#[test]
fn ask_collects_the_whole_question() {
    let args = Args::try_parse_from(["physbot", "ask", "apa", "itu", "gaya?"]).unwrap();
    match args.command {
        Some(Commands::Ask { question }) => {
            assert_eq!(question, vec!["apa", "itu", "gaya?"]);
        }
        _ => panic!("expected ask"),
    }
}

#[test]
fn global_flags_before_subcommand() {
    let args = Args::try_parse_from([
        "physbot",
        "--model",
        "gemini-1.5-pro",
        "--log",
        "chat.log",
        "chat",
    ])
    .unwrap();
    assert_eq!(args.model.as_deref(), Some("gemini-1.5-pro"));
    assert_eq!(args.log, Some(PathBuf::from("chat.log")));
    assert!(matches!(args.command, Some(Commands::Chat)));
}

#[test]
fn set_accepts_missing_key_and_value() {
    let args = Args::try_parse_from(["physbot", "set"]).unwrap();
    assert!(matches!(
        args.command,
        Some(Commands::Set {
            key: None,
            value: None
        })
    ));

    let args = Args::try_parse_from(["physbot", "set", "temperature", "0.2"]).unwrap();
    match args.command {
        Some(Commands::Set { key, value }) => {
            assert_eq!(key.as_deref(), Some("temperature"));
            assert_eq!(value, Some(vec!["0.2".to_string()]));
        }
        _ => panic!("expected set"),
    }
}

#[test]
fn ask_requires_a_question() {
    assert!(Args::try_parse_from(["physbot", "ask"]).is_err());
}

#[test]
fn model_override_replaces_configured_model() {
    let config = Config {
        model: Some("gemini-1.5-flash".to_string()),
        ..Config::default()
    };
    let client = model_client(&config, Some(" gemini-1.5-pro ".to_string()), "key").unwrap();
    assert_eq!(client.settings().model, "gemini-1.5-pro");

    let client = model_client(&config, Some("  ".to_string()), "key").unwrap();
    assert_eq!(client.settings().model, "gemini-1.5-flash");
}
