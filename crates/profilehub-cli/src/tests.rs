use super::*;

#[test]
fn parses_accounts_command_with_token_flag() {
    let cli = Cli::try_parse_from(["profilehub-cli", "--token", "t", "accounts"])
        .expect("expected valid cli args");

    assert_eq!(cli.token, "t");
    assert!(matches!(cli.command, Commands::Accounts));
}

#[test]
fn parses_locations_with_account_id() {
    let cli = Cli::try_parse_from([
        "profilehub-cli",
        "--token",
        "t",
        "locations",
        "--account-id",
        "accounts/42",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Locations {
            account_id: Some(ref id)
        } if id == "accounts/42"
    ));
}

#[test]
fn aggregate_hints_default_to_none() {
    let cli = Cli::try_parse_from(["profilehub-cli", "--token", "t", "aggregate"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Aggregate {
            account_id: None,
            location_id: None
        }
    ));
}

#[test]
fn aggregate_accepts_both_hints() {
    let cli = Cli::try_parse_from([
        "profilehub-cli",
        "--token",
        "t",
        "aggregate",
        "--account-id",
        "accounts/42",
        "--location-id",
        "99",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Aggregate {
            account_id,
            location_id,
        } => {
            assert_eq!(account_id.as_deref(), Some("accounts/42"));
            assert_eq!(location_id.as_deref(), Some("99"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn search_takes_positional_query() {
    let cli = Cli::try_parse_from(["profilehub-cli", "--token", "t", "search", "Cafe X"])
        .expect("expected valid cli args");

    assert!(matches!(cli.command, Commands::Search { ref query } if query == "Cafe X"));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["profilehub-cli", "--token", "t"]).is_err());
}
