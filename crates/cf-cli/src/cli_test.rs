use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    Cli::command().debug_assert();
}

#[test]
fn test_daily_defaults() {
    let cli = Cli::try_parse_from(["cf", "daily"]).unwrap();
    assert!(!cli.global.verbose);
    assert!(cli.global.env_file.is_none());
    match cli.command {
        Commands::Daily(args) => assert!(!args.json),
        other => panic!("expected daily, got {:?}", other),
    }
}

#[test]
fn test_weekly_json_with_global_flags_after_subcommand() {
    let cli =
        Cli::try_parse_from(["cf", "weekly", "--json", "-v", "--env-file", "prod.env"]).unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.env_file, Some(PathBuf::from("prod.env")));
    match cli.command {
        Commands::Weekly(args) => assert!(args.json),
        other => panic!("expected weekly, got {:?}", other),
    }
}

#[test]
fn test_missing_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["cf"]).is_err());
    assert!(Cli::try_parse_from(["cf", "monthly"]).is_err());
}

#[cfg(feature = "serve")]
#[test]
fn test_serve_default_addr() {
    let cli = Cli::try_parse_from(["cf", "serve"]).unwrap();
    match cli.command {
        Commands::Serve(args) => assert_eq!(args.addr, "0.0.0.0:8080"),
        other => panic!("expected serve, got {:?}", other),
    }

    let cli = Cli::try_parse_from(["cf", "serve", "--addr", "127.0.0.1:9000"]).unwrap();
    match cli.command {
        Commands::Serve(args) => assert_eq!(args.addr, "127.0.0.1:9000"),
        other => panic!("expected serve, got {:?}", other),
    }
}
