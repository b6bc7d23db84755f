use clap::Parser;

use fieldmatch_cli::cli::{Cli, Command, LogFormatArg, OutputFormatArg};

#[test]
fn match_accepts_repeated_model_filters() {
    let cli = Cli::try_parse_from([
        "fieldmatch",
        "match",
        "--catalog",
        "catalog",
        "--profiles",
        "sheet.json",
        "--model",
        "res.partner",
        "--model",
        "sale.order",
        "--format",
        "json",
    ])
    .unwrap();
    let Command::Match(args) = cli.command else {
        panic!("expected match command");
    };
    assert_eq!(args.models, vec!["res.partner", "sale.order"]);
    assert_eq!(args.format, OutputFormatArg::Json);
    assert!(args.config.is_none());
    assert!(args.output.is_none());
}

#[test]
fn logging_flags_are_global() {
    let cli = Cli::try_parse_from([
        "fieldmatch",
        "inspect",
        "--catalog",
        "catalog",
        "--log-format",
        "json",
        "--log-file",
        "run.log",
    ])
    .unwrap();
    assert_eq!(cli.log_format, LogFormatArg::Json);
    assert!(cli.log_level.is_none());
    assert_eq!(
        cli.log_file.as_deref().and_then(|p| p.to_str()),
        Some("run.log")
    );
    assert!(matches!(cli.command, Command::Inspect(_)));
}

#[test]
fn match_requires_catalog_and_profiles() {
    assert!(Cli::try_parse_from(["fieldmatch", "match", "--profiles", "sheet.json"]).is_err());
    assert!(Cli::try_parse_from(["fieldmatch", "match", "--catalog", "catalog"]).is_err());
}

#[test]
fn recommend_defaults_to_table_output() {
    let cli = Cli::try_parse_from(["fieldmatch", "recommend", "--profiles", "sheet.json"]).unwrap();
    let Command::Recommend(args) = cli.command else {
        panic!("expected recommend command");
    };
    assert_eq!(args.format, OutputFormatArg::Table);
}
