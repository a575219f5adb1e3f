//! Tests for CLI parsing and query evaluation against the canonical lineage

use std::path::Path;

use clap::Parser;
use rstest::{fixture, rstest};

use vampire_lineage::cli::commands::evaluate;
use vampire_lineage::cli::{Cli, CliError};
use vampire_lineage::config::Settings;
use vampire_lineage::domain::{Lineage, LineageBuilder};
use vampire_lineage::exitcode;

#[fixture]
fn lineage() -> Lineage {
    LineageBuilder::from_path(Path::new("tests/resources/lineages/canonical.toml")).unwrap()
}

fn run(args: &[&str], lineage: &Lineage, settings: &Settings) -> Result<String, CliError> {
    let mut argv = vec!["vampire-lineage"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("valid arguments");
    evaluate(&cli.command, lineage, settings)
}

#[rstest]
#[case(&["depth", "andrew"], "3")]
#[case(&["depth", "original"], "0")]
#[case(&["senior", "ansel", "andrew"], "true")]
#[case(&["senior", "bart", "ansel"], "false")]
#[case(&["find", "sarah"], "sarah (1990)")]
#[case(&["find", "dracula"], "dracula: not found")]
#[case(&["descendants", "ansel"], "3")]
#[case(&["offspring", "original"], "2")]
#[case(&["ancestor", "original", "andrew"], "true")]
#[case(&["ancestor", "sarah", "andrew"], "false")]
#[case(&["common-ancestor", "andrew", "sarah"], "ansel")]
#[case(&["common-ancestor", "bart", "andrew"], "original")]
fn given_query_when_evaluating_then_prints_answer(
    lineage: Lineage,
    #[case] args: &[&str],
    #[case] expected: &str,
) {
    let answer = run(args, &lineage, &Settings::default()).unwrap();
    assert_eq!(answer, expected);
}

#[rstest]
fn given_no_year_when_converted_after_then_uses_settings_year(lineage: Lineage) {
    let settings = Settings {
        millennial_year: 1986,
        ..Settings::default()
    };

    let answer = run(&["converted-after"], &lineage, &settings).unwrap();

    assert_eq!(answer, "andrew (2001)\nsarah (1990)");
}

#[rstest]
fn given_year_and_root_when_converted_after_then_filters_subtree(lineage: Lineage) {
    let answer = run(
        &["converted-after", "elgort", "--year", "1980"],
        &lineage,
        &Settings::default(),
    )
    .unwrap();

    assert_eq!(answer, "elgort (1985)\nandrew (2001)");
}

#[rstest]
fn given_tree_command_when_evaluating_then_renders_lineage(lineage: Lineage) {
    let answer = run(&["tree"], &lineage, &Settings::default()).unwrap();

    assert!(answer.starts_with("original (1200)"));
    assert_eq!(answer.lines().count(), 6);
}

#[rstest]
fn given_unknown_name_when_evaluating_then_usage_exit_code(lineage: Lineage) {
    let err = run(&["depth", "dracula"], &lineage, &Settings::default()).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_global_flags_when_parsing_then_accepts_after_subcommand() {
    let cli = Cli::try_parse_from(["vampire-lineage", "tree", "-d", "-d", "--file", "coven.toml"])
        .unwrap();

    assert_eq!(cli.debug, 2);
    assert_eq!(cli.file.as_deref(), Some(Path::new("coven.toml")));
}
