//! Tests for LineageBuilder using the lineage fixtures

use std::path::{Path, PathBuf};

use rstest::rstest;
use tempfile::TempDir;

use vampire_lineage::domain::{DomainError, LineageBuilder, VampireRecord};

fn resource(name: &str) -> PathBuf {
    Path::new("tests/resources/lineages").join(name)
}

// ============================================================
// Lineage files
// ============================================================

#[test]
fn given_canonical_file_when_building_then_single_rooted_lineage() {
    let lineage = LineageBuilder::from_path(&resource("canonical.toml")).unwrap();

    assert_eq!(lineage.name_of(lineage.root()), "original");
    assert_eq!(lineage.tree().len(), 6);
    assert_eq!(
        lineage
            .tree()
            .total_descendant_count(lineage.root())
            .unwrap(),
        5
    );
}

#[test]
fn given_canonical_file_when_building_then_children_follow_file_order() {
    let lineage = LineageBuilder::from_path(&resource("canonical.toml")).unwrap();
    let tree = lineage.tree();

    let root = tree.get(lineage.root()).unwrap();
    let children: Vec<&str> = root
        .children()
        .iter()
        .map(|&idx| lineage.name_of(idx))
        .collect();
    assert_eq!(children, vec!["bart", "ansel"]);

    let andrew = lineage.require("andrew").unwrap();
    assert_eq!(tree.depth_from_root(andrew).unwrap(), 3);
    assert_eq!(tree.node(andrew).unwrap().year_converted(), 2001);
}

#[rstest]
#[case("cycle.toml")]
#[case("multiple_roots.toml")]
#[case("unknown_sire.toml")]
#[case("duplicate_name.toml")]
#[case("malformed.toml")]
fn given_invalid_file_when_building_then_errors(#[case] file: &str) {
    let result = LineageBuilder::from_path(&resource(file));
    assert!(result.is_err(), "{file} should not build");
}

#[test]
fn given_cycle_file_when_building_then_reports_cycle() {
    let err = LineageBuilder::from_path(&resource("cycle.toml")).unwrap_err();
    assert!(matches!(err, DomainError::CycleDetected { .. }), "{err}");
}

#[test]
fn given_two_originals_when_building_then_names_both_roots() {
    let err = LineageBuilder::from_path(&resource("multiple_roots.toml")).unwrap_err();
    match err {
        DomainError::MultipleRoots { roots } => assert_eq!(roots, vec!["original", "dracula"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn given_unknown_sire_when_building_then_names_missing_sire() {
    let err = LineageBuilder::from_path(&resource("unknown_sire.toml")).unwrap_err();
    assert_eq!(err.to_string(), "unknown vampire: nosferatu");
}

#[test]
fn given_malformed_file_when_building_then_parse_error_names_file() {
    let err = LineageBuilder::from_path(&resource("malformed.toml")).unwrap_err();
    assert!(matches!(err, DomainError::LineageParse { .. }));
    assert!(err.to_string().contains("malformed.toml"));
}

#[test]
fn given_nonexistent_file_when_building_then_read_error() {
    let result = LineageBuilder::from_path(Path::new("/nonexistent/lineage.toml"));
    assert!(matches!(result, Err(DomainError::LineageRead { .. })));
}

#[test]
fn given_file_in_temp_dir_when_building_then_loads() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("coven.toml");
    std::fs::write(
        &path,
        "[[vampire]]\nname = \"lilith\"\nyear_converted = 1\n\n[[vampire]]\nname = \"cain\"\nyear_converted = 2\nsire = \"lilith\"\n",
    )
    .expect("write lineage file");

    let lineage = LineageBuilder::from_path(&path).unwrap();
    assert_eq!(lineage.find("cain").unwrap().map(|idx| lineage.name_of(idx)), Some("cain"));
}

// ============================================================
// Builder API
// ============================================================

#[test]
fn given_empty_builder_when_building_then_empty_lineage() {
    let result = LineageBuilder::new().build();
    assert!(matches!(result, Err(DomainError::EmptyLineage)));
}

#[test]
fn given_duplicate_name_when_adding_then_rejects() {
    let mut builder = LineageBuilder::new();
    builder.vampire("original", 1200).unwrap();
    let result = builder.vampire("original", 1300);
    assert!(matches!(result, Err(DomainError::DuplicateName(name)) if name == "original"));
}

#[test]
fn given_records_with_sire_listed_later_when_building_then_resolves() {
    let records = vec![
        VampireRecord {
            name: "bart".into(),
            year_converted: 1600,
            sire: Some("original".into()),
        },
        VampireRecord {
            name: "original".into(),
            year_converted: 1200,
            sire: None,
        },
    ];

    let lineage = LineageBuilder::from_records(&records).unwrap();
    assert_eq!(lineage.name_of(lineage.root()), "original");
}

#[test]
fn given_missing_name_when_requiring_then_unknown_vampire() {
    let lineage = LineageBuilder::from_path(&resource("canonical.toml")).unwrap();

    assert_eq!(lineage.find("dracula").unwrap(), None);
    assert!(matches!(
        lineage.require("dracula"),
        Err(DomainError::UnknownVampire(_))
    ));
}
