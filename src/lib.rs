//! Vampire lineage trees.
//!
//! A lineage is an arena of vampires linked sire -> offspring. The
//! [`domain::VampireTree`] answers structural queries: seniority, lookup by
//! name, descendant counts, conversion-year filters, ancestry and closest
//! common ancestors.

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;
