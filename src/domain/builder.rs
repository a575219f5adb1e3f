//! Lineage builder: assembles a single-rooted vampire tree from names or a lineage file.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, instrument};

use crate::domain::arena::{VampireId, VampireTree};
use crate::domain::entities::{LineageFile, VampireRecord};
use crate::domain::error::{DomainError, DomainResult};

/// Constructs a [`Lineage`], resolving vampires by name.
#[derive(Debug, Default)]
pub struct LineageBuilder {
    tree: VampireTree,
    by_name: HashMap<String, VampireId>,
}

impl LineageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vampire with no sire yet. Names must be unique within a builder.
    pub fn vampire(&mut self, name: &str, year_converted: i32) -> DomainResult<VampireId> {
        if self.by_name.contains_key(name) {
            return Err(DomainError::DuplicateName(name.to_string()));
        }
        let idx = self.tree.create(name, year_converted);
        self.by_name.insert(name.to_string(), idx);
        Ok(idx)
    }

    /// Makes `sire` the parent of `offspring`.
    pub fn sired_by(&mut self, offspring: &str, sire: &str) -> DomainResult<()> {
        let child = self.lookup(offspring)?;
        let parent = self.lookup(sire)?;
        self.tree.attach_offspring(parent, child)
    }

    /// Finishes the lineage. Exactly one original vampire must remain.
    pub fn build(self) -> DomainResult<Lineage> {
        let roots = self.tree.roots();
        match roots.as_slice() {
            [] => Err(DomainError::EmptyLineage),
            [root] => Ok(Lineage {
                root: *root,
                tree: self.tree,
            }),
            _ => Err(DomainError::MultipleRoots {
                roots: roots
                    .iter()
                    .filter_map(|&idx| self.tree.name(idx).map(str::to_string))
                    .collect(),
            }),
        }
    }

    /// Creates all vampires in record order, then attaches each to its sire in record order.
    #[instrument(level = "debug", skip(records))]
    pub fn from_records(records: &[VampireRecord]) -> DomainResult<Lineage> {
        let mut builder = Self::new();
        for record in records {
            builder.vampire(&record.name, record.year_converted)?;
        }
        for record in records {
            if let Some(sire) = &record.sire {
                builder.sired_by(&record.name, sire)?;
            }
        }
        debug!("built lineage of {} vampires", records.len());
        builder.build()
    }

    /// Parses TOML lineage content; `origin` only labels errors.
    pub fn from_toml_str(content: &str, origin: &Path) -> DomainResult<Lineage> {
        let file: LineageFile = toml::from_str(content).map_err(|e| DomainError::LineageParse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_records(&file.vampire)
    }

    #[instrument(level = "debug")]
    pub fn from_path(path: &Path) -> DomainResult<Lineage> {
        let content = std::fs::read_to_string(path).map_err(|source| DomainError::LineageRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    fn lookup(&self, name: &str) -> DomainResult<VampireId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| DomainError::UnknownVampire(name.to_string()))
    }
}

/// A vampire tree with exactly one original vampire.
#[derive(Debug)]
pub struct Lineage {
    tree: VampireTree,
    root: VampireId,
}

impl Lineage {
    pub fn tree(&self) -> &VampireTree {
        &self.tree
    }

    pub fn root(&self) -> VampireId {
        self.root
    }

    pub fn find(&self, name: &str) -> DomainResult<Option<VampireId>> {
        self.tree.find_by_name(self.root, name)
    }

    /// Like [`find`](Self::find), but a missing name is an error.
    pub fn require(&self, name: &str) -> DomainResult<VampireId> {
        self.find(name)?
            .ok_or_else(|| DomainError::UnknownVampire(name.to_string()))
    }

    pub fn name_of(&self, idx: VampireId) -> &str {
        self.tree.name(idx).unwrap_or("?")
    }
}
