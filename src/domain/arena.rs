use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace};

use crate::domain::entities::{Vampire, MILLENNIAL_YEAR};
use crate::domain::error::{DomainError, DomainResult};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(0);

/// Handle of a vampire inside its [`VampireTree`].
///
/// Carries the identity of the tree that created it, so a handle from another
/// tree never resolves, even when its arena slot is occupied here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VampireId {
    tree: u64,
    index: Index,
}

/// Tree node in the arena-based lineage.
#[derive(Debug)]
pub struct VampireNode {
    /// Name and conversion year
    pub vampire: Vampire,
    /// Handle of the sire, None for an original vampire
    parent: Option<VampireId>,
    /// Handles of offspring, in the order they were attached
    children: Vec<VampireId>,
}

impl VampireNode {
    pub fn name(&self) -> &str {
        &self.vampire.name
    }

    pub fn year_converted(&self) -> i32 {
        self.vampire.year_converted
    }

    pub fn parent(&self) -> Option<VampireId> {
        self.parent
    }

    pub fn children(&self) -> &[VampireId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena-based lineage of vampires.
///
/// Nodes own nothing: the arena owns every node, `children` and `parent` are
/// plain handles, so the sire back-reference never forms an ownership cycle.
/// The arena may hold several independent lineages (one per original vampire).
#[derive(Debug)]
pub struct VampireTree {
    id: u64,
    arena: Arena<VampireNode>,
}

impl Default for VampireTree {
    fn default() -> Self {
        Self::new()
    }
}

impl VampireTree {
    pub fn new() -> Self {
        Self {
            id: NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed),
            arena: Arena::new(),
        }
    }

    /// Creates a parentless, childless vampire.
    #[instrument(level = "debug", skip(self))]
    pub fn create(&mut self, name: &str, year_converted: i32) -> VampireId {
        let index = self.arena.insert(VampireNode {
            vampire: Vampire::new(name, year_converted),
            parent: None,
            children: Vec::new(),
        });
        self.id_of(index)
    }

    /// Appends `child` to the offspring of `parent` and makes `parent` its sire.
    ///
    /// A child that already has a sire is moved: it is removed from the old
    /// sire's offspring first, so it never appears twice. Attaching a vampire
    /// below itself or below one of its own descendants is rejected.
    #[instrument(level = "debug", skip(self))]
    pub fn attach_offspring(&mut self, parent: VampireId, child: VampireId) -> DomainResult<()> {
        self.node(parent)?;
        let old_parent = self.node(child)?.parent;

        if child == parent || self.ancestors(parent).any(|(idx, _)| idx == child) {
            return Err(DomainError::CycleDetected {
                sire: self.label(parent),
                offspring: self.label(child),
            });
        }

        if let Some(old) = old_parent {
            debug!(
                "re-parenting {} from {} to {}",
                self.label(child),
                self.label(old),
                self.label(parent)
            );
            if let Some(old_node) = self.get_mut(old) {
                old_node.children.retain(|&idx| idx != child);
            }
        }

        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = Some(parent);
        }
        Ok(())
    }

    /// `None` for handles created by another tree.
    pub fn get(&self, idx: VampireId) -> Option<&VampireNode> {
        if idx.tree != self.id {
            return None;
        }
        self.arena.get(idx.index)
    }

    fn get_mut(&mut self, idx: VampireId) -> Option<&mut VampireNode> {
        if idx.tree != self.id {
            return None;
        }
        self.arena.get_mut(idx.index)
    }

    fn id_of(&self, index: Index) -> VampireId {
        VampireId {
            tree: self.id,
            index,
        }
    }

    /// Like [`get`](Self::get), but a handle this tree does not hold is an error.
    pub fn node(&self, idx: VampireId) -> DomainResult<&VampireNode> {
        self.get(idx)
            .ok_or_else(|| DomainError::UnknownVampire(format!("{:?}", idx)))
    }

    pub fn name(&self, idx: VampireId) -> Option<&str> {
        self.get(idx).map(VampireNode::name)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Original vampires (nodes without a sire), in creation order.
    pub fn roots(&self) -> Vec<VampireId> {
        self.arena
            .iter()
            .filter(|(_, node)| node.is_root())
            .map(|(index, _)| self.id_of(index))
            .collect()
    }

    /// The original vampire at the top of `idx`'s lineage.
    #[instrument(level = "trace", skip(self))]
    pub fn root_of(&self, idx: VampireId) -> DomainResult<VampireId> {
        self.node(idx)?;
        Ok(self.ancestors(idx).last().map(|(root, _)| root).unwrap_or(idx))
    }

    /// Pre-order walk of the subtree rooted at `idx`, including `idx`.
    pub fn iter_subtree(&self, idx: VampireId) -> SubtreeIterator<'_> {
        SubtreeIterator::new(self, idx)
    }

    /// Walk from the sire of `idx` up to the original vampire.
    pub fn ancestors(&self, idx: VampireId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            next: self.get(idx).and_then(|node| node.parent),
        }
    }

    /// Number of vampires directly turned by `idx`.
    pub fn number_of_offspring(&self, idx: VampireId) -> DomainResult<usize> {
        Ok(self.node(idx)?.children.len())
    }

    /// Number of sire hops between `idx` and its original vampire.
    #[instrument(level = "trace", skip(self))]
    pub fn depth_from_root(&self, idx: VampireId) -> DomainResult<usize> {
        self.node(idx)?;
        Ok(self.ancestors(idx).count())
    }

    /// Strictly closer to the original vampire; equal depth is never more senior.
    #[instrument(level = "trace", skip(self))]
    pub fn is_more_senior_than(&self, idx: VampireId, other: VampireId) -> DomainResult<bool> {
        Ok(self.depth_from_root(idx)? < self.depth_from_root(other)?)
    }

    /// First vampire named `name` in pre-order below (and including) `root`.
    #[instrument(level = "debug", skip(self))]
    pub fn find_by_name(&self, root: VampireId, name: &str) -> DomainResult<Option<VampireId>> {
        self.node(root)?;
        let found = self
            .iter_subtree(root)
            .find(|(_, node)| node.name() == name)
            .map(|(idx, _)| idx);
        trace!("find_by_name({}) -> {:?}", name, found);
        Ok(found)
    }

    /// Size of the subtree below `idx`, excluding `idx` itself.
    #[instrument(level = "debug", skip(self))]
    pub fn total_descendant_count(&self, idx: VampireId) -> DomainResult<usize> {
        self.node(idx)?;
        Ok(self.iter_subtree(idx).count().saturating_sub(1))
    }

    /// Vampires of the subtree (including `idx`) turned strictly after `threshold_year`, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn collect_converted_after(
        &self,
        idx: VampireId,
        threshold_year: i32,
    ) -> DomainResult<Vec<VampireId>> {
        self.node(idx)?;
        Ok(self
            .iter_subtree(idx)
            .filter(|(_, node)| node.year_converted() > threshold_year)
            .map(|(idx, _)| idx)
            .collect())
    }

    /// Vampires of the subtree turned after [`MILLENNIAL_YEAR`].
    pub fn millennials(&self, idx: VampireId) -> DomainResult<Vec<VampireId>> {
        self.collect_converted_after(idx, MILLENNIAL_YEAR)
    }

    /// True if `node` lies in the subtree of `candidate`; every vampire is its own ancestor.
    #[instrument(level = "trace", skip(self))]
    pub fn is_ancestor_of(&self, candidate: VampireId, node: VampireId) -> DomainResult<bool> {
        self.node(candidate)?;
        self.node(node)?;
        Ok(self.iter_subtree(candidate).any(|(idx, _)| idx == node))
    }

    /// Deepest vampire whose subtree contains both `first` and `second`.
    ///
    /// Walks up from `first`, stopping at the first sire that already contains
    /// `second`. An original vampire passed as either argument is returned as is.
    #[instrument(level = "debug", skip(self))]
    pub fn closest_common_ancestor(
        &self,
        first: VampireId,
        second: VampireId,
    ) -> DomainResult<VampireId> {
        let second_node = self.node(second)?;
        if self.root_of(first)? != self.root_of(second)? {
            return Err(DomainError::DisjointLineages {
                first: self.label(first),
                second: self.label(second),
            });
        }

        let mut current = first;
        loop {
            let current_node = self.node(current)?;
            if second_node.is_root() {
                return Ok(second);
            }
            let Some(sire) = current_node.parent else {
                return Ok(current);
            };
            if current == second {
                return Ok(if self.is_more_senior_than(current, second)? {
                    current
                } else {
                    second
                });
            }
            if self.is_ancestor_of(current, second)? {
                return Ok(current);
            }
            trace!("{} does not contain {}, moving up", self.label(current), self.label(second));
            current = sire;
        }
    }

    fn label(&self, idx: VampireId) -> String {
        self.name(idx)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:?}", idx))
    }
}

pub struct SubtreeIterator<'a> {
    tree: &'a VampireTree,
    stack: Vec<VampireId>,
}

impl<'a> SubtreeIterator<'a> {
    fn new(tree: &'a VampireTree, start: VampireId) -> Self {
        let mut stack = Vec::new();
        if tree.get(start).is_some() {
            stack.push(start);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for SubtreeIterator<'a> {
    type Item = (VampireId, &'a VampireNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct AncestorIterator<'a> {
    tree: &'a VampireTree,
    next: Option<VampireId>,
}

impl<'a> Iterator for AncestorIterator<'a> {
    type Item = (VampireId, &'a VampireNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.next?;
        let node = self.tree.get(current_idx)?;
        self.next = node.parent;
        Some((current_idx, node))
    }
}
