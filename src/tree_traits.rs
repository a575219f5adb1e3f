use std::collections::HashMap;

use termtree::Tree;
use tracing::instrument;

use crate::domain::{Lineage, VampireId, VampireTree};

/// Conversion of a lineage into a printable `termtree` of `name (year)` labels.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;

    /// Rendered text of [`to_tree_string`](Self::to_tree_string).
    fn render(&self) -> String {
        let tree = self.to_tree_string();
        let text = tree.to_string();
        dismantle(tree);
        text
    }
}

impl TreeNodeConvert for VampireTree {
    /// Renders every lineage held by the arena; a forest gets a synthetic top label.
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        let roots = self.roots();
        match roots.as_slice() {
            [] => Tree::new("Empty tree".to_string()),
            [root] => subtree(self, *root),
            _ => Tree::new("lineages".to_string())
                .with_leaves(roots.iter().map(|&root| subtree(self, root))),
        }
    }
}

impl TreeNodeConvert for Lineage {
    fn to_tree_string(&self) -> Tree<String> {
        subtree(self.tree(), self.root())
    }
}

/// Builds bottom-up over the reversed pre-order, so every child is finished
/// before its sire collects it.
fn subtree(tree: &VampireTree, idx: VampireId) -> Tree<String> {
    let order: Vec<VampireId> = tree.iter_subtree(idx).map(|(node_idx, _)| node_idx).collect();
    let mut built: HashMap<VampireId, Tree<String>> = HashMap::with_capacity(order.len());

    for &node_idx in order.iter().rev() {
        if let Some(node) = tree.get(node_idx) {
            let leaves: Vec<Tree<String>> = node
                .children()
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(
                node_idx,
                Tree::new(node.vampire.to_string()).with_leaves(leaves),
            );
        }
    }

    built
        .remove(&idx)
        .unwrap_or_else(|| Tree::new(String::new()))
}

/// Drops a rendered tree leaf by leaf; the nested drop glue recurses once per generation.
pub fn dismantle(tree: Tree<String>) {
    let mut pending = vec![tree];
    while let Some(mut node) = pending.pop() {
        pending.append(&mut node.leaves);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LineageBuilder;

    #[test]
    fn given_lineage_when_rendering_then_children_follow_attach_order() {
        let mut builder = LineageBuilder::new();
        builder.vampire("original", 1200).unwrap();
        builder.vampire("bart", 1600).unwrap();
        builder.vampire("ansel", 1750).unwrap();
        builder.vampire("elgort", 1985).unwrap();
        builder.sired_by("bart", "original").unwrap();
        builder.sired_by("ansel", "original").unwrap();
        builder.sired_by("elgort", "ansel").unwrap();
        let lineage = builder.build().unwrap();

        let rendered = lineage.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "original (1200)");
        assert!(lines[1].ends_with("bart (1600)"));
        assert!(lines[2].ends_with("ansel (1750)"));
        assert!(lines[3].ends_with("elgort (1985)"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn given_empty_arena_when_rendering_then_placeholder() {
        let tree = VampireTree::new();
        assert_eq!(tree.to_tree_string().root, "Empty tree");
    }

    #[test]
    fn given_two_lineages_when_rendering_then_both_under_top_label() {
        let mut tree = VampireTree::new();
        tree.create("first", 1000);
        tree.create("second", 1100);

        let rendered = tree.to_tree_string();
        assert_eq!(rendered.root, "lineages");
        assert_eq!(rendered.leaves.len(), 2);
    }
}
