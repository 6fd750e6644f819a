//! Category tree building.
//!
//! Terms arrive as a flat list with parent ids. The builder buckets them by
//! parent, then walks from the roots with an explicit stack, so chain depth is
//! bounded by memory rather than by the call stack. Each parent bucket is
//! consumed once, which guarantees every term is placed at most once.

use crate::catalog::Term;
use crate::ids::TermId;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A term together with the subtree below it.
#[derive(Debug, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub term: Term,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn leaf(term: Term) -> Self {
        Self {
            term,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Ids in depth-first pre-order.
    pub fn ids(&self) -> Vec<TermId> {
        let mut ids = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            ids.push(node.term.id);
            stack.extend(node.children.iter().rev());
        }
        ids
    }
}

// Deep chains would otherwise drop recursively.
impl Drop for CategoryNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Build a forest from a flat term list.
///
/// Roots are terms whose parent is `0`. A term whose parent is not in the
/// input is dropped together with its own subtree. Sibling order follows
/// input order.
pub fn build_category_tree(terms: Vec<Term>) -> Vec<CategoryNode> {
    let mut buckets: HashMap<TermId, Vec<usize>> = HashMap::new();
    for (idx, term) in terms.iter().enumerate() {
        buckets.entry(term.parent).or_default().push(idx);
    }

    let roots = buckets.remove(&TermId(0)).unwrap_or_default();
    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); terms.len()];
    let mut post_order = Vec::with_capacity(terms.len());

    let mut stack: Vec<(usize, bool)> = roots.iter().rev().map(|&idx| (idx, false)).collect();
    while let Some((idx, expanded)) = stack.pop() {
        if expanded {
            post_order.push(idx);
            continue;
        }
        stack.push((idx, true));
        if let Some(children) = buckets.remove(&terms[idx].id) {
            stack.extend(children.iter().rev().map(|&c| (c, false)));
            children_of[idx] = children;
        }
    }

    let mut slots: Vec<Option<Term>> = terms.into_iter().map(Some).collect();
    let mut built: Vec<Option<CategoryNode>> = std::iter::repeat_with(|| None)
        .take(slots.len())
        .collect();

    for idx in post_order {
        let Some(term) = slots[idx].take() else {
            continue;
        };
        let children = children_of[idx]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[idx] = Some(CategoryNode { term, children });
    }

    roots
        .into_iter()
        .filter_map(|idx| built[idx].take())
        .collect()
}

/// Options for listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryQuery {
    /// Nest children under parents instead of returning a flat list.
    pub hierarchical: bool,
    /// Drop terms with no products.
    pub hide_empty: bool,
    /// Term ids to leave out.
    pub exclude: Vec<TermId>,
}

/// Filter terms and, when asked, build them into a tree.
///
/// In flat mode every surviving term becomes a leaf node, in input order.
pub fn select_categories(terms: Vec<Term>, query: &CategoryQuery) -> Vec<CategoryNode> {
    let exclude: HashSet<TermId> = query.exclude.iter().copied().collect();
    let terms: Vec<Term> = terms
        .into_iter()
        .filter(|t| !exclude.contains(&t.id))
        .filter(|t| !query.hide_empty || t.count > 0)
        .collect();

    if query.hierarchical {
        build_category_tree(terms)
    } else {
        terms.into_iter().map(CategoryNode::leaf).collect()
    }
}

/// Total number of nodes in a forest.
pub fn forest_len(forest: &[CategoryNode]) -> usize {
    forest.iter().map(CategoryNode::subtree_len).sum()
}

/// Number of levels in a forest; roots are level 1.
pub fn forest_depth(forest: &[CategoryNode]) -> usize {
    let mut deepest = 0;
    let mut stack: Vec<(&CategoryNode, usize)> = forest.iter().map(|n| (n, 1)).collect();
    while let Some((node, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        stack.extend(node.children.iter().map(|c| (c, depth + 1)));
    }
    deepest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(id: u64, parent: u64) -> Term {
        Term::new(id, parent, format!("Term {}", id))
    }

    #[test]
    fn test_builds_nested_forest() {
        let terms = vec![t(1, 0), t(2, 1), t(3, 0), t(4, 2), t(5, 1)];
        let forest = build_category_tree(terms);

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].ids(), vec![TermId(1), TermId(2), TermId(4), TermId(5)]);
        assert_eq!(forest[1].ids(), vec![TermId(3)]);
        assert_eq!(forest_len(&forest), 5);
    }

    #[test]
    fn test_children_may_precede_parents_in_input() {
        let terms = vec![t(4, 2), t(2, 1), t(1, 0)];
        let forest = build_category_tree(terms);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].ids(), vec![TermId(1), TermId(2), TermId(4)]);
    }

    #[test]
    fn test_orphans_are_dropped() {
        // 7's parent (99) is absent; 8 hangs off the orphan and goes with it.
        let terms = vec![t(1, 0), t(7, 99), t(8, 7), t(2, 1)];
        let forest = build_category_tree(terms);
        assert_eq!(forest_len(&forest), 2);
        assert_eq!(forest[0].ids(), vec![TermId(1), TermId(2)]);
    }

    #[test]
    fn test_cycle_without_root_is_dropped() {
        let terms = vec![t(1, 2), t(2, 1), t(3, 0)];
        let forest = build_category_tree(terms);
        assert_eq!(forest_len(&forest), 1);
    }

    #[test]
    fn test_every_node_appears_once() {
        let terms: Vec<Term> = (1..=200).map(|id| t(id, id / 3)).collect();
        let forest = build_category_tree(terms);

        let mut seen: Vec<TermId> = forest.iter().flat_map(|n| n.ids()).collect();
        let total = seen.len();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), total);
        assert_eq!(total, 200);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let depth = 100_000;
        let terms: Vec<Term> = (1..=depth).map(|id| t(id, id - 1)).collect();
        let forest = build_category_tree(terms);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest_len(&forest), depth as usize);
        assert_eq!(forest_depth(&forest), depth as usize);
    }

    #[test]
    fn test_forest_depth() {
        assert_eq!(forest_depth(&[]), 0);
        let forest = build_category_tree(vec![t(1, 0), t(2, 1), t(3, 0), t(4, 2), t(5, 1)]);
        assert_eq!(forest_depth(&forest), 3);
    }

    #[test]
    fn test_select_flat_with_filters() {
        let terms = vec![t(1, 0).with_count(2), t(2, 1), t(3, 0).with_count(1)];
        let query = CategoryQuery {
            hierarchical: false,
            hide_empty: true,
            exclude: vec![TermId(3)],
        };
        let nodes = select_categories(terms, &query);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].term.id, TermId(1));
        assert!(nodes[0].children.is_empty());
    }

    #[test]
    fn test_select_hierarchical() {
        let terms = vec![t(1, 0), t(2, 1)];
        let query = CategoryQuery {
            hierarchical: true,
            ..Default::default()
        };
        let nodes = select_categories(terms, &query);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].children.len(), 1);
    }
}
