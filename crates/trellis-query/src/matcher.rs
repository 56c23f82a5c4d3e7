//! Tree matching
//!
//! Two entry points: `evaluate` walks a scope subtree once and collects every
//! node matching a selector group, in document order; `matches_node` tests a
//! single node in full-tree context (ancestors resolved through the live
//! parent chain), which backs `filter` and `exclude`.

use std::collections::HashSet;

use tracing::trace;
use trellis_tree::{NodeId, WidgetTree};

use crate::selector::{Combinator, SelectorChain, SelectorGroup};

/// A chain step some ancestor on the current DFS path has made reachable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frontier {
    chain: usize,
    step: usize,
}

/// Evaluate `group` over `scope` and its subtree
///
/// One depth-first pre-order traversal, all chains evaluated concurrently
/// via combinator-threaded frontiers. Output is visitation order; a node
/// matching several alternatives appears once, at its first visit.
pub(crate) fn evaluate(tree: &WidgetTree, scope: NodeId, group: &SelectorGroup) -> Vec<NodeId> {
    let mut matched = Vec::new();
    let mut seen = HashSet::new();
    // Every chain starts reachable at its first step; the implicit anchor is
    // a self-inclusive descendant of the scope, so these persist everywhere.
    let frontiers: Vec<Frontier> = (0..group.chains.len())
        .map(|chain| Frontier { chain, step: 0 })
        .collect();
    visit(tree, scope, group, &frontiers, &mut matched, &mut seen);
    trace!(matches = matched.len(), "selector group evaluated");
    matched
}

fn visit(
    tree: &WidgetTree,
    node: NodeId,
    group: &SelectorGroup,
    frontiers: &[Frontier],
    matched: &mut Vec<NodeId>,
    seen: &mut HashSet<NodeId>,
) {
    let data = tree.node(node);
    let mut next: Vec<Frontier> = Vec::with_capacity(frontiers.len());
    for &frontier in frontiers {
        let chain = &group.chains[frontier.chain];
        let step = &chain.steps[frontier.step];
        // Descendant frontiers stay live for the whole subtree; child
        // frontiers are only ever handed one level down and lapse here.
        if step.combinator == Combinator::Descendant {
            push_unique(&mut next, frontier);
        }
        if step.compound.matches(data, tree) {
            if frontier.step + 1 == chain.steps.len() {
                if seen.insert(node) {
                    matched.push(node);
                }
            } else {
                // The next step is reachable for this node's children no
                // matter its combinator; persistence is decided above when
                // the children hand frontiers further down.
                push_unique(
                    &mut next,
                    Frontier {
                        chain: frontier.chain,
                        step: frontier.step + 1,
                    },
                );
            }
        }
    }
    for &child in tree.children_of(node) {
        visit(tree, child, group, &next, matched, seen);
    }
}

fn push_unique(frontiers: &mut Vec<Frontier>, frontier: Frontier) {
    if !frontiers.contains(&frontier) {
        frontiers.push(frontier);
    }
}

/// Test one node against `group` in full-tree context
///
/// Matches right to left: the node must satisfy a chain's final compound,
/// then earlier steps resolve up the live parent chain.
pub(crate) fn matches_node(tree: &WidgetTree, node: NodeId, group: &SelectorGroup) -> bool {
    group.chains.iter().any(|chain| matches_chain(tree, node, chain))
}

fn matches_chain(tree: &WidgetTree, node: NodeId, chain: &SelectorChain) -> bool {
    let last = chain.steps.len() - 1;
    chain.steps[last].compound.matches(tree.node(node), tree)
        && prefix_matches(tree, node, chain, last)
}

/// Check `steps[..step]` against the ancestors of `node`, which has already
/// matched `steps[step]`
fn prefix_matches(tree: &WidgetTree, node: NodeId, chain: &SelectorChain, step: usize) -> bool {
    if step == 0 {
        return true;
    }
    let prev = step - 1;
    match chain.steps[step].combinator {
        Combinator::Child => match tree.parent_of(node) {
            Some(parent) => {
                chain.steps[prev].compound.matches(tree.node(parent), tree)
                    && prefix_matches(tree, parent, chain, prev)
            }
            None => false,
        },
        // Any proper ancestor may carry the previous step; backtrack over
        // all candidates.
        Combinator::Descendant => tree.ancestors(node).any(|ancestor| {
            chain.steps[prev].compound.matches(tree.node(ancestor), tree)
                && prefix_matches(tree, ancestor, chain, prev)
        }),
    }
}
