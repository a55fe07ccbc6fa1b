//! Text rendering of the node forest via termtree.

use termtree::Tree;
use tracing::instrument;

use crate::domain::{Node, TreeStore};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn label(node: &Node) -> String {
    format!("{} {}", node.node_type, node.id)
}

// All roots hang below a synthetic summary node.
impl TreeNodeConvert for TreeStore {
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        if self.is_empty() {
            return Tree::new("Empty tree".to_string());
        }

        let count = self.len();
        let mut forest = Tree::new(format!(
            "{} node{}",
            count,
            if count == 1 { "" } else { "s" }
        ));
        for root in self.roots() {
            forest.push(build_tree(self, root));
        }
        forest
    }
}

/// Post-order build with an explicit stack; chains may be arbitrarily deep.
fn build_tree<'s>(store: &'s TreeStore, root: &'s Node) -> Tree<String> {
    struct Pending<'a> {
        node: &'a Node,
        children: std::vec::IntoIter<&'a Node>,
        leaves: Vec<Tree<String>>,
    }

    let open = |node: &'s Node| Pending {
        node,
        children: store.children_of(&node.id).into_iter(),
        leaves: Vec::new(),
    };
    let mut stack = vec![open(root)];
    loop {
        let next_child = stack.last_mut().and_then(|top| top.children.next());
        if let Some(child) = next_child {
            stack.push(open(child));
            continue;
        }
        let Some(done) = stack.pop() else {
            return Tree::new(label(root));
        };
        let tree = Tree::new(label(done.node)).with_leaves(done.leaves);
        match stack.last_mut() {
            Some(parent) => parent.leaves.push(tree),
            None => return tree,
        }
    }
}
