use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;

use crate::ai::node::{Node, NodeRef};
use crate::core::Side;

struct GraphvizBuilder {
    body: String,
    seen: HashSet<usize>,
    // plies from the root, for LR layout
    ranks: BTreeMap<usize, Vec<String>>,
}

impl GraphvizBuilder {
    fn new() -> Self {
        Self {
            body: String::new(),
            seen: HashSet::new(),
            ranks: BTreeMap::new(),
        }
    }

    #[inline]
    fn ptr_id<T>(r: &RefCell<T>) -> usize {
        (r as *const RefCell<T>) as usize
    }

    fn node_id(node: NodeRef<'_>) -> String {
        format!("n_{}", Self::ptr_id(node))
    }

    fn label(node: &Node<'_>) -> String {
        let action = node
            .action
            .as_ref()
            .map_or_else(|| "root".to_string(), |a| a.to_string());
        let score = node
            .score()
            .map_or_else(|| "-".to_string(), |s| format!("{:.2}", s));

        let hp = Side::all()
            .iter()
            .map(|side| {
                let hp = node.hp[*side].iter().map(|(_, hp)| hp.to_string()).collect::<Vec<_>>();
                hp.join("/")
            })
            .collect::<Vec<_>>()
            .join(" vs ");

        format!("{}\\nscore={}\\nhp {}", action, score, hp)
    }

    fn emit(&mut self, node: NodeRef<'_>, depth: usize) {
        if !self.seen.insert(Self::ptr_id(node)) {
            return;
        }

        let n = node.borrow();
        let name = Self::node_id(node);
        let color = match n.turn_owner {
            Side::Agent => "blue",
            Side::Opponent => "red",
        };
        let _ = writeln!(
            self.body,
            "  {} [label=\"{}\", color={}];",
            name,
            Self::label(&n),
            color
        );
        self.ranks.entry(depth).or_default().push(name.clone());

        for child in n.children.iter() {
            let _ = writeln!(self.body, "  {} -> {};", name, Self::node_id(child));
            self.emit(child, depth + 1);
        }
    }
}

/// Render the tree under `root` as a DOT document. Blue nodes were reached
/// by an agent ply, red ones by an opponent ply.
pub fn export_search_tree(root: NodeRef<'_>) -> String {
    let mut gv = GraphvizBuilder::new();
    gv.emit(root, 0);

    let mut dot = String::new();
    dot.push_str("digraph DuelistMinimax {\n");
    dot.push_str("  graph [fontname=\"Helvetica\"];\n");
    dot.push_str("  node  [shape=box, fontname=\"Helvetica\"];\n");
    dot.push_str("  rankdir=LR;\n\n");
    dot.push_str(&gv.body);

    for nodes in gv.ranks.values() {
        if nodes.len() < 2 {
            continue;
        }
        dot.push_str("  { rank=same; ");
        for n in nodes.iter() {
            dot.push_str(n);
            dot.push_str("; ");
        }
        dot.push_str("}\n");
    }

    dot.push_str("}\n");
    dot
}
