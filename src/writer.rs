//! Text renderers for tree state: hierarchy, in-order sequence and Graphviz.

use std::fmt::Display;
use std::io::{self, Write};

use crate::ix::IndexType;
use crate::{Color, IntervalTree};

impl<T, Ix> IntervalTree<T, Ix>
where
    T: Ord + Copy + Default + Display,
    Ix: IndexType,
{
    /// Writes one line per node in preorder, each formatted as
    /// `{key:<interval>, max:<max>, min:<min>}(<COLOR>)`.
    ///
    /// A node reached as the right (or only last) child is marked `R----`,
    /// a left child `L----`. Descendant lines are indented with `|    ` under
    /// a left child and five spaces under a right one. An empty tree writes
    /// nothing.
    pub fn write_hierarchy<W: Write>(&self, mut writer: W) -> io::Result<()> {
        if self.root != Ix::NIL {
            self.write_hierarchy_node(&mut writer, self.root, String::new(), true)?;
        }
        Ok(())
    }

    fn write_hierarchy_node<W: Write>(
        &self,
        writer: &mut W,
        ix: Ix,
        indent: String,
        last: bool,
    ) -> io::Result<()> {
        let node = self.node(ix);
        let (marker, pad) = if last { ("R----", "     ") } else { ("L----", "|    ") };
        writeln!(
            writer,
            "{}{}{{key:{}, max:{}, min:{}}}({})",
            indent,
            marker,
            node.interval,
            node.max,
            node.min,
            if node.color == Color::Red { "RED" } else { "BLACK" }
        )?;
        let child_indent = format!("{}{}", indent, pad);
        if node.left != Ix::NIL {
            self.write_hierarchy_node(writer, node.left, child_indent.clone(), false)?;
        }
        if node.right != Ix::NIL {
            self.write_hierarchy_node(writer, node.right, child_indent, true)?;
        }
        Ok(())
    }

    /// Writes the stored keys in order, each followed by a single space.
    /// An empty tree writes nothing.
    pub fn write_sequence<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for interval in self.iter() {
            write!(writer, "{} ", interval)?;
        }
        Ok(())
    }

    /// Writes the tree as a Graphviz digraph, one filled node per interval
    /// with its arena slot, summaries and color.
    pub fn write_dot<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "digraph {{")?;
        for slot in 1..self.nodes.len() {
            let node = &self.nodes[slot];
            writeln!(
                writer,
                "    {} [label=\"i={}\\n{}\\nmax={}, min={}\", fillcolor={}, style=filled]",
                slot,
                slot,
                node.interval,
                node.max,
                node.min,
                if node.color == Color::Red { "salmon" } else { "grey65" }
            )?;
            if node.left != Ix::NIL {
                writeln!(writer, "    {} -> {} [label=\"L\"]", slot, node.left.get())?;
            }
            if node.right != Ix::NIL {
                writeln!(writer, "    {} -> {} [label=\"R\"]", slot, node.right.get())?;
            }
        }
        writeln!(writer, "}}")
    }
}
