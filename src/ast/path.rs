//! Ancestor paths from an occurrence out to the root of its syntax tree.

use crate::ast::{Range, SyntaxNode};
use crate::error::{Result, UsageError};

/// Borrowed chain of nodes `[occurrence, parent, ..., outermost]`.
///
/// Never empty: index 0 is always the node naming the symbol.
#[derive(Debug, Clone)]
pub struct AncestorPath<'a> {
    nodes: Vec<&'a SyntaxNode>,
}

impl<'a> AncestorPath<'a> {
    /// Build a path from nodes ordered innermost first.
    ///
    /// # Returns
    /// * `Ok(AncestorPath)` - At least one node was given
    /// * `Err(UsageError::EmptyPath)` - No nodes
    pub fn new(nodes: Vec<&'a SyntaxNode>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(UsageError::EmptyPath);
        }
        Ok(Self { nodes })
    }

    /// Build a path over an owned slice ordered innermost first.
    pub fn from_nodes(nodes: &'a [SyntaxNode]) -> Result<Self> {
        Self::new(nodes.iter().collect())
    }

    /// The node naming the symbol.
    pub fn occurrence(&self) -> &'a SyntaxNode {
        self.nodes[0]
    }

    /// The outermost node of the path.
    pub fn outermost(&self) -> &'a SyntaxNode {
        self.nodes[self.nodes.len() - 1]
    }

    /// Number of nodes in the path, at least 1.
    pub fn depth(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes, innermost first.
    pub fn nodes(&self) -> &[&'a SyntaxNode] {
        &self.nodes
    }

    /// The node at `index` and everything further out.
    pub fn outward_from(&self, index: usize) -> &[&'a SyntaxNode] {
        self.nodes.get(index..).unwrap_or(&[])
    }

    /// Iterate innermost to outermost.
    pub fn iter(&self) -> impl Iterator<Item = &'a SyntaxNode> + '_ {
        self.nodes.iter().copied()
    }
}

/// Find the chain of nodes covering `range` in the tree rooted at `root`.
///
/// The root is always part of the path. From there the walk descends into
/// the first child whose range contains `range` until no child does; the
/// last node reached becomes the occurrence.
pub fn ancestor_path<'a>(root: &'a SyntaxNode, range: &Range) -> AncestorPath<'a> {
    let mut nodes = vec![root];
    let mut current = root;
    while let Some(child) = current
        .children()
        .iter()
        .find(|child| child.contains_range(range))
    {
        nodes.push(child);
        current = child;
    }
    nodes.reverse();
    AncestorPath { nodes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeKind, Position};

    fn tree() -> SyntaxNode {
        SyntaxNode::new(NodeKind::Other("TranslationUnit".into()))
            .with_range(Range::new(Position::new(0, 0), Position::new(10, 0)))
            .with_children(vec![
                SyntaxNode::new(NodeKind::Function)
                    .with_range(Range::new(Position::new(0, 0), Position::new(2, 1))),
                SyntaxNode::new(NodeKind::Function)
                    .with_range(Range::new(Position::new(3, 0), Position::new(6, 1)))
                    .with_children(vec![SyntaxNode::new(NodeKind::DeclRef)
                        .with_detail("x")
                        .with_range(Range::on_line(4, 4, 1))]),
            ])
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!(
            AncestorPath::new(Vec::new()),
            Err(UsageError::EmptyPath)
        ));
    }

    #[test]
    fn test_path_descends_to_innermost_node() {
        let root = tree();
        let path = ancestor_path(&root, &Range::on_line(4, 4, 1));

        assert_eq!(path.depth(), 3);
        assert_eq!(path.occurrence().kind(), &NodeKind::DeclRef);
        assert_eq!(path.nodes()[1].kind(), &NodeKind::Function);
        assert_eq!(path.outermost(), &root);
    }

    #[test]
    fn test_path_outside_children_is_root_only() {
        let root = tree();
        let path = ancestor_path(&root, &Range::on_line(8, 0, 3));

        assert_eq!(path.depth(), 1);
        assert_eq!(path.occurrence(), &root);
    }

    #[test]
    fn test_outward_from_past_end_is_empty() {
        let root = tree();
        let path = ancestor_path(&root, &Range::on_line(4, 4, 1));

        assert_eq!(path.outward_from(1).len(), 2);
        assert!(path.outward_from(5).is_empty());
    }
}
