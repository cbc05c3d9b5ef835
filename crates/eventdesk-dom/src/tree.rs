//! DOM Tree (arena-based allocation)
//!
//! Slot 0 always holds the document node. Removed nodes stay in the arena
//! as detached subtrees and may be re-inserted.

use crate::{DomError, ElementData, Node, NodeData, NodeId};

/// Arena-based DOM tree
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::text(text))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::comment(text))
    }

    /// Element data of a node, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Mutable element data of a node, if it is an element
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_node = self.get(parent).ok_or(DomError::UnknownNode(parent))?;
        if !parent_node.is_container() {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        let child_node = self.get(child).ok_or(DomError::UnknownNode(child))?;
        if matches!(child_node.data, NodeData::Document) || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;

        Ok(())
    }

    /// Unlink a node from its parent, returns false if it was not attached
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return false;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        true
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let first = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Children {
            tree: self,
            next: first,
        }
    }

    /// Iterate over ancestors, nearest first (the node itself excluded)
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id).unwrap_or(NodeId::NONE),
        }
    }

    /// All descendants in document order (the node itself excluded)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).map(|(c, _)| c).collect();
        stack.reverse();

        while let Some(current) = stack.pop() {
            out.push(current);
            let first = stack.len();
            stack.extend(self.children(current).map(|(c, _)| c));
            stack[first..].reverse();
        }

        out
    }

    /// Inclusive descendant check, like `Node.contains`
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if self.get(node).is_none() || self.get(ancestor).is_none() {
            return false;
        }
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Whether a node is attached to the document
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(NodeId::ROOT, id)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    /// First connected element whose `id` attribute equals `id`
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(NodeId::ROOT)
            .into_iter()
            .find(|&n| self.element(n).and_then(ElementData::id) == Some(id))
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Iterator over the ancestors of a node
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.parent;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let button = tree.create_element("button");
        let menu = tree.create_element("ul");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, button).unwrap();
        tree.append_child(div, menu).unwrap();
        (tree, div, button, menu)
    }

    #[test]
    fn test_append_links_siblings() {
        let (tree, div, button, menu) = sample();
        let div_node = tree.get(div).unwrap();
        assert_eq!(div_node.first_child, button);
        assert_eq!(div_node.last_child, menu);
        assert_eq!(tree.get(button).unwrap().next_sibling, menu);
        assert_eq!(tree.get(menu).unwrap().prev_sibling, button);
    }

    #[test]
    fn test_append_moves_attached_node() {
        let (mut tree, div, button, menu) = sample();
        tree.append_child(menu, button).unwrap();

        let children: Vec<_> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(children, vec![menu]);
        assert_eq!(tree.parent(button), Some(menu));
    }

    #[test]
    fn test_append_rejects_cycles() {
        let (mut tree, div, button, _) = sample();
        assert_eq!(
            tree.append_child(button, div),
            Err(DomError::HierarchyRequest { parent: button, child: div })
        );
        assert!(tree.append_child(div, div).is_err());
        assert!(tree.append_child(div, tree.root()).is_err());
    }

    #[test]
    fn test_text_nodes_cannot_have_children() {
        let (mut tree, div, _, _) = sample();
        let text = tree.create_text("hi");
        tree.append_child(div, text).unwrap();
        let span = tree.create_element("span");
        assert!(tree.append_child(text, span).is_err());
    }

    #[test]
    fn test_descendants_in_document_order() {
        let (mut tree, div, button, menu) = sample();
        let label = tree.create_text("Menu");
        let item = tree.create_element("li");
        tree.append_child(button, label).unwrap();
        tree.append_child(menu, item).unwrap();

        assert_eq!(tree.descendants(div), vec![button, label, menu, item]);
        assert_eq!(tree.text_content(div), "Menu");
    }

    #[test]
    fn test_contains_is_inclusive() {
        let (mut tree, div, button, menu) = sample();
        assert!(tree.contains(div, div));
        assert!(tree.contains(div, button));
        assert!(!tree.contains(button, menu));

        assert!(tree.detach(menu));
        assert!(!tree.contains(div, menu));
        assert!(!tree.is_connected(menu));
        assert!(!tree.detach(menu));
    }

    #[test]
    fn test_get_element_by_id() {
        let (mut tree, _, button, _) = sample();
        tree.element_mut(button).unwrap().set_attr("id", "save");
        assert_eq!(tree.get_element_by_id("save"), Some(button));
        assert_eq!(tree.get_element_by_id("missing"), None);
    }
}
