use super::{Node, Path};

/// An iterator that traverses the tree in left-to-right post-order (i.e. depth-first), yielding
/// the path of each node along with the node itself.
///
/// This iterator is created by [`Node::post_order_paths`].
pub struct PathIter<'a> {
    stack: Vec<(&'a Node, Path)>,
    last_visited: Option<&'a Node>,
}

impl<'a> PathIter<'a> {
    /// Creates a new iterator that traverses the tree in left-to-right post-order.
    pub fn new(node: &'a Node) -> Self {
        Self {
            stack: vec![(node, Vec::new())],
            last_visited: None,
        }
    }

    /// Pops the current node in the stack and marks it as the last visited node.
    fn visit(&mut self) -> Option<(Path, &'a Node)> {
        let (node, path) = self.stack.pop()?;
        self.last_visited = Some(node);
        Some((path, node))
    }

    /// Returns true if the given node is the last visited node.
    fn is_last_visited(&self, node: &'a Node) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, node),
            None => false,
        }
    }
}

impl<'a> Iterator for PathIter<'a> {
    type Item = (Path, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, path) = match self.stack.last() {
                Some((node, path)) => (*node, path.clone()),
                None => return None,
            };

            match node.args().last() {
                // the children of this node have not been visited yet
                Some(last) if !self.is_last_visited(last) => {
                    for (i, arg) in node.args().iter().enumerate().rev() {
                        let mut child = path.clone();
                        child.push(i);
                        self.stack.push((arg, child));
                    }
                },
                _ => return self.visit(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn post_order() {
        let node = "2x + sin(y)".parse::<Node>().unwrap().normalize();
        let visited = node.post_order_paths()
            .map(|(path, node)| (path, node.key()))
            .collect::<Vec<_>>();
        assert_eq!(visited, vec![
            (vec![0, 0], "2".to_string()),
            (vec![0, 1], "x".to_string()),
            (vec![0], "2x".to_string()),
            (vec![1, 0], "y".to_string()),
            (vec![1], "sin(y)".to_string()),
            (vec![], "2x+sin(y)".to_string()),
        ]);
    }
}
