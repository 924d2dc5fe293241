//! Segment trie used for route lookup.
//!
//! One node per path segment. A node carries the full pattern only when a
//! route terminates exactly on it.
//!
//! # Design Decisions
//! - Literal and wild children are distinct, so `/user/list` and `/user/:id` coexist
//! - Params with different names at the same depth share one node; names come from the stored pattern
//! - Search is depth-first and tries literal children before wild ones

use crate::routing::pattern;

#[derive(Debug, Default, Clone)]
pub struct Node {
    /// Full route pattern, empty unless a route ends here.
    pattern: String,
    /// Segment this node matches, e.g. `user`, `:id`, `*filepath`.
    part: String,
    children: Vec<Node>,
    /// `part` starts with `:` or `*`.
    is_wild: bool,
}

impl Node {
    fn new(part: &str) -> Self {
        Self {
            pattern: String::new(),
            part: part.to_owned(),
            children: Vec::new(),
            is_wild: pattern::is_wild(part),
        }
    }

    /// The registered pattern, if a route terminates at this node.
    pub fn pattern(&self) -> Option<&str> {
        if self.pattern.is_empty() {
            None
        } else {
            Some(&self.pattern)
        }
    }

    pub fn part(&self) -> &str {
        &self.part
    }

    pub fn is_wild(&self) -> bool {
        self.is_wild
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Insert `full_pattern` whose segments are `parts`, starting at `depth`.
    ///
    /// Returns the pattern previously terminating at the same node when it
    /// differs, e.g. `/p/:a` displaced by `/p/:b`.
    pub fn insert(&mut self, full_pattern: &str, parts: &[&str], depth: usize) -> Option<String> {
        if parts.len() == depth {
            let previous = std::mem::replace(&mut self.pattern, full_pattern.to_owned());
            return (!previous.is_empty() && previous != full_pattern).then_some(previous);
        }

        let part = parts[depth];
        let index = match self.child_for_insert(part) {
            Some(index) => index,
            None => {
                self.children.push(Node::new(part));
                self.children.len() - 1
            }
        };
        self.children[index].insert(full_pattern, parts, depth + 1)
    }

    /// Find the node a request with segments `parts` resolves to.
    pub fn search(&self, parts: &[&str], depth: usize) -> Option<&Node> {
        if parts.len() == depth || pattern::is_wildcard(&self.part) {
            return self.pattern().map(|_| self);
        }

        let part = parts[depth];
        let literal = self.children.iter().filter(|c| !c.is_wild && c.part == part);
        let wild = self.children.iter().filter(|c| c.is_wild);
        literal
            .chain(wild)
            .find_map(|child| child.search(parts, depth + 1))
    }

    /// Existing child that a new registration of `part` should descend into.
    fn child_for_insert(&self, part: &str) -> Option<usize> {
        if pattern::is_wild(part) {
            let marker = part.chars().next();
            self.children
                .iter()
                .position(|c| c.is_wild && c.part.chars().next() == marker)
        } else {
            self.children
                .iter()
                .position(|c| !c.is_wild && c.part == part)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::pattern::parse;

    fn build(patterns: &[&str]) -> Node {
        let mut root = Node::default();
        for p in patterns {
            root.insert(p, &parse(p), 0);
        }
        root
    }

    fn lookup<'a>(root: &'a Node, path: &str) -> Option<&'a str> {
        root.search(&parse(path), 0).and_then(Node::pattern)
    }

    #[test]
    fn test_insert_marks_terminal_nodes_only() {
        let root = build(&["/a/b/c"]);
        let a = &root.children()[0];
        assert_eq!(a.part(), "a");
        assert!(a.pattern().is_none());
        let c = &a.children()[0].children()[0];
        assert_eq!(c.pattern(), Some("/a/b/c"));
        assert!(lookup(&root, "/a/b").is_none());
    }

    #[test]
    fn test_literal_preferred_over_param() {
        let root = build(&["/user/:id", "/user/list"]);
        assert_eq!(lookup(&root, "/user/list"), Some("/user/list"));
        assert_eq!(lookup(&root, "/user/42"), Some("/user/:id"));
    }

    #[test]
    fn test_literal_and_wild_are_distinct_children() {
        let root = build(&["/hello/:name", "/hello/b/c"]);
        let hello = &root.children()[0];
        assert_eq!(hello.children().len(), 2);
        assert_eq!(lookup(&root, "/hello/b/c"), Some("/hello/b/c"));
        assert_eq!(lookup(&root, "/hello/geek"), Some("/hello/:name"));
        assert!(lookup(&root, "/hello/geek/c").is_none());
    }

    #[test]
    fn test_params_share_node_by_marker() {
        let root = build(&["/p/:lang/doc", "/p/:name/intro"]);
        let p = &root.children()[0];
        assert_eq!(p.children().len(), 1);
        assert_eq!(p.children()[0].part(), ":lang");
        assert_eq!(lookup(&root, "/p/go/intro"), Some("/p/:name/intro"));
    }

    #[test]
    fn test_insert_reports_displaced_pattern() {
        let mut root = Node::default();
        assert_eq!(root.insert("/p/:a", &parse("/p/:a"), 0), None);
        assert_eq!(root.insert("/p/:a", &parse("/p/:a"), 0), None);
        assert_eq!(
            root.insert("/p/:b", &parse("/p/:b"), 0),
            Some("/p/:a".to_string())
        );
        assert_eq!(lookup(&root, "/p/x"), Some("/p/:b"));
    }

    #[test]
    fn test_backtracks_to_wild_sibling() {
        let root = build(&["/user/list", "/user/:id/edit"]);
        assert_eq!(lookup(&root, "/user/list/edit"), Some("/user/:id/edit"));
    }

    #[test]
    fn test_wildcard_consumes_rest() {
        let root = build(&["/assets/*filepath"]);
        assert_eq!(
            lookup(&root, "/assets/css/site/style.css"),
            Some("/assets/*filepath")
        );
        assert!(lookup(&root, "/assets").is_none());
    }

    #[test]
    fn test_root_route() {
        let root = build(&["/"]);
        assert_eq!(lookup(&root, "/"), Some("/"));
        assert!(lookup(&root, "/x").is_none());
    }
}
