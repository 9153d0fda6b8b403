//! Shared depth-first traversal used by every analyzer.

use super::{Document, Node};

/// One node visit, with the slash path leading to it.
#[derive(Debug, Clone)]
pub struct Visit<'a> {
    pub node: &'a Node,
    /// Root nodes have an empty path; children append `/<name or id>`.
    pub path: String,
    pub depth: usize,
}

/// Visit every node of the document exactly once, parents before children,
/// in document order.
///
/// The walker keeps no state of its own: callers own their accumulators, so
/// independent documents can be walked concurrently.
pub fn walk<'a, F>(document: &'a Document, mut visit: F)
where
    F: FnMut(&Visit<'a>),
{
    let mut stack: Vec<Visit<'a>> = document
        .roots()
        .iter()
        .rev()
        .map(|node| Visit {
            node,
            path: String::new(),
            depth: 0,
        })
        .collect();

    while let Some(current) = stack.pop() {
        visit(&current);

        for child in current.node.children.iter().rev() {
            stack.push(Visit {
                node: child,
                path: format!("{}/{}", current.path, label(child)),
                depth: current.depth + 1,
            });
        }
    }
}

fn label(node: &Node) -> &str {
    node.name
        .as_deref()
        .or(node.id.as_deref())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn visit_ids(document: &Document) -> Vec<(String, String, usize)> {
        let mut seen = Vec::new();
        walk(document, |v| {
            seen.push((
                v.node.id.clone().unwrap_or_default(),
                v.path.clone(),
                v.depth,
            ))
        });
        seen
    }

    #[test]
    fn test_walk_is_preorder() {
        let doc = Document::from(json!({
            "document": {
                "id": "root",
                "name": "Page",
                "children": [
                    {"id": "a", "name": "Header", "children": [{"id": "a1"}]},
                    {"id": "b", "children": null}
                ]
            }
        }));

        let seen = visit_ids(&doc);
        assert_eq!(
            seen,
            vec![
                ("root".to_string(), "".to_string(), 0),
                ("a".to_string(), "/Header".to_string(), 1),
                ("a1".to_string(), "/Header/a1".to_string(), 2),
                ("b".to_string(), "/b".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_walk_multiple_roots() {
        let doc = Document::from(json!([
            {"id": "1", "children": [{"id": "1a"}]},
            {"id": "2"}
        ]));
        let ids: Vec<_> = visit_ids(&doc).into_iter().map(|(id, _, _)| id).collect();
        assert_eq!(ids, vec!["1", "1a", "2"]);
    }

    #[test]
    fn test_walk_empty_document() {
        let mut count = 0;
        walk(&Document::Empty, |_| count += 1);
        assert_eq!(count, 0);
    }
}
