//! Renders a tree as ascii art, for debugging:
//! ```text
//!    __4,:__
//!   /       \
//! -∞,:4   4,4:
//! ```
//! Every node is printed as `key,interval`, followed by `,{segments}` if its
//! canonical subset isn't empty.

use std::fmt::Display;

use super::*;

/// A rendered subtree: its lines, all of the same width, and the column of its root.
struct Block {
    lines: Vec<String>,
    width: usize,
    middle: usize,
}

/// The label of a single node.
pub fn label<'a, K, N>(node: N) -> String
where
    K: Key + Display + 'a,
    N: SomeNode<'a, K>,
{
    let mut res = format!("{},{}", node.key(), node.interval());
    if !node.can().is_empty() {
        let segments: Vec<String> = node.can().iter().map(|segment| segment.to_string()).collect();
        res.push_str(&format!(",{{{}}}", segments.join(", ")));
    }
    res
}

/// Renders the tree rooted at `root`. Lines are separated by `\n`.
pub fn render<'a, K, N>(root: N) -> String
where
    K: Key + Display + 'a,
    N: SomeNode<'a, K>,
{
    render_block(root).lines.join("\n")
}

fn spaces(n: usize) -> String {
    " ".repeat(n)
}

fn render_block<'a, K, N>(node: N) -> Block
where
    K: Key + Display + 'a,
    N: SomeNode<'a, K>,
{
    let label = label(node);
    // widths in chars, since the infinity signs aren't ascii
    let u = label.chars().count();
    let (left, right) = match (node.left(), node.right()) {
        (Some(left), Some(right)) => (render_block(left), render_block(right)),
        _ => {
            return Block {
                lines: vec![label],
                width: u,
                middle: u / 2,
            }
        }
    };
    let (n, x) = (left.width, left.middle);
    let (m, y) = (right.width, right.middle);

    let first_line = format!(
        "{}{}{}{}{}",
        spaces(x + 1),
        "_".repeat(n - x - 1),
        label,
        "_".repeat(y),
        spaces(m - y)
    );
    let second_line = format!("{}/{}\\{}", spaces(x), spaces(n - x - 1 + u + y), spaces(m - y - 1));

    let height = std::cmp::max(left.lines.len(), right.lines.len());
    let mut lines = vec![first_line, second_line];
    for i in 0..height {
        let a = left.lines.get(i).cloned().unwrap_or_else(|| spaces(n));
        let b = right.lines.get(i).cloned().unwrap_or_else(|| spaces(m));
        lines.push(format!("{}{}{}", a, spaces(u), b));
    }
    Block {
        lines,
        width: n + m + u,
        middle: n + u / 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trees::ZipTreap;

    #[test]
    fn single_leaf() {
        let treap = ZipTreap::<i32>::new();
        assert_eq!(render(treap.root_node()), "-∞,:");
    }

    #[test]
    fn one_inner_node() {
        let mut treap = ZipTreap::new();
        let segment = Interval::finite(4, 9).unwrap();
        treap.insert_inner_and_leaf(4, Priority::Drawn(3), &segment);
        let rendered = render(treap.root_node());
        let lines: Vec<&str> = rendered.lines().map(|line| line.trim_end()).collect();
        assert_eq!(lines, vec!["   __4,:__", "  /       \\", "-∞,:4   4,4:"]);
    }

    #[test]
    fn label_shows_segments() {
        let mut treap = ZipTreap::new();
        let segment = Interval::finite(4, 9).unwrap();
        treap.insert_inner_and_leaf(4, Priority::Drawn(3), &segment);
        treap.insert_inner_and_leaf(9, Priority::Drawn(2), &segment);
        treap.add_segment_to_cans(&segment);
        let leaf = find_leaf(treap.root_node(), &Point::Finite(5));
        assert_eq!(label(leaf), "4,4:9,{4:9}");
    }
}
