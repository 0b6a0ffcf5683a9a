//! AVL tree mapping route keys to occurrence counts.
//!
//! Every node owns its children outright; rotations move ownership of the
//! boxed subtrees rather than re-pointing shared references. In-order
//! traversal uses an explicit stack.

use std::cmp::Ordering;

type Link = Option<Box<Node>>;

#[derive(Debug, Clone)]
struct Node {
    key: String,
    count: u64,
    height: u32,
    left: Link,
    right: Link,
}

impl Node {
    fn leaf(key: String) -> Box<Self> {
        Box::new(Self {
            key,
            count: 1,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }
}

fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// Self-balancing ordered store of `key -> count`.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTree {
    root: Link,
    len: usize,
}

impl FrequencyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree; zero when empty.
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// Count stored for `key`, if present.
    pub fn get(&self, key: &str) -> Option<u64> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(node.key.as_str()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(node.count),
            };
        }
        None
    }

    /// Bump the count for `key`, inserting it with count 1 when absent.
    ///
    /// Existing keys are updated in place; only novel keys trigger
    /// rebalancing. Returns the updated count.
    pub fn increment(&mut self, key: &str) -> u64 {
        if let Some(node) = self.find_mut(key) {
            node.count += 1;
            return node.count;
        }
        self.root = Some(insert(self.root.take(), key.to_string()));
        self.len += 1;
        1
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> InOrder<'_> {
        let mut iter = InOrder { stack: Vec::new() };
        iter.push_left(self.root.as_deref());
        iter
    }

    /// Whether every node satisfies the AVL height invariant and stores a
    /// consistent height.
    pub fn is_balanced(&self) -> bool {
        checked_height(&self.root).is_some()
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    fn find_mut(&mut self, key: &str) -> Option<&mut Node> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match key.cmp(node.key.as_str()) {
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
                Ordering::Equal => return Some(node),
            }
        }
        None
    }
}

fn insert(link: Link, key: String) -> Box<Node> {
    let Some(mut node) = link else {
        return Node::leaf(key);
    };

    match key.cmp(&node.key) {
        Ordering::Less => node.left = Some(insert(node.left.take(), key)),
        Ordering::Greater => node.right = Some(insert(node.right.take(), key)),
        Ordering::Equal => {
            node.count += 1;
            return node;
        }
    }

    rebalance(node)
}

fn rebalance(mut node: Box<Node>) -> Box<Node> {
    node.update_height();
    let balance = node.balance();

    if balance > 1 {
        if node.left.as_ref().is_some_and(|left| left.balance() < 0) {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if balance < -1 {
        if node.right.as_ref().is_some_and(|right| right.balance() > 0) {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

fn checked_height(link: &Link) -> Option<u32> {
    let Some(node) = link else {
        return Some(0);
    };
    let left = checked_height(&node.left)?;
    let right = checked_height(&node.right)?;
    let expected = 1 + left.max(right);
    if left.abs_diff(right) > 1 || node.height != expected {
        return None;
    }
    Some(expected)
}

/// In-order iterator over `(key, count)` pairs.
#[derive(Debug)]
pub struct InOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> InOrder<'a> {
    fn push_left(&mut self, mut link: Option<&'a Node>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = (&'a str, u64);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some((node.key.as_str(), node.count))
    }
}
