//! AVL-balanced ordered map.
//!
//! Each node owns its children outright, so the tree is acyclic by
//! construction. After every insertion the heights along the insertion path
//! are recomputed bottom-up and a single or double rotation restores the
//! balance invariant: at every node the subtree heights differ by at most one.
//!
//! There is no removal.

use std::cmp::Ordering;

type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Debug, Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    height: usize,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// Left height minus right height.
    fn balance(&self) -> isize {
        to_isize(height(&self.left)) - to_isize(height(&self.right))
    }
}

fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

// Tree heights are logarithmic in the node count.
#[allow(clippy::cast_possible_wrap)]
fn to_isize(h: usize) -> isize {
    h as isize
}

fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

/// Returns the new subtree root and whether a new key was added.
fn insert_at<K: Ord, V>(link: Link<K, V>, key: K, value: V) -> (Box<Node<K, V>>, bool) {
    let Some(mut node) = link else {
        return (Node::leaf(key, value), true);
    };

    match key.cmp(&node.key) {
        Ordering::Less => {
            let (child, added) = insert_at(node.left.take(), key, value);
            node.left = Some(child);
            if added {
                (rebalance_after(node, Side::Left), true)
            } else {
                (node, false)
            }
        }
        Ordering::Greater => {
            let (child, added) = insert_at(node.right.take(), key, value);
            node.right = Some(child);
            if added {
                (rebalance_after(node, Side::Right), true)
            } else {
                (node, false)
            }
        }
        Ordering::Equal => {
            node.value = value;
            (node, false)
        }
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Rebalance after an insertion into the `side` subtree. The inserted key's
/// position relative to that child is read off the child's own balance,
/// which after a single insertion leans toward the newly added key.
fn rebalance_after<K: Ord, V>(mut node: Box<Node<K, V>>, side: Side) -> Box<Node<K, V>> {
    node.update_height();
    let balance = node.balance();
    match side {
        Side::Left if balance > 1 => {
            if node.left.as_ref().is_some_and(|l| l.balance() < 0) {
                node.left = node.left.take().map(rotate_left);
            }
            rotate_right(node)
        }
        Side::Right if balance < -1 => {
            if node.right.as_ref().is_some_and(|r| r.balance() > 0) {
                node.right = node.right.take().map(rotate_right);
            }
            rotate_left(node)
        }
        _ => node,
    }
}

#[derive(Debug, Clone)]
pub struct AvlMap<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K, V> Default for AvlMap<K, V> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<K: Ord, V> AvlMap<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value stored under `key`.
    pub fn insert(&mut self, key: K, value: V) {
        let (root, added) = insert_at(self.root.take(), key, value);
        self.root = Some(root);
        if added {
            self.len += 1;
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let mut current = self.root.as_ref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left.as_ref(),
                Ordering::Greater => node.right.as_ref(),
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut current = self.root.as_mut();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left.as_mut(),
                Ordering::Greater => node.right.as_mut(),
                Ordering::Equal => return Some(&mut node.value),
            };
        }
        None
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; zero when empty.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(self.root.as_deref());
        iter
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// Whether every node satisfies the AVL balance rule and carries the
    /// correct height.
    pub fn is_balanced(&self) -> bool {
        fn check<K, V>(link: &Link<K, V>) -> Option<usize> {
            let Some(node) = link else {
                return Some(0);
            };
            let left = check(&node.left)?;
            let right = check(&node.right)?;
            let expected = 1 + left.max(right);
            (left.abs_diff(right) <= 1 && node.height == expected).then_some(expected)
        }
        check(&self.root).is_some()
    }
}

impl<K: Ord + Clone, V: Default> AvlMap<K, V> {
    /// Value stored under `key`, inserting `V::default()` first if the key is
    /// absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V {
        if !self.contains(&key) {
            self.insert(key.clone(), V::default());
        }
        slot(&mut self.root, key)
    }
}

/// Descend to `key` and return its value slot.
///
/// A leaf made here is neither counted nor rebalanced, so `key` must already
/// be in the tree; the closure only keeps the descent total.
fn slot<K: Ord + Clone, V: Default>(link: &mut Link<K, V>, key: K) -> &mut V {
    let node = link.get_or_insert_with(|| Node::leaf(key.clone(), V::default()));
    match key.cmp(&node.key) {
        Ordering::Less => slot(&mut node.left, key),
        Ordering::Greater => slot(&mut node.right, key),
        Ordering::Equal => &mut node.value,
    }
}

/// In-order iterator over an [`AvlMap`].
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn push_left(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some((&node.key, &node.value))
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a AvlMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<V>(map: &AvlMap<u32, V>) -> Vec<u32> {
        map.keys().copied().collect()
    }

    #[test]
    fn test_ascending_inserts_stay_balanced() {
        let mut map = AvlMap::new();
        for k in 0..1_000u32 {
            map.insert(k, k * 2);
            assert!(map.is_balanced(), "unbalanced after inserting {k}");
        }
        assert_eq!(map.len(), 1_000);
        // An AVL tree of 1000 nodes is at most ~1.44 log2(1000) high.
        assert!(map.height() <= 14, "height {}", map.height());
    }

    #[test]
    fn test_descending_inserts_stay_balanced() {
        let mut map = AvlMap::new();
        for k in (0..500u32).rev() {
            map.insert(k, ());
        }
        assert!(map.is_balanced());
        assert_eq!(keys(&map), (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn test_scrambled_inserts_stay_balanced() {
        let mut map = AvlMap::new();
        // 7919 is prime, so this visits every residue exactly once.
        for i in 0..2_000u32 {
            let k = (i * 7919) % 2_000;
            map.insert(k, i);
        }
        assert!(map.is_balanced());
        assert_eq!(map.len(), 2_000);
        assert_eq!(keys(&map), (0..2_000).collect::<Vec<_>>());
    }

    #[test]
    fn test_double_rotations() {
        // Left-right at the root.
        let mut map = AvlMap::new();
        for k in [30, 10, 20] {
            map.insert(k, ());
        }
        assert!(map.is_balanced());
        assert_eq!(map.height(), 2);
        assert_eq!(map.root.as_ref().unwrap().key, 20);

        // Right-left at the root.
        let mut map = AvlMap::new();
        for k in [10, 30, 20] {
            map.insert(k, ());
        }
        assert_eq!(map.height(), 2);
        assert_eq!(map.root.as_ref().unwrap().key, 20);
    }

    #[test]
    fn test_insert_existing_key_overwrites() {
        let mut map = AvlMap::new();
        map.insert("Drama".to_string(), 1);
        map.insert("Drama".to_string(), 2);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&"Drama".to_string()), Some(&2));
    }

    #[test]
    fn test_get_or_insert_default() {
        let mut map: AvlMap<String, Vec<u32>> = AvlMap::new();
        map.get_or_insert_default("Action".to_string()).push(1);
        map.get_or_insert_default("Action".to_string()).push(2);
        map.get_or_insert_default("Comedy".to_string());
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&"Action".to_string()), Some(&vec![1, 2]));
        assert_eq!(map.get(&"Comedy".to_string()), Some(&Vec::new()));
        assert!(map.is_balanced());
    }

    #[test]
    fn test_get_or_insert_default_keeps_balance() {
        let mut map: AvlMap<u32, u32> = AvlMap::new();
        for i in 0..600u32 {
            *map.get_or_insert_default(i % 300) += 1;
        }
        assert_eq!(map.len(), 300);
        assert!(map.is_balanced());
        assert!(map.iter().all(|(_, &count)| count == 2));
    }

    #[test]
    fn test_missing_key() {
        let mut map: AvlMap<u32, u32> = AvlMap::new();
        assert!(map.get(&3).is_none());
        assert!(map.get_mut(&3).is_none());
        assert!(!map.contains(&3));
        assert_eq!(map.height(), 0);
        assert!(map.is_balanced());
    }

    #[test]
    fn test_clear() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
    }
}
