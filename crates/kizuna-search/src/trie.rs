//! Case-insensitive prefix index over item names.
//!
//! Nodes live in a single arena and refer to their children by arena
//! position, so the structure never holds pointers into anything it does not
//! own. Values are whatever the caller wants to get back for a name; the
//! catalog indices store [`ItemIndex`](kizuna_core::ItemIndex) handles.

use std::collections::HashMap;

const ROOT: usize = 0;

#[derive(Debug, Clone)]
struct TrieNode<T> {
    /// Unordered; suggestion order follows this map's iteration order.
    children: HashMap<char, usize>,
    /// Every inserted name that folds to this node, in insertion order.
    terminals: Vec<Terminal<T>>,
}

impl<T> Default for TrieNode<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            terminals: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct Terminal<T> {
    name: String,
    value: T,
}

impl<T: Clone> Terminal<T> {
    fn suggestion(&self) -> Suggestion<T> {
        Suggestion {
            name: self.name.clone(),
            value: self.value.clone(),
        }
    }
}

/// A completion returned by a prefix query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion<T> {
    /// The name as it was inserted, original case preserved.
    pub name: String,
    pub value: T,
}

#[derive(Debug, Clone)]
pub struct PrefixIndex<T> {
    nodes: Vec<TrieNode<T>>,
    len: usize,
}

impl<T> Default for PrefixIndex<T> {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            len: 0,
        }
    }
}

fn fold(text: &str) -> String {
    text.to_lowercase()
}

impl<T: Clone> PrefixIndex<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `name` under its lowercase form.
    ///
    /// Names that differ only in case share a node but stay separate
    /// entries. Inserting a name that is already present, case included,
    /// replaces its value.
    pub fn insert(&mut self, name: &str, value: T) {
        let mut current = ROOT;
        for c in fold(name).chars() {
            current = match self.nodes[current].children.get(&c) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[current].children.insert(c, next);
                    next
                }
            };
        }

        let terminals = &mut self.nodes[current].terminals;
        if let Some(existing) = terminals.iter_mut().find(|t| t.name == name) {
            log::debug!("prefix index entry {name:?} replaced");
            existing.value = value;
        } else {
            if let Some(other) = terminals.first() {
                log::debug!("prefix index entry {name:?} shares a node with {:?}", other.name);
            }
            terminals.push(Terminal {
                name: name.to_string(),
                value,
            });
            self.len += 1;
        }
    }

    /// Exact lookup, ignoring case.
    ///
    /// When several names fold to `name`, the one spelled exactly like
    /// `name` wins, then the earliest inserted.
    pub fn search(&self, name: &str) -> Option<&T> {
        let terminals = &self.nodes[self.walk(name)?].terminals;
        terminals
            .iter()
            .find(|t| t.name == name)
            .or_else(|| terminals.first())
            .map(|t| &t.value)
    }

    /// Every entry whose name matches `name` ignoring case, in insertion
    /// order.
    pub fn search_all(&self, name: &str) -> Vec<Suggestion<T>> {
        self.walk(name)
            .map(|node| self.nodes[node].terminals.iter().map(Terminal::suggestion).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.search(name).is_some()
    }

    /// Every entry whose folded name starts with the folded `prefix`.
    ///
    /// Order is unspecified. An unmatched prefix yields an empty list; an
    /// empty prefix yields everything.
    pub fn get_suggestions(&self, prefix: &str) -> Vec<Suggestion<T>> {
        let Some(start) = self.walk(prefix) else {
            return Vec::new();
        };

        let mut suggestions = Vec::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            let node = &self.nodes[node];
            suggestions.extend(node.terminals.iter().map(Terminal::suggestion));
            stack.extend(node.children.values().copied());
        }
        suggestions
    }

    /// Like [`Self::get_suggestions`], sorted by name ignoring case and cut
    /// to at most `limit` entries.
    pub fn get_suggestions_sorted(&self, prefix: &str, limit: usize) -> Vec<Suggestion<T>> {
        let mut suggestions = self.get_suggestions(prefix);
        suggestions.sort_by_cached_key(|s| (fold(&s.name), s.name.clone()));
        suggestions.truncate(limit);
        suggestions
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of arena nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn walk(&self, text: &str) -> Option<usize> {
        let mut current = ROOT;
        for c in fold(text).chars() {
            current = *self.nodes[current].children.get(&c)?;
        }
        Some(current)
    }
}
