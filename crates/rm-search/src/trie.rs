//! Character trie over normalized names.
//!
//! Trie nodes live in one arena vector and refer to their children by
//! index, so the whole index is a couple of flat allocations and drops in
//! O(n) without recursion.  Normalized names are ASCII, so edges are keyed
//! by byte.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::normalize::clean_name;
use crate::{SearchError, SearchResult};

const ROOT: usize = 0;

#[derive(Clone, Debug, Default)]
struct TrieNode {
    children: FxHashMap<u8, u32>,
    /// Original-case names whose normalized form ends here, in insertion
    /// order.  Non-empty exactly when the node is terminal.
    names: Vec<String>,
}

/// Prefix → full-name index for autocomplete.
///
/// # Example
///
/// ```
/// use rm_search::PrefixIndex;
///
/// let mut index = PrefixIndex::new();
/// index.insert("Top Dog");
/// index.insert("Toyota of Berkeley");
/// index.insert("Berkeley Bowl");
///
/// let mut hits = index.lookup("to");
/// hits.sort();
/// assert_eq!(hits, vec!["Top Dog", "Toyota of Berkeley"]);
/// ```
#[derive(Clone, Debug)]
pub struct PrefixIndex {
    nodes: Vec<TrieNode>,
    len: usize,
}

impl Default for PrefixIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::default()], len: 0 }
    }

    /// Number of names inserted, counting duplicates.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index `name` under its normalized form.  Inserting the same name
    /// twice stores it twice.
    pub fn insert(&mut self, name: &str) {
        let key = clean_name(name);
        let mut at = ROOT;
        for b in key.bytes() {
            let existing = self.nodes[at].children.get(&b).copied();
            at = match existing {
                Some(child) => child as usize,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[at].children.insert(b, child as u32);
                    child
                }
            };
        }
        self.nodes[at].names.push(name.to_owned());
        self.len += 1;
    }

    /// Every stored name whose normalized form starts with the normalized
    /// `prefix`.
    ///
    /// Results have set semantics: each insertion appears once, in no
    /// particular order.  An unknown prefix and a prefix with no names
    /// beneath it both give an empty vector.  `lookup("")` returns every
    /// name in the index.
    pub fn lookup(&self, prefix: &str) -> Vec<&str> {
        let Some(start) = self.descend(&clean_name(prefix)) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        let mut stack = vec![start];
        while let Some(at) = stack.pop() {
            let node = &self.nodes[at];
            found.extend(node.names.iter().map(String::as_str));
            stack.extend(node.children.values().map(|&c| c as usize));
        }
        trace!(prefix, matches = found.len(), "prefix lookup");
        found
    }

    /// [`lookup`](Self::lookup) for callers whose prefix may be absent.
    pub fn try_lookup(&self, prefix: Option<&str>) -> SearchResult<Vec<&str>> {
        prefix.map(|p| self.lookup(p)).ok_or(SearchError::InvalidArgument("prefix"))
    }

    /// `true` if some inserted name normalizes exactly to `name`'s
    /// normalized form.
    pub fn contains_exact(&self, name: &str) -> bool {
        self.descend(&clean_name(name)).is_some_and(|at| !self.nodes[at].names.is_empty())
    }

    fn descend(&self, key: &str) -> Option<usize> {
        key.bytes().try_fold(ROOT, |at, b| self.nodes[at].children.get(&b).map(|&c| c as usize))
    }
}

impl<S: AsRef<str>> Extend<S> for PrefixIndex {
    fn extend<I: IntoIterator<Item = S>>(&mut self, names: I) {
        for name in names {
            self.insert(name.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for PrefixIndex {
    fn from_iter<I: IntoIterator<Item = S>>(names: I) -> Self {
        let mut index = Self::new();
        index.extend(names);
        index
    }
}
