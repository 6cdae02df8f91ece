//! Parent/child inventory containment store
//!
//! Tracks which folder every inventory node lives in and the reverse
//! (children-of) index. Updates arrive from the network in no particular
//! order, so a node may name a parent the store has not seen yet; the store
//! then records a placeholder under the root and repairs the tree when the
//! parent's own record arrives.
//!
//! The whole node table sits behind a single coarse read/write lock rather
//! than finer-grained per-node locking, which keeps the containment and
//! reverse indexes consistent under one acquisition and avoids lock-ordering
//! hazards when the store is used next to other locked structures.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::RwLock;

use crate::error::{GridlinkError, Result};

#[derive(Debug)]
struct Node<K, V> {
    parent: Option<K>,
    children: HashSet<K>,
    /// `None` for a placeholder created before the node's data arrived
    value: Option<V>,
}

/// Thread-safe parent/child store keyed by `K`
#[derive(Debug)]
pub struct InventoryStore<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    root: K,
    nodes: RwLock<HashMap<K, Node<K, V>>>,
}

impl<K, V> InventoryStore<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    /// Create a store with the given root folder key
    pub fn new(root: K) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            root.clone(),
            Node {
                parent: None,
                children: HashSet::new(),
                value: None,
            },
        );

        Self {
            root,
            nodes: RwLock::new(nodes),
        }
    }

    /// The root folder key
    pub fn root(&self) -> &K {
        &self.root
    }

    /// Insert a node's record, or update it if it already exists
    ///
    /// If `parent` is unknown, a placeholder parent is created under the root
    /// so the subtree stays reachable; the placeholder is filled in when the
    /// parent's own record arrives. If the node already exists under a
    /// different parent, it is moved.
    pub fn upsert(&self, key: K, parent: K, value: V) {
        let mut nodes = self.nodes.write().unwrap();

        if !nodes.contains_key(&parent) {
            // No data on the parent yet; fake it and wait for the real record.
            nodes.insert(
                parent.clone(),
                Node {
                    parent: Some(self.root.clone()),
                    children: HashSet::new(),
                    value: None,
                },
            );
            nodes
                .get_mut(&self.root)
                .expect("root always present")
                .children
                .insert(parent.clone());
        }

        if let Some(node) = nodes.get_mut(&key) {
            node.value = Some(value);
            let old_parent = node.parent.clone();
            let moved = old_parent.as_ref() != Some(&parent);
            if moved {
                node.parent = Some(parent.clone());
                if let Some(old_parent) = old_parent {
                    if let Some(old) = nodes.get_mut(&old_parent) {
                        old.children.remove(&key);
                    }
                }
                nodes
                    .get_mut(&parent)
                    .expect("parent ensured above")
                    .children
                    .insert(key);
            }
            return;
        }

        nodes.insert(
            key.clone(),
            Node {
                parent: Some(parent.clone()),
                children: HashSet::new(),
                value: Some(value),
            },
        );
        nodes
            .get_mut(&parent)
            .expect("parent ensured above")
            .children
            .insert(key);
    }

    /// Fetch a node's value, if its record has arrived
    pub fn get(&self, key: &K) -> Option<V> {
        let nodes = self.nodes.read().unwrap();
        nodes.get(key).and_then(|node| node.value.clone())
    }

    /// True iff the node is known, even as a placeholder
    pub fn contains(&self, key: &K) -> bool {
        self.nodes.read().unwrap().contains_key(key)
    }

    /// The node's current parent key
    pub fn parent_of(&self, key: &K) -> Option<K> {
        let nodes = self.nodes.read().unwrap();
        nodes.get(key).and_then(|node| node.parent.clone())
    }

    /// Keys of the node's direct children
    pub fn children_of(&self, key: &K) -> Vec<K> {
        let nodes = self.nodes.read().unwrap();
        nodes
            .get(key)
            .map(|node| node.children.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Move a node under a new parent
    pub fn reparent(&self, key: &K, new_parent: &K) -> Result<()> {
        let mut nodes = self.nodes.write().unwrap();

        if !nodes.contains_key(key) {
            return Err(GridlinkError::not_found("inventory node", format!("{:?}", key)));
        }
        if !nodes.contains_key(new_parent) {
            return Err(GridlinkError::not_found(
                "inventory node",
                format!("{:?}", new_parent),
            ));
        }

        let old_parent = nodes
            .get_mut(key)
            .and_then(|node| node.parent.replace(new_parent.clone()));
        if let Some(old_parent) = old_parent {
            if let Some(old) = nodes.get_mut(&old_parent) {
                old.children.remove(key);
            }
        }
        nodes
            .get_mut(new_parent)
            .expect("checked above")
            .children
            .insert(key.clone());
        Ok(())
    }

    /// Remove a node and everything beneath it, returning how many nodes
    /// were removed. Removing the root is rejected.
    pub fn remove_subtree(&self, key: &K) -> Result<usize> {
        if key == &self.root {
            return Err(GridlinkError::invalid_parameter(
                "key",
                "The root folder cannot be removed",
            ));
        }

        let mut nodes = self.nodes.write().unwrap();
        if !nodes.contains_key(key) {
            return Err(GridlinkError::not_found("inventory node", format!("{:?}", key)));
        }

        let mut pending = vec![key.clone()];
        let mut removed = 0;
        while let Some(current) = pending.pop() {
            if let Some(node) = nodes.remove(&current) {
                removed += 1;
                pending.extend(node.children.into_iter());
                if removed == 1 {
                    if let Some(parent) = node.parent {
                        if let Some(parent_node) = nodes.get_mut(&parent) {
                            parent_node.children.remove(&current);
                        }
                    }
                }
            }
        }
        Ok(removed)
    }

    /// Total known nodes, placeholders and root included
    pub fn len(&self) -> usize {
        self.nodes.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        // The root is always present.
        self.len() <= 1
    }
}
