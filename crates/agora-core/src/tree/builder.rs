use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

use super::{ReplyAffordance, SortOption, Threaded};
use crate::value_objects::Snowflake;

/// One entry of the reply forest
#[derive(Debug)]
pub struct TreeNode<T> {
    pub item: T,
    /// 0 for roots
    pub depth: usize,
    /// Set by [`super::ReplyDepthPolicy::annotate`]
    pub reply: Option<ReplyAffordance>,
    pub children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    /// Number of entries in this subtree, itself included
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(entry) = stack.pop() {
            count += 1;
            stack.extend(entry.children.iter());
        }
        count
    }
}

// Unlink descendants onto a heap stack so each entry drops with no children.
impl<T> Drop for TreeNode<T> {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut entry) = stack.pop() {
            stack.append(&mut entry.children);
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlatEntry<'a, T> {
    #[serde(flatten)]
    item: &'a T,
    depth: usize,
    #[serde(flatten)]
    reply: Option<ReplyAffordance>,
}

/// Serialize a forest as one flat list in display order (pre-order, siblings
/// in sorted order). Each entry carries its `depth`; nesting is recovered from
/// the item's parent id. Serde nesting would recurse once per level, so the
/// forest is never written as nested arrays.
///
/// # Errors
/// Returns the serializer's error
pub fn serialize_preorder<T, S>(forest: &[TreeNode<T>], serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(forest.iter().map(TreeNode::size).sum()))?;
    let mut stack: Vec<&TreeNode<T>> = forest.iter().rev().collect();
    while let Some(entry) = stack.pop() {
        seq.serialize_element(&FlatEntry {
            item: &entry.item,
            depth: entry.depth,
            reply: entry.reply,
        })?;
        stack.extend(entry.children.iter().rev());
    }
    seq.end()
}

/// Build an ordered reply forest from a flat list.
///
/// Items whose parent is absent from the list become roots. Siblings are
/// ordered by `sort` with a stable sort at every level. The walk uses explicit
/// stacks, so arbitrarily deep threads do not grow the call stack. Items caught
/// in a parent cycle are never reachable from a root and are left out.
pub fn build_tree<T: Threaded>(items: Vec<T>, sort: SortOption) -> Vec<TreeNode<T>> {
    let mut index: HashMap<Snowflake, usize> = HashMap::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        index.entry(item.id()).or_insert(position);
    }

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
    for (position, item) in items.iter().enumerate() {
        match item.parent_id().and_then(|parent| index.get(&parent)) {
            Some(&parent) => children[parent].push(position),
            None => roots.push(position),
        }
    }

    let by_sort = |a: &usize, b: &usize| sort.compare(&items[*a], &items[*b]);
    roots.sort_by(by_sort);
    for siblings in &mut children {
        siblings.sort_by(by_sort);
    }

    // Pre-order walk; each position has a single parent so none is visited twice.
    let mut order: Vec<(usize, usize)> = Vec::with_capacity(items.len());
    let mut stack: Vec<(usize, usize)> = roots.iter().rev().map(|&root| (root, 0)).collect();
    while let Some((position, depth)) = stack.pop() {
        order.push((position, depth));
        stack.extend(children[position].iter().rev().map(|&child| (child, depth + 1)));
    }

    // Assemble bottom-up: in reverse pre-order every child is built before its parent.
    let mut pending: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut built: Vec<Option<TreeNode<T>>> = std::iter::repeat_with(|| None)
        .take(pending.len())
        .collect();
    for &(position, depth) in order.iter().rev() {
        let Some(item) = pending[position].take() else {
            continue;
        };
        let kids = children[position]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[position] = Some(TreeNode {
            item,
            depth,
            reply: None,
            children: kids,
        });
    }

    roots
        .iter()
        .filter_map(|&root| built[root].take())
        .collect()
}
