use super::types::OperationRecord;
use indexmap::IndexMap;
use std::hash::Hash;

/// Bucket key for operations whose path has no segment at the entity index.
pub const ROOT_ENTITY: &str = "root";

/// Operations bucketed by entity, in first-seen order.
pub type EntityBuckets<'a> = IndexMap<String, Vec<&'a OperationRecord>>;

/// Partition `items` by `key_fn`.
///
/// Buckets appear in the order their key is first produced and items keep
/// their relative order inside a bucket.
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, mut key_fn: F) -> IndexMap<K, Vec<T>>
where
    K: Hash + Eq,
    F: FnMut(&T) -> K,
{
    let mut buckets: IndexMap<K, Vec<T>> = IndexMap::new();
    for item in items {
        buckets.entry(key_fn(&item)).or_default().push(item);
    }
    buckets
}

/// Segment `index` of `path` split on `/`. Index 0 is the empty string
/// before the leading slash, so the default of 1 picks `users` in `/users/:id`.
pub fn entity_key(path: &str, index: usize) -> String {
    match path.split('/').nth(index) {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => ROOT_ENTITY.to_string(),
    }
}

pub fn group_by_entity(operations: &[OperationRecord], index: usize) -> EntityBuckets<'_> {
    group_by(operations.iter(), |op| entity_key(&op.path, index))
}
