//! Chained hash table keyed by strings.
//!
//! The bucket count is fixed at construction and the hash is the sum of the
//! key's character codes modulo that count. Collisions are resolved by
//! chaining, so lookups degrade to a linear scan of one bucket.

/// Bucket count used by [`ChainedHashMap::default`].
pub const DEFAULT_BUCKETS: usize = 10;

/// String-keyed hash map with separate chaining.
#[derive(Debug, Clone)]
pub struct ChainedHashMap<V> {
    buckets: Vec<Vec<(String, V)>>,
    len: usize,
}

impl<V> Default for ChainedHashMap<V> {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKETS)
    }
}

impl<V> ChainedHashMap<V> {
    /// Create a table with `buckets` chains (at least one).
    pub fn new(buckets: usize) -> Self {
        let count = buckets.max(1);
        let mut chains = Vec::with_capacity(count);
        chains.resize_with(count, Vec::new);
        Self {
            buckets: chains,
            len: 0,
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bucket index for `key`.
    pub fn bucket_of(&self, key: &str) -> usize {
        let sum = key
            .chars()
            .fold(0u64, |acc, ch| acc.wrapping_add(u64::from(u32::from(ch))));
        (sum % self.buckets.len() as u64) as usize
    }

    /// Insert or overwrite the value stored under `key`.
    ///
    /// Returns the previous value when the key was already present.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let index = self.bucket_of(&key);
        let chain = &mut self.buckets[index];
        if let Some(slot) = chain.iter_mut().find(|(existing, _)| *existing == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        chain.push((key, value));
        self.len += 1;
        None
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All entries in bucket order, then insertion order within a bucket.
    pub fn items(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.buckets
            .iter()
            .flat_map(|chain| chain.iter().map(|(key, value)| (key.as_str(), value)))
    }

    /// Length of the longest chain.
    pub fn max_chain_len(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }
}
