//! Vec-backed storage keyed by small integer ids.

use std::marker::PhantomData;

/// An id that is a position in some dense table.
pub trait Index: From<usize> + Copy {
    fn index(&self) -> usize;
}

/// Maps ids `0..len` to values.  Ids are handed out by `push` and stay valid
/// for the life of the map, which lets the graph refer between files and
/// builds without references.
pub struct DenseMap<K, V> {
    vec: Vec<V>,
    key_type: PhantomData<K>,
}

impl<K, V> Default for DenseMap<K, V> {
    fn default() -> Self {
        DenseMap {
            vec: Vec::new(),
            key_type: PhantomData,
        }
    }
}

impl<K: Index, V> std::ops::Index<K> for DenseMap<K, V> {
    type Output = V;

    fn index(&self, k: K) -> &V {
        &self.vec[k.index()]
    }
}

impl<K: Index, V> std::ops::IndexMut<K> for DenseMap<K, V> {
    fn index_mut(&mut self, k: K) -> &mut V {
        &mut self.vec[k.index()]
    }
}

impl<K: Index, V> DenseMap<K, V> {
    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    /// The id the next `push` will assign.
    pub fn next_id(&self) -> K {
        K::from(self.vec.len())
    }

    /// Appends a value, returning its newly assigned id.
    pub fn push(&mut self, val: V) -> K {
        let id = self.next_id();
        self.vec.push(val);
        id
    }

    /// All ids, in the order they were assigned.
    pub fn ids(&self) -> impl Iterator<Item = K> {
        (0..self.vec.len()).map(K::from)
    }
}

impl<K: Index, V: Clone> DenseMap<K, V> {
    /// A map with `len` entries, all set to `val`.
    pub fn filled(len: usize, val: V) -> Self {
        DenseMap {
            vec: vec![val; len],
            key_type: PhantomData,
        }
    }
}
