/*****************************************************************************************[intmap.rs]
Copyright (c) 2003-2006, Niklas Een, Niklas Sorensson (MiniSat)
Copyright (c) 2007-2011, Niklas Sorensson (MiniSat)
Copyright (c) 2018-2018, Masaki Hara

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute,
sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or
substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT
OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
**************************************************************************************************/

use std::marker::PhantomData;
use std::ops;

/// Types that can be used as a dense integer key.
pub trait AsIndex: Copy {
    fn as_index(self) -> usize;
    fn from_index(index: usize) -> Self;
}

#[derive(Debug, Clone)]
pub struct IntMap<K: AsIndex, V> {
    map: Vec<V>,
    _marker: PhantomData<fn(K)>, // contravariance
}

impl<K: AsIndex, V> Default for IntMap<K, V> {
    fn default() -> Self {
        Self {
            map: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl<K: AsIndex, V> IntMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }
    #[inline]
    pub fn has(&self, k: K) -> bool {
        k.as_index() < self.map.len()
    }
    pub fn reserve(&mut self, key: K, pad: V)
    where
        V: Clone,
    {
        let index = key.as_index();
        if index >= self.map.len() {
            self.map.resize(index + 1, pad);
        }
    }
    pub fn reserve_default(&mut self, key: K)
    where
        V: Default,
    {
        let index = key.as_index();
        if index >= self.map.len() {
            let len = index + 1 - self.map.len();
            self.map.extend((0..len).map(|_| V::default()));
        }
    }
    pub fn insert(&mut self, key: K, val: V, pad: V)
    where
        V: Clone,
    {
        self.reserve(key, pad);
        self[key] = val;
    }
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K: AsIndex, V> ops::Index<K> for IntMap<K, V> {
    type Output = V;
    #[inline]
    fn index(&self, index: K) -> &Self::Output {
        &self.map[index.as_index()]
    }
}
impl<K: AsIndex, V> ops::IndexMut<K> for IntMap<K, V> {
    #[inline]
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        &mut self.map[index.as_index()]
    }
}

/// A set of keys supporting O(1) `insert`, `remove`, `pop` and `has`.
///
/// Realized as an unordered vector of members paired with a `key → position`
/// side table (`-1` when absent).
#[derive(Debug, Clone)]
pub struct IntSet<K: AsIndex> {
    pos: IntMap<K, i32>,
    xs: Vec<K>,
}

impl<K: AsIndex> Default for IntSet<K> {
    fn default() -> Self {
        Self {
            pos: IntMap::default(),
            xs: vec![],
        }
    }
}

impl<K: AsIndex> IntSet<K> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.xs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
    pub fn as_slice(&self) -> &[K] {
        &self.xs
    }
    #[inline]
    pub fn has(&self, k: K) -> bool {
        self.pos.has(k) && self.pos[k] >= 0
    }

    pub fn insert(&mut self, k: K) {
        self.pos.reserve(k, -1);
        assert!(self.pos[k] < 0, "insert of a key already in the set");
        self.pos[k] = self.xs.len() as i32;
        self.xs.push(k);
    }

    /// Remove `k` from the set, swapping the last member into its slot.
    pub fn remove(&mut self, k: K) {
        assert!(self.has(k), "remove of a key not in the set");
        let k_pos = self.pos[k] as usize;
        self.pos[k] = -1;
        let last = self.xs.pop().expect("set is empty");
        if k_pos < self.xs.len() {
            self.xs[k_pos] = last;
            self.pos[last] = k_pos as i32;
        }
    }

    /// Remove and return the most recently inserted member still present.
    pub fn pop(&mut self) -> Option<K> {
        let k = self.xs.pop()?;
        self.pos[k] = -1;
        Some(k)
    }

    pub fn clear(&mut self) {
        for &k in &self.xs {
            self.pos[k] = -1;
        }
        self.xs.clear();
    }
}

impl<K: AsIndex> ops::Index<usize> for IntSet<K> {
    type Output = K;
    fn index(&self, index: usize) -> &Self::Output {
        &self.xs[index]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct K(usize);
    impl AsIndex for K {
        fn as_index(self) -> usize {
            self.0
        }
        fn from_index(index: usize) -> Self {
            K(index)
        }
    }

    #[test]
    fn test_set_insert_remove() {
        let mut s: IntSet<K> = IntSet::new();
        for i in 0..5 {
            s.insert(K(i));
        }
        assert_eq!(s.len(), 5);
        assert!(s.has(K(3)));
        s.remove(K(1));
        assert!(!s.has(K(1)));
        assert_eq!(s.len(), 4);
        // the swapped-in member is still reachable
        for i in [0usize, 2, 3, 4].iter() {
            assert!(s.has(K(*i)));
        }
        s.insert(K(1));
        assert!(s.has(K(1)));
    }

    #[test]
    fn test_set_pop_drains() {
        let mut s: IntSet<K> = IntSet::new();
        for i in 0..4 {
            s.insert(K(i));
        }
        let mut seen = vec![];
        while let Some(k) = s.pop() {
            assert!(!s.has(k));
            seen.push(k.0);
        }
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_set_pop_order_is_lifo() {
        let mut s: IntSet<K> = IntSet::new();
        for i in 0..3 {
            s.insert(K(i));
        }
        assert_eq!(s.pop(), Some(K(2)));
        assert_eq!(s.pop(), Some(K(1)));
    }

    #[test]
    #[should_panic]
    fn test_set_double_insert_panics() {
        let mut s: IntSet<K> = IntSet::new();
        s.insert(K(0));
        s.insert(K(0));
    }
}
