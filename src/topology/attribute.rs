//! Per-element attribute storage.
//!
//! The topology stores connectivity only. Anything else attached to a vertex,
//! half-edge or face (positions, normals, costs) is an [`ElementAttribute`]
//! keyed by the element's typed index.
//!
//! Three storage strategies are provided:
//!
//! - [`ConstantAttribute`]: the same value for every element.
//! - [`ArrayAttribute`]: one stored value per element.
//! - [`FnAttribute`]: a value computed on demand from the key.
//!
//! Plain slices and vectors are attributes too.

use std::ops::{Index, IndexMut};

use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};

/// A typed element index usable as an attribute key.
pub trait ElementKey: Copy {
    /// Position of the element in its topology array.
    fn slot(self) -> usize;
}

impl<I: MeshIndex> ElementKey for VertexId<I> {
    #[inline]
    fn slot(self) -> usize {
        self.index()
    }
}

impl<I: MeshIndex> ElementKey for HalfEdgeId<I> {
    #[inline]
    fn slot(self) -> usize {
        self.index()
    }
}

impl<I: MeshIndex> ElementKey for FaceId<I> {
    #[inline]
    fn slot(self) -> usize {
        self.index()
    }
}

/// A value of type `T` for every element identified by `K`.
pub trait ElementAttribute<K, T> {
    /// Get the value for an element.
    fn get(&self, key: K) -> T;
}

/// The same value for every element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConstantAttribute<T>(pub T);

impl<K, T: Clone> ElementAttribute<K, T> for ConstantAttribute<T> {
    #[inline]
    fn get(&self, _key: K) -> T {
        self.0.clone()
    }
}

/// One stored value per element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayAttribute<T> {
    values: Vec<T>,
}

impl<T> ArrayAttribute<T> {
    /// Wrap existing values, indexed by element slot.
    pub fn from_vec(values: Vec<T>) -> Self {
        Self { values }
    }

    /// `len` copies of `value`.
    pub fn filled(len: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            values: vec![value; len],
        }
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether no values are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace the value of one element.
    pub fn set<K: ElementKey>(&mut self, key: K, value: T) {
        self.values[key.slot()] = value;
    }

    /// The stored values.
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Unwrap into the stored values.
    pub fn into_vec(self) -> Vec<T> {
        self.values
    }
}

impl<K: ElementKey, T: Clone> ElementAttribute<K, T> for ArrayAttribute<T> {
    #[inline]
    fn get(&self, key: K) -> T {
        self.values[key.slot()].clone()
    }
}

impl<K: ElementKey, T> Index<K> for ArrayAttribute<T> {
    type Output = T;

    fn index(&self, key: K) -> &T {
        &self.values[key.slot()]
    }
}

impl<K: ElementKey, T> IndexMut<K> for ArrayAttribute<T> {
    fn index_mut(&mut self, key: K) -> &mut T {
        &mut self.values[key.slot()]
    }
}

impl<T> FromIterator<T> for ArrayAttribute<T> {
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

/// A value computed from the key on every access.
#[derive(Clone, Copy)]
pub struct FnAttribute<F>(pub F);

impl<K, T, F: Fn(K) -> T> ElementAttribute<K, T> for FnAttribute<F> {
    #[inline]
    fn get(&self, key: K) -> T {
        (self.0)(key)
    }
}

impl<K: ElementKey, T: Clone> ElementAttribute<K, T> for [T] {
    #[inline]
    fn get(&self, key: K) -> T {
        self[key.slot()].clone()
    }
}

impl<K: ElementKey, T: Clone> ElementAttribute<K, T> for Vec<T> {
    #[inline]
    fn get(&self, key: K) -> T {
        self[key.slot()].clone()
    }
}

impl<K, T, A: ElementAttribute<K, T> + ?Sized> ElementAttribute<K, T> for &A {
    #[inline]
    fn get(&self, key: K) -> T {
        (**self).get(key)
    }
}
