//! Sequences, sets, maps and pairs over the indexed child convention.
//!
//! Every container owns the direct children `_0, _1, ...` of its node, one
//! per item. A map's key child carries the key as text and its value in a
//! nested `_0` child. Keys are restricted to [`Scalar`] types so a key node
//! never holds children of its own.

// used for the standard containers that can be kept
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::hash::{BuildHasher, Hash};

// used for insertion ordered containers
use indexmap::{IndexMap, IndexSet};

use crate::datatype::{read_scalar, write_scalar, DataType, Scalar};
use crate::document::{index_name, Element};
use crate::error::ReadError;

// ------------- Shared helpers -------------

fn reset(node: &mut Element) {
    node.clear_children();
    node.clear_text();
}

fn read_items<T: DataType + Default>(node: &Element) -> Result<Vec<T>, ReadError> {
    node.indexed_children()
        .map(|child| {
            let mut item = T::default();
            item.read(child)?;
            Ok::<T, ReadError>(item)
        })
        .collect()
}

fn write_items<'a, T: DataType + 'a>(node: &mut Element, items: impl Iterator<Item = &'a T>) {
    reset(node);
    for (i, item) in items.enumerate() {
        item.write(node.push_child(Element::new(index_name(i))));
    }
}

fn read_entries<K: Scalar, V: DataType + Default>(node: &Element) -> Result<Vec<(K, V)>, ReadError> {
    node.indexed_children()
        .map(|key_node| {
            let key = read_scalar::<K>(key_node)?;
            let value_node = key_node
                .indexed(0)
                .ok_or_else(|| ReadError::NodeMissing(format!("{}/{}", key_node.name(), index_name(0))))?;
            let mut value = V::default();
            value.read(value_node)?;
            Ok::<(K, V), ReadError>((key, value))
        })
        .collect()
}

fn write_entries<'a, K: Scalar + 'a, V: DataType + 'a>(
    node: &mut Element,
    entries: impl Iterator<Item = (&'a K, &'a V)>,
) {
    reset(node);
    for (i, (key, value)) in entries.enumerate() {
        let key_node = node.push_child(Element::new(index_name(i)));
        write_scalar(key, key_node);
        value.write(key_node.push_child(Element::new(index_name(0))));
    }
}

// ------------- Sequences -------------

macro_rules! sequence_data_type {
    ($($name:literal => $t:ident),* $(,)?) => {$(
        impl<T: DataType + Default> DataType for $t<T> {
            fn data_type() -> String {
                format!("{}<{}>", $name, T::data_type())
            }
            fn read(&mut self, node: &Element) -> Result<(), ReadError> {
                *self = read_items::<T>(node)?.into_iter().collect();
                Ok(())
            }
            fn write(&self, node: &mut Element) {
                write_items(node, self.iter());
            }
        }
    )*};
}
sequence_data_type!("Vec" => Vec, "VecDeque" => VecDeque, "LinkedList" => LinkedList);

// ------------- Sets -------------

impl<T: DataType + Default + Ord> DataType for BTreeSet<T> {
    fn data_type() -> String {
        format!("BTreeSet<{}>", T::data_type())
    }
    fn read(&mut self, node: &Element) -> Result<(), ReadError> {
        *self = read_items::<T>(node)?.into_iter().collect();
        Ok(())
    }
    fn write(&self, node: &mut Element) {
        write_items(node, self.iter());
    }
}

impl<T, S> DataType for HashSet<T, S>
where
    T: DataType + Default + Eq + Hash,
    S: BuildHasher + Default + Clone,
{
    fn data_type() -> String {
        format!("HashSet<{}>", T::data_type())
    }
    fn read(&mut self, node: &Element) -> Result<(), ReadError> {
        let items = read_items::<T>(node)?;
        self.clear();
        self.extend(items);
        Ok(())
    }
    fn write(&self, node: &mut Element) {
        write_items(node, self.iter());
    }
}

impl<T, S> DataType for IndexSet<T, S>
where
    T: DataType + Default + Eq + Hash,
    S: BuildHasher + Default + Clone,
{
    fn data_type() -> String {
        format!("IndexSet<{}>", T::data_type())
    }
    fn read(&mut self, node: &Element) -> Result<(), ReadError> {
        let items = read_items::<T>(node)?;
        self.clear();
        self.extend(items);
        Ok(())
    }
    fn write(&self, node: &mut Element) {
        write_items(node, self.iter());
    }
}

/// An ordered set that keeps duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSet<T: Ord>(BTreeMap<T, usize>);

impl<T: Ord> Default for MultiSet<T> {
    fn default() -> Self {
        MultiSet(BTreeMap::new())
    }
}

impl<T: Ord> MultiSet<T> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, item: T) {
        *self.0.entry(item).or_insert(0) += 1;
    }
    /// How many times `item` is held.
    pub fn count(&self, item: &T) -> usize {
        self.0.get(item).copied().unwrap_or(0)
    }
    pub fn len(&self) -> usize {
        self.0.values().sum()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn clear(&mut self) {
        self.0.clear();
    }
    /// Items in order, each repeated as often as it was inserted.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.0
            .iter()
            .flat_map(|(item, &count)| std::iter::repeat(item).take(count))
    }
}

impl<T: Ord> FromIterator<T> for MultiSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = MultiSet::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<T: DataType + Default + Ord> DataType for MultiSet<T> {
    fn data_type() -> String {
        format!("MultiSet<{}>", T::data_type())
    }
    fn read(&mut self, node: &Element) -> Result<(), ReadError> {
        *self = read_items::<T>(node)?.into_iter().collect();
        Ok(())
    }
    fn write(&self, node: &mut Element) {
        write_items(node, self.iter());
    }
}

// ------------- Maps -------------

impl<K, V> DataType for BTreeMap<K, V>
where
    K: Scalar + Clone + Ord,
    V: DataType + Default,
{
    fn data_type() -> String {
        format!("BTreeMap<{}, {}>", K::DATA_TYPE, V::data_type())
    }
    fn read(&mut self, node: &Element) -> Result<(), ReadError> {
        *self = read_entries::<K, V>(node)?.into_iter().collect();
        Ok(())
    }
    fn write(&self, node: &mut Element) {
        write_entries(node, self.iter());
    }
}

impl<K, V, S> DataType for HashMap<K, V, S>
where
    K: Scalar + Clone + Eq + Hash,
    V: DataType + Default,
    S: BuildHasher + Default + Clone,
{
    fn data_type() -> String {
        format!("HashMap<{}, {}>", K::DATA_TYPE, V::data_type())
    }
    fn read(&mut self, node: &Element) -> Result<(), ReadError> {
        let entries = read_entries::<K, V>(node)?;
        self.clear();
        self.extend(entries);
        Ok(())
    }
    fn write(&self, node: &mut Element) {
        write_entries(node, self.iter());
    }
}

impl<K, V, S> DataType for IndexMap<K, V, S>
where
    K: Scalar + Clone + Eq + Hash,
    V: DataType + Default,
    S: BuildHasher + Default + Clone,
{
    fn data_type() -> String {
        format!("IndexMap<{}, {}>", K::DATA_TYPE, V::data_type())
    }
    fn read(&mut self, node: &Element) -> Result<(), ReadError> {
        let entries = read_entries::<K, V>(node)?;
        self.clear();
        self.extend(entries);
        Ok(())
    }
    fn write(&self, node: &mut Element) {
        write_entries(node, self.iter());
    }
}

/// An ordered map that keeps every value stored under a repeated key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiMap<K: Ord, V>(BTreeMap<K, Vec<V>>);

impl<K: Ord, V> Default for MultiMap<K, V> {
    fn default() -> Self {
        MultiMap(BTreeMap::new())
    }
}

impl<K: Ord, V> MultiMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, key: K, value: V) {
        self.0.entry(key).or_default().push(value);
    }
    /// All values under `key` in insertion order.
    pub fn get(&self, key: &K) -> &[V] {
        self.0.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn clear(&mut self) {
        self.0.clear();
    }
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.0
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |value| (key, value)))
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for MultiMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = MultiMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K, V> DataType for MultiMap<K, V>
where
    K: Scalar + Clone + Ord,
    V: DataType + Default,
{
    fn data_type() -> String {
        format!("MultiMap<{}, {}>", K::DATA_TYPE, V::data_type())
    }
    fn read(&mut self, node: &Element) -> Result<(), ReadError> {
        *self = read_entries::<K, V>(node)?.into_iter().collect();
        Ok(())
    }
    fn write(&self, node: &mut Element) {
        write_entries(node, self.iter());
    }
}

// ------------- Pairs -------------

fn required<'a>(node: &'a Element, index: usize) -> Result<&'a Element, ReadError> {
    node.indexed(index)
        .ok_or_else(|| ReadError::NodeMissing(format!("{}/{}", node.name(), index_name(index))))
}

impl<A: DataType, B: DataType> DataType for (A, B) {
    fn data_type() -> String {
        format!("({}, {})", A::data_type(), B::data_type())
    }
    fn read(&mut self, node: &Element) -> Result<(), ReadError> {
        self.0.read(required(node, 0)?)?;
        self.1.read(required(node, 1)?)
    }
    fn write(&self, node: &mut Element) {
        reset(node);
        self.0.write(node.push_child(Element::new(index_name(0))));
        self.1.write(node.push_child(Element::new(index_name(1))));
    }
}
