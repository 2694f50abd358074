//! Copy-on-write ordered collection used for duty sets and approval routes.
//!
//! Every operation that looks like a mutation returns a new [`Sequence`] and leaves the
//! receiver untouched. The backing store is a plain `Vec`; nothing is shared between
//! the old and the new value.
use super::error::SequenceError;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence<T>(Vec<T>);

impl<T> Sequence<T> {
    pub fn new() -> Self {
        Self(Vec::new())
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }
    pub fn get(&self, index: usize) -> Option<&T> {
        self.0.get(index)
    }
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Maps every element, preserving order.
    pub fn map<A>(&self, function: impl FnMut(&T) -> A) -> Sequence<A> {
        Sequence(self.0.iter().map(function).collect())
    }

    /// Left-to-right fold. Returns `initial` for an empty sequence.
    pub fn reduce<A>(&self, initial: A, function: impl FnMut(A, &T) -> A) -> A {
        self.0.iter().fold(initial, function)
    }
}

impl<T: Clone> Sequence<T> {
    pub fn append(&self, item: T) -> Self {
        let mut sequence = self.0.clone();
        sequence.push(item);
        Self(sequence)
    }
    pub fn extend(&self, items: impl IntoIterator<Item = T>) -> Self {
        let mut sequence = self.0.clone();
        sequence.extend(items);
        Self(sequence)
    }
    /// Inserts before `index`; an index past the end appends.
    pub fn insert(&self, index: usize, item: T) -> Self {
        let mut sequence = self.0.clone();
        sequence.insert(index.min(sequence.len()), item);
        Self(sequence)
    }
    pub fn filter(&self, mut function: impl FnMut(&T) -> bool) -> Self {
        Self(self.0.iter().filter(|item| function(item)).cloned().collect())
    }
    pub fn reverse(&self) -> Self {
        Self(self.0.iter().rev().cloned().collect())
    }
    pub fn sort_by(&self, compare: impl FnMut(&T, &T) -> Ordering) -> Self {
        let mut sequence = self.0.clone();
        sequence.sort_by(compare);
        Self(sequence)
    }
}

impl<T: Clone + Ord> Sequence<T> {
    pub fn sort(&self) -> Self {
        self.sort_by(Ord::cmp)
    }
}

impl<T: PartialEq> Sequence<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.0.contains(item)
    }
    pub fn count(&self, item: &T) -> usize {
        self.0.iter().filter(|element| *element == item).count()
    }
    /// Position of the first element equal to `item`.
    pub fn index(&self, item: &T) -> Result<usize, SequenceError> {
        self.0
            .iter()
            .position(|element| element == item)
            .ok_or(SequenceError::NotFound)
    }
}

impl<T: PartialEq + Clone> Sequence<T> {
    /// Removes the first element equal to `item`.
    pub fn remove(&self, item: &T) -> Result<Self, SequenceError> {
        let position = self.index(item)?;
        let mut sequence = self.0.clone();
        sequence.remove(position);
        Ok(Self(sequence))
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for Sequence<T> {
    fn from(value: Vec<T>) -> Self {
        Self(value)
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<C, T: minicbor::Encode<C>> minicbor::Encode<C> for Sequence<T> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        minicbor::Encode::encode(&self.0, e, ctx)
    }
}

impl<'b, C, T: minicbor::Decode<'b, C>> minicbor::Decode<'b, C> for Sequence<T> {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        let items: Vec<T> = minicbor::Decode::decode(d, ctx)?;
        Ok(Sequence(items))
    }
}
