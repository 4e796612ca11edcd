use std::{any, slice};

use tracing::debug;

use crate::error::{Error, Result};

/// Capacity a container starts with unless told otherwise.
pub const INITIAL_CAPACITY: usize = 10;

/// Growable store for one kind of parsed record.
///
/// The logical capacity starts at the initial capacity and doubles whenever
/// an append finds the container full. Growth goes through
/// `try_reserve_exact`, so an allocation failure is reported as
/// [`Error::Resource`] and leaves the container as it was. Backing storage
/// is only allocated on the first append.
#[derive(Debug, Clone)]
pub struct ResultContainer<T> {
    items: Vec<T>,
    capacity: usize,
    initial_capacity: usize,
}

impl<T> ResultContainer<T> {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates an empty container. An initial capacity of zero is raised to one.
    pub fn with_capacity(initial_capacity: usize) -> Self {
        let initial_capacity = initial_capacity.max(1);
        ResultContainer {
            items: Vec::new(),
            capacity: initial_capacity,
            initial_capacity,
        }
    }

    /// Stores `element` at the end and returns its index.
    pub fn append(&mut self, element: T) -> Result<usize> {
        let len = self.items.len();

        let target = if len < self.capacity {
            self.capacity
        } else if self.capacity == 0 {
            self.initial_capacity
        } else {
            self.capacity.checked_mul(2).ok_or_else(|| {
                Error::Resource(format!("{} (capacity overflow)", any::type_name::<T>()))
            })?
        };

        if self.items.capacity() < target {
            self.items
                .try_reserve_exact(target - len)
                .map_err(|e| Error::Resource(format!("{}: {}", any::type_name::<T>(), e)))?;
        }

        if target != self.capacity {
            debug!(
                kind = any::type_name::<T>(),
                from = self.capacity,
                to = target,
                "grew result container"
            );
        }
        self.capacity = target;

        self.items.push(element);
        Ok(len)
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        self.items.get(index).ok_or(Error::OutOfRange {
            index,
            len: self.items.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Drops every element with its owned sub-lists and releases the storage.
    ///
    /// Safe to call any number of times. The next append starts over at the
    /// initial capacity.
    pub fn destroy(&mut self) {
        self.items = Vec::new();
        self.capacity = 0;
    }
}

impl<T> Default for ResultContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a ResultContainer<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
