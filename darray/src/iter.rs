/// Iterator over the elements of a `DArray`, front to back
///
/// This iterator implements `Clone`, so a traversal can be restarted from any
/// point.
pub struct DArrayIter<'a, T> {
    items: &'a [T],
    current: usize,
}

impl<'a, T> DArrayIter<'a, T> {
    pub(crate) fn new(items: &'a [T]) -> Self {
        Self { items, current: 0 }
    }
}

impl<T> Clone for DArrayIter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items,
            current: self.current,
        }
    }
}

impl<'a, T> Iterator for DArrayIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.get(self.current)?;
        self.current += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len() - self.current;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for DArrayIter<'_, T> {}

/// Iterator over the elements of a `DArray`, back to front
///
/// This iterator implements `Clone`.
pub struct DArrayRevIter<'a, T> {
    items: &'a [T],
    current: usize,
}

impl<'a, T> DArrayRevIter<'a, T> {
    pub(crate) fn new(items: &'a [T]) -> Self {
        Self {
            items,
            current: items.len(),
        }
    }
}

impl<T> Clone for DArrayRevIter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items,
            current: self.current,
        }
    }
}

impl<'a, T> Iterator for DArrayRevIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == 0 {
            return None;
        }
        self.current -= 1;
        self.items.get(self.current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.current, Some(self.current))
    }
}

impl<T> ExactSizeIterator for DArrayRevIter<'_, T> {}
