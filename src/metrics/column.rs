/// A growable column whose backing length always equals the store capacity.
///
/// Slots past the store's item count hold `T::default()` until written.
#[derive(Debug, Clone)]
pub struct Column<T: Clone + Default> {
    slots: Vec<T>,
}

impl<T: Clone + Default> Column<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![T::default(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Extends the column by exactly `chunk` empty slots, keeping existing values.
    pub fn grow(&mut self, chunk: usize) {
        let mut extended = Vec::with_capacity(self.slots.len() + chunk);
        extended.extend(self.slots.drain(..));
        extended.resize(extended.len() + chunk, T::default());
        self.slots = extended;
    }

    pub fn set(&mut self, index: usize, value: T) {
        self.slots[index] = value;
    }

    pub fn get(&self, index: usize) -> &T {
        &self.slots[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut T {
        &mut self.slots[index]
    }

    /// Copies out the first `len` values.
    pub fn to_vec(&self, len: usize) -> Vec<T> {
        self.slots[..len].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_basic() {
        let mut column: Column<i64> = Column::new(3);
        assert_eq!(column.capacity(), 3);

        column.set(0, 7);
        column.set(2, 9);

        assert_eq!(*column.get(0), 7);
        assert_eq!(*column.get(1), 0);
        assert_eq!(column.to_vec(3), vec![7, 0, 9]);
    }

    #[test]
    fn test_column_grow_is_fixed_step() {
        let mut column: Column<i64> = Column::new(2);
        column.set(0, 1);
        column.set(1, 2);

        column.grow(2);
        assert_eq!(column.capacity(), 4);
        column.grow(2);
        assert_eq!(column.capacity(), 6);

        assert_eq!(column.to_vec(6), vec![1, 2, 0, 0, 0, 0]);
    }

    #[test]
    fn test_jagged_column_grow() {
        let mut column: Column<Vec<i64>> = Column::new(1);
        column.set(0, vec![10, 20]);
        column.grow(1);
        column.get_mut(1).push(30);

        assert_eq!(column.to_vec(2), vec![vec![10, 20], vec![30]]);
    }

    #[test]
    #[should_panic]
    fn test_column_out_of_range() {
        let column: Column<i64> = Column::new(2);
        column.get(2);
    }
}
