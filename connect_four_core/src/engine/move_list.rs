use crate::logic::eval_constants::COLS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnList {
    columns: [u8; COLS],
    count: usize,
}

impl Default for ColumnList {
    fn default() -> Self {
        Self {
            columns: [0; COLS],
            count: 0,
        }
    }
}

impl ColumnList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        let mut list = Self::new();
        for col in 0..COLS {
            list.push(col);
        }
        list
    }

    pub fn push(&mut self, column: usize) {
        if let Some(slot) = self.columns.get_mut(self.count) {
            #[allow(clippy::cast_possible_truncation)]
            {
                *slot = column as u8;
            }
            self.count += 1;
        } else {
            debug_assert!(false, "ColumnList overflow! Max columns: {COLS}");
        }
    }

    pub const fn len(&self) -> usize {
        self.count
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, index: usize) -> Option<usize> {
        self.as_slice().get(index).map(|&c| usize::from(c))
    }

    // Exchanges the first entry with the one at `index`.
    pub fn swap_to_front(&mut self, index: usize) {
        if index < self.count {
            self.columns.swap(0, index);
        }
    }

    pub fn retain(&mut self, mut keep: impl FnMut(usize) -> bool) {
        let mut kept = Self::new();
        for col in self.iter().filter(|&col| keep(col)) {
            kept.push(col);
        }
        *self = kept;
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.as_slice().iter().map(|&c| usize::from(c))
    }

    fn as_slice(&self) -> &[u8] {
        self.columns.get(0..self.count).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_iterate() {
        let mut list = ColumnList::new();
        assert!(list.is_empty());
        list.push(2);
        list.push(5);
        assert_eq!(list.len(), 2);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![2, 5]);
        assert_eq!(list.get(1), Some(5));
        assert_eq!(list.get(2), None);
    }

    #[test]
    fn test_swap_to_front_exchanges_slots() {
        let mut list = ColumnList::all();
        list.swap_to_front(4);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![4, 1, 2, 3, 0, 5, 6]);
    }

    #[test]
    fn test_swap_to_front_out_of_range_is_noop() {
        let mut list = ColumnList::new();
        list.push(1);
        list.push(3);
        list.swap_to_front(5);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_retain_keeps_order() {
        let mut list = ColumnList::all();
        list.swap_to_front(3);
        list.retain(|col| col % 2 == 1);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![3, 1, 5]);
    }
}
