//! `ServiceQueues` — one FIFO waiting line per service category.
//!
//! Customers leave a line only from the head (dispatch) or through
//! [`ServiceQueues::evict_where`] (abandonment).  Cross-line ordering is the
//! dispatch policy's business, never this type's.

use std::collections::VecDeque;

use pq_core::CategoryId;

use crate::Customer;

#[derive(Clone, Debug, Default)]
pub struct ServiceQueues {
    lines: Vec<VecDeque<Customer>>,
}

impl ServiceQueues {
    /// Empty lines for `categories` categories.
    pub fn new(categories: usize) -> Self {
        Self { lines: vec![VecDeque::new(); categories] }
    }

    /// Number of lines (one per category).
    #[inline]
    pub fn category_count(&self) -> usize {
        self.lines.len()
    }

    /// Append `customer` to the tail of its category's line.
    pub fn push(&mut self, customer: Customer) {
        self.lines[customer.category.index()].push_back(customer);
    }

    pub fn pop_head(&mut self, category: CategoryId) -> Option<Customer> {
        self.lines[category.index()].pop_front()
    }

    #[inline]
    pub fn len(&self, category: CategoryId) -> usize {
        self.lines[category.index()].len()
    }

    pub fn total_len(&self) -> usize {
        self.lines.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(VecDeque::is_empty)
    }

    /// Line lengths indexed by `CategoryId`.
    pub fn lengths(&self) -> Vec<usize> {
        self.lines.iter().map(VecDeque::len).collect()
    }

    /// Heads of every non-empty line, in category order.
    pub fn heads(&self) -> impl Iterator<Item = (CategoryId, &Customer)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| line.front().map(|c| (CategoryId(i as u16), c)))
    }

    /// Every waiting customer, line by line, head first.
    pub fn waiting(&self) -> impl Iterator<Item = &Customer> + '_ {
        self.lines.iter().flatten()
    }

    /// Remove and return every customer for which `evict` returns `true`.
    ///
    /// `evict` is called exactly once per waiting customer, in the same order
    /// as [`waiting`][Self::waiting].  Survivors keep their relative order.
    pub fn evict_where<F>(&mut self, mut evict: F) -> Vec<Customer>
    where
        F: FnMut(&Customer) -> bool,
    {
        let mut evicted = Vec::new();
        for line in &mut self.lines {
            if line.is_empty() {
                continue;
            }
            let mut kept = VecDeque::with_capacity(line.len());
            for customer in line.drain(..) {
                if evict(&customer) {
                    evicted.push(customer);
                } else {
                    kept.push_back(customer);
                }
            }
            *line = kept;
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.lines.iter_mut().for_each(VecDeque::clear);
    }
}
