//! Lazy candidate generation from a template
//!
//! Walks the cartesian product of the template's slots without ever
//! materializing it: iterator state is one index per slot, the rightmost
//! slot varying fastest.

use crate::mask::{Slot, Template};

/// Lazy iterator over every candidate a template describes.
///
/// Restartable: a fresh `Candidates` over an unchanged template yields the
/// identical ordered sequence.
#[derive(Debug)]
pub struct Candidates<'a> {
    slots: &'a [Slot],
    indices: Vec<usize>,
    done: bool,
}

impl<'a> Candidates<'a> {
    fn new(slots: &'a [Slot]) -> Self {
        Self {
            slots,
            indices: vec![0; slots.len()],
            done: false,
        }
    }
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }

        let candidate: String = self
            .slots
            .iter()
            .zip(&self.indices)
            .map(|(slot, &i)| slot.members()[i].as_str())
            .collect();

        // odometer advance, rightmost slot first
        let mut pos = self.slots.len();
        loop {
            if pos == 0 {
                self.done = true;
                break;
            }
            pos -= 1;
            self.indices[pos] += 1;
            if self.indices[pos] < self.slots[pos].len() {
                break;
            }
            self.indices[pos] = 0;
        }

        Some(candidate)
    }
}

impl Template {
    /// Stream every candidate for the current template
    pub fn candidates(&self) -> Candidates<'_> {
        Candidates::new(self.slots())
    }

    /// Total number of candidates, or `None` when the product overflows u128.
    ///
    /// O(slot count); never enumerates the product.
    pub fn combination_count(&self) -> Option<u128> {
        self.slots()
            .iter()
            .try_fold(1u128, |acc, slot| acc.checked_mul(slot.len() as u128))
    }
}
