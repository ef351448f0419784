use std::cell::Cell;
use std::rc::Rc;

use super::*;

/// Counts its own drops into a shared cell. Clones share the counter.
#[derive(Clone)]
struct Tracked(Rc<Cell<u32>>);

impl Drop for Tracked {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

/// Shared bookkeeping for [`Fragile`] values.
struct Budget {
    live: Cell<usize>,
    clones_left: Cell<usize>,
}

impl Budget {
    fn new(clones_left: usize) -> Rc<Self> {
        Rc::new(Self {
            live: Cell::new(0),
            clones_left: Cell::new(clones_left),
        })
    }

    fn make(self: &Rc<Self>, value: i32) -> Fragile {
        self.live.set(self.live.get() + 1);
        Fragile {
            value,
            budget: Rc::clone(self),
        }
    }

    fn allow(&self, clones: usize) {
        self.clones_left.set(clones);
    }
}

/// Element whose `clone` panics once its budget's clone allowance is spent.
struct Fragile {
    value: i32,
    budget: Rc<Budget>,
}

impl Clone for Fragile {
    fn clone(&self) -> Self {
        let left = self.budget.clones_left.get();
        assert!(left > 0, "clone budget exhausted");
        self.budget.clones_left.set(left - 1);
        self.budget.make(self.value)
    }
}

impl Drop for Fragile {
    fn drop(&mut self) {
        self.budget.live.set(self.budget.live.get() - 1);
    }
}

fn values(array: &DynArray<Fragile>) -> Vec<i32> {
    array.iter().map(|f| f.value).collect()
}

mod properties;
