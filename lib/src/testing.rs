use std::cell::{Cell, RefCell};

use crate::attribute::ScalarAttribute;
use crate::errors::*;

/// In-memory attribute that records every write.
pub(crate) struct MemoryAttribute<T: Copy> {
    value: Cell<Option<T>>,
    writes: RefCell<Vec<T>>,
    fail_writes: bool,
}

impl<T: Copy> MemoryAttribute<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Cell::new(Some(value)),
            writes: RefCell::new(Vec::new()),
            fail_writes: false,
        }
    }

    pub fn unreadable() -> Self {
        Self {
            value: Cell::new(None),
            writes: RefCell::new(Vec::new()),
            fail_writes: false,
        }
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn get(&self) -> Option<T> {
        self.value.get()
    }

    pub fn writes(&self) -> Vec<T> {
        self.writes.borrow().clone()
    }
}

impl<T: Copy> ScalarAttribute for MemoryAttribute<T> {
    type Value = T;

    fn name(&self) -> &str {
        "memory"
    }

    async fn read(&self) -> Result<T> {
        self.value
            .get()
            .ok_or_else(|| FunkeysError::AttributeUnavailable {
                attribute: "memory".into(),
                reason: "unreadable".into(),
            })
    }

    async fn write(&self, value: T) -> Result<()> {
        if self.fail_writes {
            return Err(FunkeysError::AttributeUnavailable {
                attribute: "memory".into(),
                reason: "read-only".into(),
            });
        }
        self.writes.borrow_mut().push(value);
        self.value.set(Some(value));
        Ok(())
    }
}
