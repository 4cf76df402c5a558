//! Plain-text clipboard contract

use std::cell::RefCell;
use std::rc::Rc;

/// Source and sink for copy and paste
pub trait Clipboard {
    fn get(&self) -> Option<String>;

    fn set(&mut self, text: &str);
}

/// Clipboard held in memory. Clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(text: impl Into<String>) -> Self {
        let clipboard = Self::default();
        *clipboard.contents.borrow_mut() = Some(text.into());
        clipboard
    }
}

impl Clipboard for MemoryClipboard {
    fn get(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    fn set(&mut self, text: &str) {
        *self.contents.borrow_mut() = Some(text.to_string());
    }
}
