//! History Environment
//!
//! The boundary between the path router and whatever hosts it: the browser
//! (`window.history` + `popstate`, implemented in the UI crate) or the
//! in-process [`MemoryHistory`] used by tests and the CLI.

use std::cell::{Cell, RefCell};

use crate::notify::{Listeners, Subscription};

/// Location and session history of the hosting environment
pub trait History {
    /// Current location path
    fn location(&self) -> String;

    /// Add a new history entry and make it current
    fn push(&self, path: &str);

    /// Rewrite the current history entry
    fn replace(&self, path: &str);

    /// Observe back/forward navigation
    ///
    /// The callback receives the path that became current. Programmatic
    /// `push`/`replace` do not fire it.
    fn on_pop(&self, callback: Box<dyn Fn(String)>) -> Subscription;
}

/// In-process history stack with back/forward support
#[derive(Debug)]
pub struct MemoryHistory {
    entries: RefCell<Vec<String>>,
    index: Cell<usize>,
    replacements: Cell<usize>,
    pops: Listeners<String>,
}

impl MemoryHistory {
    /// Create a history whose only entry is `initial`
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: RefCell::new(vec![initial.into()]),
            index: Cell::new(0),
            replacements: Cell::new(0),
            pops: Listeners::new(),
        }
    }

    /// Go back one entry, firing the pop signal. Returns false at the start.
    pub fn back(&self) -> bool {
        let index = self.index.get();
        if index == 0 {
            return false;
        }
        self.go_to(index - 1);
        true
    }

    /// Go forward one entry, firing the pop signal. Returns false at the end.
    pub fn forward(&self) -> bool {
        let index = self.index.get();
        if index + 1 >= self.entries.borrow().len() {
            return false;
        }
        self.go_to(index + 1);
        true
    }

    /// Number of entries in the stack
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// How many times `replace` has been called
    pub fn replace_count(&self) -> usize {
        self.replacements.get()
    }

    fn go_to(&self, index: usize) {
        self.index.set(index);
        let path = self.entries.borrow()[index].clone();
        self.pops.notify(&path);
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        self.entries.borrow()[self.index.get()].clone()
    }

    fn push(&self, path: &str) {
        let mut entries = self.entries.borrow_mut();
        let next = self.index.get() + 1;
        // Pushing discards any forward entries
        entries.truncate(next);
        entries.push(path.to_string());
        self.index.set(next);
    }

    fn replace(&self, path: &str) {
        self.entries.borrow_mut()[self.index.get()] = path.to_string();
        self.replacements.set(self.replacements.get() + 1);
    }

    fn on_pop(&self, callback: Box<dyn Fn(String)>) -> Subscription {
        self.pops.subscribe(move |path: &String| callback(path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_push_and_back_forward() {
        let history = MemoryHistory::new("/");
        history.push("/blog");
        history.push("/post/1");
        assert_eq!(history.location(), "/post/1");
        assert_eq!(history.len(), 3);

        assert!(history.back());
        assert_eq!(history.location(), "/blog");
        assert!(history.forward());
        assert_eq!(history.location(), "/post/1");
        assert!(!history.forward());
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let history = MemoryHistory::new("/");
        history.push("/blog");
        history.back();
        history.push("/admin");

        assert_eq!(history.len(), 2);
        assert!(!history.forward());
    }

    #[test]
    fn test_replace_keeps_length() {
        let history = MemoryHistory::new("/admin");
        history.replace("/admin/dashboard");

        assert_eq!(history.len(), 1);
        assert_eq!(history.location(), "/admin/dashboard");
        assert_eq!(history.replace_count(), 1);
        assert!(!history.back());
    }

    #[test]
    fn test_pop_signal_only_on_traversal() {
        let history = MemoryHistory::new("/");
        let popped = Rc::new(RefCell::new(Vec::new()));

        let popped_clone = Rc::clone(&popped);
        let _sub = history.on_pop(Box::new(move |p| popped_clone.borrow_mut().push(p)));

        history.push("/blog");
        history.replace("/blog");
        assert!(popped.borrow().is_empty());

        history.back();
        assert_eq!(*popped.borrow(), vec!["/".to_string()]);
    }
}
