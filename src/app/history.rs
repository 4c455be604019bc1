//! Session history seam.

use std::sync::Arc;

use parking_lot::Mutex;

/// The host's session history (the browser's, in a web host).
pub trait History: Send + Sync {
    /// Path + query of the current entry.
    fn location(&self) -> String;
    fn push(&self, url: &str);
    fn replace(&self, url: &str);
}

#[derive(Debug, Default)]
struct Stack {
    entries: Vec<String>,
    index: usize,
}

/// In-process history stack. Clones share the same stack.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    stack: Arc<Mutex<Stack>>,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            stack: Arc::new(Mutex::new(Stack {
                entries: vec![initial.into()],
                index: 0,
            })),
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.stack.lock().entries.clone()
    }

    /// Step back one entry. Returns the new location.
    pub fn back(&self) -> Option<String> {
        let mut stack = self.stack.lock();
        if stack.index == 0 {
            return None;
        }
        stack.index -= 1;
        stack.entries.get(stack.index).cloned()
    }

    pub fn forward(&self) -> Option<String> {
        let mut stack = self.stack.lock();
        if stack.index + 1 >= stack.entries.len() {
            return None;
        }
        stack.index += 1;
        stack.entries.get(stack.index).cloned()
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        let stack = self.stack.lock();
        stack.entries.get(stack.index).cloned().unwrap_or_default()
    }

    fn push(&self, url: &str) {
        let mut stack = self.stack.lock();
        if stack.entries.is_empty() {
            stack.entries.push(url.to_string());
            stack.index = 0;
            return;
        }
        let keep = stack.index + 1;
        stack.entries.truncate(keep);
        stack.entries.push(url.to_string());
        stack.index = keep;
    }

    fn replace(&self, url: &str) {
        let mut stack = self.stack.lock();
        let index = stack.index;
        match stack.entries.get_mut(index) {
            Some(entry) => *entry = url.to_string(),
            None => stack.entries.push(url.to_string()),
        }
    }
}
