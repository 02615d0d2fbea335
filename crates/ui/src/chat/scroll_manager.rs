use gpui::ScrollHandle;

/// Keeps the message list pinned to its end whenever messages are appended.
///
/// The tracked element's direct children are the message rows followed by one
/// end marker, so scrolling to the last child brings the newest message into view.
pub struct ScrollManager {
    scroll_handle: ScrollHandle,
    pending_scroll_to_end: bool,
}

impl ScrollManager {
    pub fn new() -> Self {
        Self {
            scroll_handle: ScrollHandle::new(),
            pending_scroll_to_end: false,
        }
    }

    pub fn handle(&self) -> &ScrollHandle {
        &self.scroll_handle
    }

    pub fn request_scroll_to_end(&mut self) {
        self.pending_scroll_to_end = true;
    }

    pub fn is_scroll_pending(&self) -> bool {
        self.pending_scroll_to_end
    }

    /// Issues the pending scroll for a list with `child_count` children.
    ///
    /// GPUI resolves `scroll_to_item` during the next prepaint, after the new rows
    /// have been laid out. Returns true when a scroll was issued.
    pub fn apply_pending_scroll(&mut self, child_count: usize) -> bool {
        if !self.pending_scroll_to_end || child_count == 0 {
            return false;
        }

        self.scroll_handle.scroll_to_item(child_count - 1);
        self.pending_scroll_to_end = false;
        true
    }
}

impl Default for ScrollManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_request_is_consumed_once() {
        let mut manager = ScrollManager::new();
        assert!(!manager.apply_pending_scroll(3));

        manager.request_scroll_to_end();
        assert!(manager.is_scroll_pending());
        assert!(manager.apply_pending_scroll(3));
        assert!(!manager.is_scroll_pending());
        assert!(!manager.apply_pending_scroll(3));
    }

    #[test]
    fn empty_list_keeps_request_pending() {
        let mut manager = ScrollManager::new();
        manager.request_scroll_to_end();

        assert!(!manager.apply_pending_scroll(0));
        assert!(manager.is_scroll_pending());
    }
}
