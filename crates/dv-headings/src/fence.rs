//! Code fence tracking for line-by-line passes.
//!
//! Heading detection and TOC scanning must never look inside fenced code
//! blocks. Fences are lines starting with three backticks; state toggles on
//! each fence line.

/// Tracks fenced-code state during line-by-line processing.
#[derive(Debug, Default)]
pub struct FenceTracker {
    in_fence: bool,
}

impl FenceTracker {
    /// Create a new tracker, starting outside any fence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if currently inside a fenced code block.
    #[must_use]
    pub fn in_fence(&self) -> bool {
        self.in_fence
    }

    /// Update fence state based on a line.
    ///
    /// Returns `true` if the line is a fence marker. An unterminated fence
    /// simply leaves the tracker in-fence until the end of the document; the
    /// remaining lines pass through untouched.
    pub fn update(&mut self, line: &str) -> bool {
        if line.starts_with("```") {
            self.in_fence = !self.in_fence;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fence_initially() {
        let tracker = FenceTracker::new();
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_fence_toggles() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```rust"));
        assert!(tracker.in_fence());

        assert!(!tracker.update("# not a heading"));
        assert!(tracker.in_fence());

        assert!(tracker.update("```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_indented_backticks_not_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("  ```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_two_backticks_not_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("``inline``"));
        assert!(!tracker.in_fence());
    }
}
