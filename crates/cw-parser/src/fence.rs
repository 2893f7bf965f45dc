//! Code fence tracking for line-oriented parsing.
//!
//! Headings, quiz lines and video lines inside an ordinary fenced code block
//! are plain code and must not be recognized.

/// What a line means to the fence state.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum FenceLine<'a> {
    /// Opening fence, with its info string (possibly empty).
    Open(&'a str),
    /// Closing fence of the current block.
    Close,
    /// Any other line.
    Other,
}

/// Tracks code fence state during line-by-line processing.
///
/// Fences use backticks or tildes (three or more). The closing fence must use
/// the same character and be at least as long as the opening fence.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    fence_char: Option<char>,
    fence_len: usize,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Check if currently inside a fenced code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.fence_char.is_some()
    }

    /// Update fence state with the next line.
    pub(crate) fn update<'a>(&mut self, line: &'a str) -> FenceLine<'a> {
        let trimmed = line.trim_start();

        if let Some(fence_char) = self.fence_char {
            if is_closing_fence(trimmed, fence_char, self.fence_len) {
                self.fence_char = None;
                self.fence_len = 0;
                return FenceLine::Close;
            }
            FenceLine::Other
        } else if let Some((ch, len)) = detect_fence(trimmed) {
            self.fence_char = Some(ch);
            self.fence_len = len;
            FenceLine::Open(trimmed[len..].trim())
        } else {
            FenceLine::Other
        }
    }
}

/// Detect if a line starts a code fence. Returns the fence character and
/// length (in bytes, fence characters being ASCII).
fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    // Backtick fences may not carry backticks in their info string.
    if count < 3 || (first == '`' && trimmed[count..].contains('`')) {
        return None;
    }
    Some((first, count))
}

fn is_closing_fence(trimmed: &str, expected_char: char, min_len: usize) -> bool {
    if !trimmed.starts_with(expected_char) {
        return false;
    }
    let count = trimmed.chars().take_while(|&c| c == expected_char).count();
    count >= min_len && trimmed[count..].chars().all(char::is_whitespace)
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
    fn test_backtick_fence_with_info() {
        let mut tracker = FenceTracker::new();
        assert_eq!(tracker.update("```quiz"), FenceLine::Open("quiz"));
        assert!(tracker.in_fence());
        assert_eq!(tracker.update("# not a heading"), FenceLine::Other);
        assert_eq!(tracker.update("```"), FenceLine::Close);
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_tilde_fence() {
        let mut tracker = FenceTracker::new();
        assert_eq!(tracker.update("~~~ python "), FenceLine::Open("python"));
        assert_eq!(tracker.update("```"), FenceLine::Other);
        assert_eq!(tracker.update("~~~~"), FenceLine::Close);
    }

    #[test]
    fn test_shorter_fence_not_closing() {
        let mut tracker = FenceTracker::new();
        assert_eq!(tracker.update("````"), FenceLine::Open(""));
        assert_eq!(tracker.update("```"), FenceLine::Other);
        assert!(tracker.in_fence());
        assert_eq!(tracker.update("````"), FenceLine::Close);
    }

    #[test]
    fn test_closing_fence_rejects_trailing_text() {
        let mut tracker = FenceTracker::new();
        tracker.update("```");
        assert_eq!(tracker.update("```rust"), FenceLine::Other);
        assert!(tracker.in_fence());
    }

    #[test]
    fn test_inline_code_is_not_a_fence() {
        let mut tracker = FenceTracker::new();
        assert_eq!(tracker.update("``` a ` b"), FenceLine::Other);
        assert_eq!(tracker.update("``inline``"), FenceLine::Other);
        assert!(!tracker.in_fence());
    }
}
