/*
 *   Copyright (c) 2025 R3BL LLC
 *   All rights reserved.
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

use unicode_segmentation::UnicodeSegmentation;

/// The text being edited, the caret (`dot`), and an optional [Pending] overlay.
///
/// All offsets are byte offsets into `content` and always sit on a `char` boundary.
/// Callers never touch a [Buffer] directly while the editor is running, they go through
/// [`crate::App::mutate_state`], which serializes every change.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Unicode text.
    pub content: String,

    /// Byte offset of the caret, `0 <= dot <= content.len()`.
    pub dot: usize,

    /// Proposed replacement of `content[from..to]`. At most one exists at a time.
    pub pending: Option<Pending>,
}

/// "If committed, replace `content[from..to]` with `content`". The range is captured
/// against the buffer at the time the overlay is created. It may go stale if the buffer
/// changes before commit, which [Buffer::apply_pending] guards against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending {
    pub from: usize,
    pub to: usize,
    pub content: String,
}

/// Outcome of [Buffer::apply_pending].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyPendingResult {
    Applied,
    /// The recorded range no longer fit the buffer and was clamped before applying.
    Clamped,
    NoPending,
}

/// What the user sees: `content` with the pending overlay spliced in, and where the
/// caret lands in that text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLine {
    pub text: String,
    pub dot: usize,
}

/// Largest `char` boundary in `text` that is `<= index`.
pub fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

impl Pending {
    pub fn new(from: usize, to: usize, content: impl Into<String>) -> Self {
        Self {
            from,
            to,
            content: content.into(),
        }
    }

    /// Fit `from..to` inside `text`. The second item is `true` if anything changed.
    fn clamped_range(&self, text: &str) -> ((usize, usize), bool) {
        let to = floor_char_boundary(text, self.to);
        let from = floor_char_boundary(text, self.from.min(to));
        ((from, to), from != self.from || to != self.to)
    }
}

impl Buffer {
    pub fn new(content: impl Into<String>, dot: usize) -> Self {
        let content = content.into();
        let dot = floor_char_boundary(&content, dot);
        Self {
            content,
            dot,
            pending: None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.content.is_empty() }

    /// Text before the caret. A caret left past the end (or off a char boundary) by a
    /// direct edit of `content` is floored first.
    #[must_use]
    pub fn content_before_dot(&self) -> &str {
        &self.content[..floor_char_boundary(&self.content, self.dot)]
    }

    pub fn insert_at_dot(&mut self, text: &str) {
        self.content.insert_str(self.dot, text);
        self.dot += text.len();
    }

    /// Delete the grapheme cluster before the caret. Returns `false` at the start.
    pub fn delete_before_dot(&mut self) -> bool {
        match self.prev_grapheme_start() {
            Some(start) => {
                self.content.drain(start..self.dot);
                self.dot = start;
                true
            }
            None => false,
        }
    }

    /// Delete the grapheme cluster after the caret. Returns `false` at the end.
    pub fn delete_after_dot(&mut self) -> bool {
        match self.next_grapheme_end() {
            Some(end) => {
                self.content.drain(self.dot..end);
                true
            }
            None => false,
        }
    }

    pub fn move_dot_left(&mut self) -> bool {
        self.prev_grapheme_start()
            .map(|start| self.dot = start)
            .is_some()
    }

    pub fn move_dot_right(&mut self) -> bool {
        self.next_grapheme_end().map(|end| self.dot = end).is_some()
    }

    pub fn move_dot_to_start(&mut self) { self.dot = 0; }

    pub fn move_dot_to_end(&mut self) { self.dot = self.content.len(); }

    /// Ctrl-U: erase everything before the caret.
    pub fn kill_to_start(&mut self) -> bool {
        if self.dot == 0 {
            return false;
        }
        self.content.drain(..self.dot);
        self.dot = 0;
        true
    }

    /// Ctrl-W: erase from the caret back to the previous whitespace, skipping any
    /// whitespace directly before the caret.
    pub fn kill_word_before_dot(&mut self) -> bool {
        let before = self.content_before_dot();
        let start = before
            .trim_end_matches(' ')
            .rfind(' ')
            .map_or(0, |space| space + 1);
        if start == self.dot {
            return false;
        }
        self.content.drain(start..self.dot);
        self.dot = start;
        true
    }

    fn prev_grapheme_start(&self) -> Option<usize> {
        self.content_before_dot()
            .grapheme_indices(true)
            .next_back()
            .map(|(index, _)| index)
    }

    fn next_grapheme_end(&self) -> Option<usize> {
        self.content[self.dot..]
            .graphemes(true)
            .next()
            .map(|grapheme| self.dot + grapheme.len())
    }
}

/// Pending overlay.
impl Buffer {
    pub fn set_pending(&mut self, pending: Pending) { self.pending = Some(pending); }

    pub fn clear_pending(&mut self) { self.pending = None; }

    /// Commit the overlay: splice it into `content` and put the caret at the end of the
    /// inserted text. A stale range is clamped to the current content rather than
    /// rejected, so this never indexes out of bounds.
    pub fn apply_pending(&mut self) -> ApplyPendingResult {
        let Some(pending) = self.pending.take() else {
            return ApplyPendingResult::NoPending;
        };

        let ((from, to), was_clamped) = pending.clamped_range(&self.content);
        self.content.replace_range(from..to, &pending.content);
        self.dot = from + pending.content.len();

        if was_clamped {
            tracing::warn!(
                message = "Pending range was stale, clamped before applying",
                recorded_from = pending.from,
                recorded_to = pending.to,
                from,
                to
            );
            ApplyPendingResult::Clamped
        } else {
            ApplyPendingResult::Applied
        }
    }

    /// Content as displayed, with the overlay spliced in (the real content is untouched).
    /// A caret inside the replaced range is shown at the end of the pending text.
    #[must_use]
    pub fn preview(&self) -> PreviewLine {
        let Some(pending) = &self.pending else {
            return PreviewLine {
                text: self.content.clone(),
                dot: self.dot,
            };
        };

        let ((from, to), _) = pending.clamped_range(&self.content);
        let text = format!(
            "{}{}{}",
            &self.content[..from],
            pending.content,
            &self.content[to..]
        );
        let dot = if self.dot < from {
            self.dot
        } else if self.dot <= to {
            from + pending.content.len()
        } else {
            self.dot - (to - from) + pending.content.len()
        };
        PreviewLine { text, dot }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_insert_and_delete_at_dot() {
        let mut buffer = Buffer::default();
        buffer.insert_at_dot("gi");
        buffer.insert_at_dot("t");
        assert_eq!(buffer.content, "git");
        assert_eq!(buffer.dot, 3);

        buffer.move_dot_left();
        assert!(buffer.delete_before_dot());
        assert_eq!(buffer.content, "gt");
        assert_eq!(buffer.dot, 1);

        assert!(buffer.delete_after_dot());
        assert_eq!(buffer.content, "g");
        assert!(!buffer.delete_after_dot());
    }

    #[test]
    fn test_grapheme_aware_movement() {
        // "e" + combining acute accent is one grapheme made of 3 bytes.
        let mut buffer = Buffer::new("ae\u{301}b", 0);
        assert!(buffer.move_dot_right());
        assert!(buffer.move_dot_right());
        assert_eq!(buffer.dot, 4);
        assert!(buffer.delete_before_dot());
        assert_eq!(buffer.content, "ab");
        assert_eq!(buffer.dot, 1);
    }

    #[test]
    fn test_new_clamps_dot_to_char_boundary() {
        let buffer = Buffer::new("héllo", 2);
        assert_eq!(buffer.dot, 1);
        let buffer = Buffer::new("abc", 99);
        assert_eq!(buffer.dot, 3);
    }

    #[test]
    fn test_content_before_dot_after_content_shrinks() {
        let mut buffer = Buffer::new("git status", 10);
        buffer.content.truncate(3);
        assert_eq!(buffer.content_before_dot(), "git");

        let mut buffer = Buffer::new("héllo", 3);
        buffer.content = "hé".into();
        assert_eq!(buffer.content_before_dot(), "hé");
        buffer.content = "héllo".into();
        buffer.dot = 2;
        assert_eq!(buffer.content_before_dot(), "h");
    }

    #[test]
    fn test_kill_word_before_dot() {
        let mut buffer = Buffer::new("git commit  ", 12);
        assert!(buffer.kill_word_before_dot());
        assert_eq!(buffer.content, "git ");
        assert!(buffer.kill_word_before_dot());
        assert_eq!(buffer.content, "");
        assert!(!buffer.kill_word_before_dot());
    }

    #[test]
    fn test_kill_to_start() {
        let mut buffer = Buffer::new("echo hi", 5);
        assert!(buffer.kill_to_start());
        assert_eq!(buffer.content, "hi");
        assert_eq!(buffer.dot, 0);
        assert!(!buffer.kill_to_start());
    }

    #[test]
    fn test_apply_pending() {
        let mut buffer = Buffer::new("gi", 2);
        buffer.set_pending(Pending::new(2, 2, "t status"));
        assert_eq!(buffer.content, "gi");

        assert_eq!(buffer.apply_pending(), ApplyPendingResult::Applied);
        assert_eq!(buffer.content, "git status");
        assert_eq!(buffer.dot, 10);
        assert_eq!(buffer.pending, None);
    }

    #[test]
    fn test_apply_pending_without_pending_is_noop() {
        let mut buffer = Buffer::new("ls", 1);
        assert_eq!(buffer.apply_pending(), ApplyPendingResult::NoPending);
        assert_eq!(buffer, Buffer::new("ls", 1));
    }

    #[test]
    fn test_apply_stale_pending_is_clamped() {
        let mut buffer = Buffer::new("git status", 10);
        buffer.set_pending(Pending::new(3, 10, " log"));
        // Buffer shrinks behind the overlay's back.
        buffer.content.truncate(2);
        buffer.dot = 2;

        assert_eq!(buffer.apply_pending(), ApplyPendingResult::Clamped);
        assert_eq!(buffer.content, "gi log");
        assert_eq!(buffer.dot, 6);
    }

    #[test]
    fn test_clear_pending_keeps_content() {
        let mut buffer = Buffer::new("gi", 2);
        buffer.set_pending(Pending::new(2, 2, "t status"));
        buffer.clear_pending();
        assert_eq!(buffer, Buffer::new("gi", 2));
    }

    #[test]
    fn test_preview_splices_pending() {
        let mut buffer = Buffer::new("gi", 2);
        assert_eq!(
            buffer.preview(),
            PreviewLine {
                text: "gi".into(),
                dot: 2
            }
        );

        buffer.set_pending(Pending::new(2, 2, "t status"));
        assert_eq!(
            buffer.preview(),
            PreviewLine {
                text: "git status".into(),
                dot: 10
            }
        );

        let mut buffer = Buffer::new("abcdef", 5);
        buffer.set_pending(Pending::new(1, 3, "XYZW"));
        assert_eq!(
            buffer.preview(),
            PreviewLine {
                text: "aXYZWdef".into(),
                dot: 7
            }
        );
    }
}
