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

use std::collections::{HashSet, VecDeque};

use crate::{Walker, WalkerError, HISTORY_SIZE_MAX};

/// A numbered history entry. Sequence numbers are assigned in insertion order and are
/// never reused, even after old entries are evicted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub seq: usize,
    pub text: String,
}

/// Append only, in-memory command history, oldest entry first.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: VecDeque<Entry>,
    next_seq: usize,
    pub max_size: usize,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self {
            entries: VecDeque::default(),
            next_seq: 0,
            max_size: HISTORY_SIZE_MAX,
        }
    }
}

impl MemoryHistory {
    pub fn new() -> Self { Self::default() }

    pub fn with_cmds<S: Into<String>>(cmds: impl IntoIterator<Item = S>) -> Self {
        let mut it = Self::new();
        for cmd in cmds {
            it.add_cmd(cmd);
        }
        it
    }

    /// Append `text` and return its sequence number. Empty lines and a repeat of the
    /// newest entry are not recorded.
    pub fn add_cmd(&mut self, text: impl Into<String>) -> Option<usize> {
        let text = text.into();
        if text.is_empty() || self.entries.back().is_some_and(|last| last.text == text) {
            return None;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(Entry { seq, text });

        while self.entries.len() > self.max_size {
            self.entries.pop_front();
        }

        Some(seq)
    }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> { self.entries.iter() }

    /// Snapshot the current entries into a walker. Commands added afterwards are not
    /// seen by it.
    #[must_use]
    pub fn walker(&self, prefix: impl Into<String>) -> MemoryWalker {
        MemoryWalker {
            entries: self.entries.iter().cloned().collect(),
            prefix: prefix.into(),
            origin_seq: self.next_seq,
            scan_from: self.entries.len(),
            stack: vec![],
            top: 0,
            seen: HashSet::new(),
        }
    }
}

/// [Walker] over a snapshot of a [MemoryHistory].
///
/// Matches found while walking backwards are pushed on `stack`; `top` is how many of
/// them are "current". [Walker::next] only lowers `top`, and a later [Walker::prev]
/// raises it again before scanning further, so every entry is scanned at most once. A
/// command that was already visited is skipped when it shows up again further back.
#[derive(Debug, Clone)]
pub struct MemoryWalker {
    entries: Vec<Entry>,
    prefix: String,
    origin_seq: usize,
    /// Exclusive upper bound of the entries still to be scanned.
    scan_from: usize,
    stack: Vec<usize>,
    top: usize,
    seen: HashSet<String>,
}

impl MemoryWalker {
    fn current_entry(&self) -> Option<&Entry> {
        let index = self.top.checked_sub(1)?;
        self.stack.get(index).and_then(|&it| self.entries.get(it))
    }
}

impl Walker for MemoryWalker {
    fn prefix(&self) -> &str { &self.prefix }

    fn current_seq(&self) -> usize {
        self.current_entry().map_or(self.origin_seq, |entry| entry.seq)
    }

    fn current_cmd(&self) -> &str {
        self.current_entry()
            .map_or(self.prefix.as_str(), |entry| entry.text.as_str())
    }

    fn prev(&mut self) -> Result<(), WalkerError> {
        if self.top < self.stack.len() {
            self.top += 1;
            return Ok(());
        }

        while self.scan_from > 0 {
            self.scan_from -= 1;
            let entry = &self.entries[self.scan_from];
            if entry.text.starts_with(&self.prefix) && !self.seen.contains(&entry.text) {
                self.seen.insert(entry.text.clone());
                self.stack.push(self.scan_from);
                self.top += 1;
                return Ok(());
            }
        }

        Err(WalkerError::EndOfHistory)
    }

    fn next(&mut self) -> Result<(), WalkerError> {
        if self.top == 0 {
            return Err(WalkerError::EndOfHistory);
        }
        self.top -= 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn history() -> MemoryHistory {
        MemoryHistory::with_cmds(["ls", "git status", "grep foo", "git log", "git status"])
    }

    #[test]
    fn test_add_cmd() {
        let mut history = MemoryHistory::new();
        history.max_size = 2;
        assert_eq!(history.add_cmd("test1"), Some(0));
        assert_eq!(history.add_cmd(""), None);
        assert_eq!(history.add_cmd("test1"), None);
        assert_eq!(history.add_cmd("test2"), Some(1));
        assert_eq!(history.add_cmd("test3"), Some(2));

        let texts: Vec<_> = history.entries().map(|it| it.text.as_str()).collect();
        assert_eq!(texts, vec!["test2", "test3"]);
    }

    #[test]
    fn test_prev_only_visits_matching_entries() {
        let mut walker = history().walker("gi");
        let mut visited = vec![];
        while walker.prev().is_ok() {
            assert!(walker.current_cmd().starts_with(walker.prefix()));
            visited.push((walker.current_seq(), walker.current_cmd().to_string()));
        }
        // The older "git status" (seq 1) is a duplicate of seq 4, so it is skipped.
        assert_eq!(
            visited,
            vec![(4, "git status".to_string()), (3, "git log".to_string())]
        );
    }

    #[test]
    fn test_prev_failure_leaves_state_unchanged() {
        let mut walker = history().walker("gre");
        walker.prev().unwrap();
        assert_eq!(walker.current_cmd(), "grep foo");

        assert_eq!(walker.prev(), Err(WalkerError::EndOfHistory));
        assert_eq!(walker.current_cmd(), "grep foo");
        assert_eq!(walker.current_seq(), 2);
    }

    #[test]
    fn test_next_returns_to_origin_then_fails() {
        let mut walker = history().walker("git");
        assert_eq!(walker.current_seq(), 5);
        assert_eq!(walker.current_cmd(), "git");

        walker.prev().unwrap();
        walker.prev().unwrap();
        assert_eq!(walker.current_cmd(), "git log");

        walker.next().unwrap();
        assert_eq!(walker.current_cmd(), "git status");
        walker.next().unwrap();
        assert_eq!(walker.current_cmd(), "git");
        assert_eq!(walker.current_seq(), 5);

        assert_eq!(walker.next(), Err(WalkerError::EndOfHistory));
        assert_eq!(walker.current_cmd(), "git");
    }

    #[test]
    fn test_prev_after_next_revisits_same_entries() {
        let mut walker = history().walker("");
        walker.prev().unwrap();
        walker.prev().unwrap();
        let second = walker.current_seq();
        walker.next().unwrap();
        walker.prev().unwrap();
        assert_eq!(walker.current_seq(), second);
    }

    #[test]
    fn test_no_match() {
        let mut walker = history().walker("zzz");
        assert_eq!(walker.prev(), Err(WalkerError::EndOfHistory));
        assert_eq!(walker.current_cmd(), "zzz");
        assert_eq!(walker.prev(), Err(WalkerError::EndOfHistory));
    }

    #[test]
    fn test_walker_is_a_snapshot() {
        let mut history = history();
        let mut walker = history.walker("");
        history.add_cmd("newer");
        walker.prev().unwrap();
        assert_eq!(walker.current_cmd(), "git status");
    }
}
