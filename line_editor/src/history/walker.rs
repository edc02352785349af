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

/// Boundary error: there is no further matching entry in the requested direction. The
/// walker's observable state is unchanged when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum WalkerError {
    #[error("end of history")]
    #[diagnostic(code(r3bl_line_editor::history::end_of_history))]
    EndOfHistory,
}

/// A prefix filtered, bidirectional walk over past commands. It is constructed already
/// bound to a prefix and a starting position (just past the newest entry), and every
/// entry it lands on starts with [Walker::prefix].
pub trait Walker: Send {
    /// Text before the caret when the walk started. Fixed for the life of the walker.
    fn prefix(&self) -> &str;

    /// Sequence number of the current entry. At the starting position this is one past
    /// the newest entry.
    fn current_seq(&self) -> usize;

    /// Command at the current position. At the starting position this is the prefix.
    fn current_cmd(&self) -> &str;

    /// Move to the nearest older matching entry.
    ///
    /// # Errors
    ///
    /// [`WalkerError::EndOfHistory`] if there is none.
    fn prev(&mut self) -> Result<(), WalkerError>;

    /// Move back towards the starting position.
    ///
    /// # Errors
    ///
    /// [`WalkerError::EndOfHistory`] if already at the starting position.
    fn next(&mut self) -> Result<(), WalkerError>;
}
