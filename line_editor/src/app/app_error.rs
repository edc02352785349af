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

use std::io;

use miette::Diagnostic;
use thiserror::Error;

/// Error returned from [`crate::App::read_code`]. These end the current read, but the
/// [`crate::App`] itself can be used for another one.
#[derive(Debug, Error, Diagnostic)]
pub enum AppError {
    /// An internal I/O error occurred, either reading input or painting.
    #[error(transparent)]
    #[diagnostic(code(r3bl_line_editor::app::io))]
    IO(#[from] io::Error),

    /// The input stream ended before a line was committed.
    #[error("input stream closed")]
    #[diagnostic(code(r3bl_line_editor::app::input_closed))]
    InputClosed,
}

/// Outcome of one [`crate::App::read_code`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ReadCodeEvent {
    /// The user committed a line of code.
    Code(String),

    /// The user pressed Ctrl-D on an empty line.
    Eof,

    /// The user pressed Ctrl-C.
    Interrupted,
}
