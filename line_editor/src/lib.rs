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

//! The `r3bl_line_editor` library is the line editing core of a shell like REPL. It
//! renders an editable command buffer, dispatches terminal input events, and lets an
//! addon widget (eg: the history walk) temporarily take over key handling and the mode
//! line without losing the buffer underneath.
//!
//! # How the pieces fit
//!
//! 1. [`App`] owns the [`AppState`]: the code area [`Buffer`] and a single addon slot.
//!    Every read and write goes through [`App::mutate_state`] or [`App::copy_state`],
//!    so key bound commands running on other threads or tasks can safely drive it.
//! 2. [`App::read_code`] reads [crossterm] events from an input stream. The active
//!    addon gets first refusal on each event, then [`AppConfig::code_area_binding`],
//!    then the built-in editing keys. Redraw requests are coalesced and painted on the
//!    loop's own schedule.
//! 3. A [`Buffer`] can carry a [`Pending`] overlay: a proposed replacement of part of its
//!    content that is shown, but not applied, until it is committed or discarded.
//! 4. The [`histwalk`] addon uses a [`Walker`] over past commands to preview the nearest
//!    match for the text before the caret as a pending overlay. Up and Down step through
//!    the matches, Esc discards the preview, and any other key accepts it and keeps
//!    editing.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use crossterm::event::EventStream;
//! use r3bl_line_editor::{App, AppConfig, CrosstermEventResult, MemoryHistory,
//!                        PinnedInputStream, ReadCodeEvent, StdMutex};
//!
//! # async fn run() -> miette::Result<()> {
//! let history = Arc::new(StdMutex::new(MemoryHistory::new()));
//! let app = App::new(AppConfig::default().with_history(history));
//!
//! let mut input_stream: PinnedInputStream<CrosstermEventResult> =
//!     Box::pin(EventStream::new());
//! let raw_terminal = Arc::new(StdMutex::new(std::io::stdout()));
//!
//! crossterm::terminal::enable_raw_mode().ok();
//! while let ReadCodeEvent::Code(code) =
//!     app.read_code(&mut input_stream, raw_terminal.clone()).await?
//! {
//!     app.add_history_entry(code);
//! }
//! crossterm::terminal::disable_raw_mode().ok();
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! The crate logs with [tracing]. Use [`tracing_logging::init`] to send the logs to a
//! file (the terminal is busy showing the editor).

// https://github.com/rust-lang/rust-clippy
// https://rust-lang.github.io/rust-clippy/master/index.html
#![warn(rust_2018_idioms)]
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod addons;
pub mod app;
pub mod code_area;
pub mod history;
pub mod test_fixtures;
pub mod tracing_logging;
pub mod widget;

// Re-export the public API.
pub use addons::*;
pub use app::*;
pub use code_area::*;
pub use history::*;
pub use widget::*;

// Type aliases.
use std::{io::Error, pin::Pin, sync::{Arc, MutexGuard, PoisonError}};

use crossterm::event::Event;
use futures_core::Stream;

pub type StdMutex<T> = std::sync::Mutex<T>;

pub type SendRawTerminal = dyn std::io::Write + Send;
pub type SafeRawTerminal = Arc<StdMutex<SendRawTerminal>>;

pub type SafeHistory = Arc<StdMutex<MemoryHistory>>;

pub type CrosstermEventResult = Result<Event, Error>;
pub type PinnedInputStream<T> = Pin<Box<dyn Stream<Item = T>>>;

// Constants.
pub const HISTORY_SIZE_MAX: usize = 1_000;
pub const DEFAULT_PROMPT: &str = "> ";
pub const DEFAULT_TERM_SIZE: (u16, u16) = (80, 24);

/// Lock `mutex`, recovering the guard if a previous holder panicked. Every mutation is
/// a single closure under one lock, so the data is never left half updated.
pub(crate) fn lock<T: ?Sized>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
