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

use std::sync::Arc;

use crossterm::event::Event;
use futures_util::StreamExt;
use tokio::sync::{mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
                  Notify};

use crate::{compose, handle_code_area_builtin, lock, AppConfig, AppError, AppState,
            CrosstermEventResult, Painter, PinnedInputStream, ReadCodeEvent,
            SafeRawTerminal, StdMutex};

/// The application controller. Owns the [AppState] and is the only way to get at it.
///
/// Cloning is cheap and every clone refers to the same app, so a clone can be moved
/// into a key bound command, a spawned task, or another thread. All the methods here
/// are safe to call from any of them.
///
/// - [App::mutate_state] and [App::copy_state] are the single serialization point for
///   the state.
/// - [App::redraw] is a request; the paint happens inside [App::read_code], and several
///   requests that arrive before the next paint are coalesced into one.
/// - [App::commit_code], [App::commit_eof] and [App::interrupt] end the current
///   [App::read_code].
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

struct AppInner {
    config: AppConfig,
    safe_state: StdMutex<AppState>,
    redraw_signal: Notify,
    return_sender: UnboundedSender<ReadCodeEvent>,
    return_receiver: tokio::sync::Mutex<UnboundedReceiver<ReadCodeEvent>>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.inner.config)
            .field("state", &*lock(&self.inner.safe_state))
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let (return_sender, return_receiver) = unbounded_channel();
        let state = AppState::new(config.term_size);
        Self {
            inner: Arc::new(AppInner {
                config,
                safe_state: StdMutex::new(state),
                redraw_signal: Notify::new(),
                return_sender,
                return_receiver: tokio::sync::Mutex::new(return_receiver),
            }),
        }
    }

    pub fn config(&self) -> &AppConfig { &self.inner.config }

    /// Run `f` with exclusive access to the state, and return what it returns. No two
    /// calls interleave, and each one sees everything the previous one did.
    ///
    /// Don't call back into [App::mutate_state], [App::copy_state] or [App::read_state]
    /// from inside `f`, the lock is not reentrant.
    pub fn mutate_state<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let mut state = lock(&self.inner.safe_state);
        f(&mut state)
    }

    /// Consistent snapshot of the state, taken under the same lock as
    /// [App::mutate_state].
    pub fn copy_state(&self) -> AppState { lock(&self.inner.safe_state).clone() }

    /// Read only access to the state under the same lock as [App::mutate_state],
    /// without cloning it.
    pub fn read_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        let state = lock(&self.inner.safe_state);
        f(&state)
    }

    /// Show `note` to the user above the editing area. Fire and forget.
    pub fn notify(&self, note: impl Into<String>) {
        let note = note.into();
        tracing::info!(message = "notify", note);
        self.mutate_state(|state| state.notes.push(note));
        self.redraw();
    }

    /// Request a repaint.
    pub fn redraw(&self) { self.inner.redraw_signal.notify_one(); }

    /// End the current read with the buffer content. A pending overlay is applied
    /// first and the addon slot is emptied, so what was on screen is what gets returned.
    pub fn commit_code(&self) {
        let code = self.mutate_state(|state| {
            state.addon = None;
            state.buffer.apply_pending();
            state.buffer.content.clone()
        });
        tracing::debug!(message = "commit code", code);
        self.send_return(ReadCodeEvent::Code(code));
    }

    pub fn commit_eof(&self) { self.send_return(ReadCodeEvent::Eof); }

    pub fn interrupt(&self) { self.send_return(ReadCodeEvent::Interrupted); }

    fn send_return(&self, event: ReadCodeEvent) {
        if let Err(error) = self.inner.return_sender.send(event) {
            tracing::warn!(message = "return channel closed", ?error);
        }
    }

    /// Append `entry` to the configured history, returning its sequence number.
    /// `None` if there is no history, or the entry was not recorded.
    pub fn add_history_entry(&self, entry: impl Into<String>) -> Option<usize> {
        let history = self.inner.config.history.as_ref()?;
        lock(history).add_cmd(entry)
    }

    /// Dispatch one input event. The active addon gets first refusal, anything it does
    /// not consume goes to the code area. Always requests a redraw.
    ///
    /// The addon is looked up under the state lock but driven outside of it, so that
    /// its [`crate::Widget::handle`] can mutate the state.
    pub fn handle_event(&self, event: &Event) {
        let maybe_addon = self.read_state(|state| state.addon.clone());
        let handled = match &maybe_addon {
            Some(addon) => addon.widget().handle(self, event),
            None => false,
        };
        if !handled {
            self.handle_code_area_event(event);
        }
        self.redraw();
    }

    /// Code area key handling: [`AppConfig::code_area_binding`] first, then the
    /// built-in editing keys.
    pub fn handle_code_area_event(&self, event: &Event) -> bool {
        self.inner.config.code_area_binding.handle(self, event)
            || handle_code_area_builtin(self, event)
    }

    /// Read one line of code. This resets the code area, then repaints and dispatches
    /// input events until a line is committed, EOF is requested, or the user interrupts.
    ///
    /// # Errors
    ///
    /// - [`AppError::IO`] if reading an event or painting fails.
    /// - [`AppError::InputClosed`] if `input_stream` ends first.
    pub async fn read_code(
        &self,
        input_stream: &mut PinnedInputStream<CrosstermEventResult>,
        raw_terminal: SafeRawTerminal,
    ) -> Result<ReadCodeEvent, AppError> {
        let mut return_receiver = self.inner.return_receiver.lock().await;
        while return_receiver.try_recv().is_ok() {}
        self.mutate_state(AppState::reset_code_area);

        let mut painter = Painter::default();
        self.redraw();

        let result = loop {
            tokio::select! {
                biased;

                // Commit signals, sent from a key handler or from another thread.
                maybe_return = return_receiver.recv() => {
                    match maybe_return {
                        Some(event) => break Ok(event),
                        None => break Err(AppError::InputClosed),
                    }
                },

                // Coalesced redraw requests.
                () = self.inner.redraw_signal.notified() => {
                    if let Err(error) = self.paint(&mut painter, &raw_terminal) {
                        break Err(error.into());
                    }
                },

                // Input events.
                maybe_event = input_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            tracing::debug!(message = "read_code -> event", ?event);
                            self.handle_event(&event);
                        }
                        Some(Err(error)) => break Err(error.into()),
                        None => break Err(AppError::InputClosed),
                    }
                },
            }
        };

        self.finish(&mut painter, &raw_terminal, result.as_ref().ok())?;
        tracing::debug!(message = "read_code -> done", ?result);
        result
    }

    fn paint(
        &self,
        painter: &mut Painter,
        raw_terminal: &SafeRawTerminal,
    ) -> std::io::Result<()> {
        let (notes, state) = self.mutate_state(|state| {
            let notes = std::mem::take(&mut state.notes);
            (notes, state.clone())
        });
        let frame = compose(&state, &self.inner.config.prompt);
        painter.paint(&mut *lock(raw_terminal), &notes, &frame)
    }

    /// Close whatever is left of the editing session and leave the terminal ready
    /// for the next read.
    fn finish(
        &self,
        painter: &mut Painter,
        raw_terminal: &SafeRawTerminal,
        maybe_event: Option<&ReadCodeEvent>,
    ) -> std::io::Result<()> {
        let (notes, state) = self.mutate_state(|state| {
            state.addon = None;
            state.buffer.clear_pending();
            (std::mem::take(&mut state.notes), state.clone())
        });

        let mut term = lock(raw_terminal);
        match maybe_event {
            Some(ReadCodeEvent::Code(_)) if !self.inner.config.should_print_line_on_commit => {
                painter.clear(&mut *term)
            }
            _ => {
                let frame = compose(&state, &self.inner.config.prompt);
                painter.finish(&mut *term, &notes, &frame)
            }
        }
    }
}
