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

//! History walk addon: shows the nearest older history entry that starts with the text
//! before the caret as a pending overlay, and lets key bound commands step through the
//! matches with [prev] and [next] before committing ([accept]) or discarding ([close])
//! the preview.
//!
//! Every function here takes the [App] explicitly and is safe to call from any thread.

use std::{fmt::Debug, sync::Arc};

use crossterm::event::{Event, KeyEventKind};
use miette::Diagnostic;
use thiserror::Error;

use crate::{floor_char_boundary, lock, Addon, App, Buffer, DummyHandler, Handler,
            Pending, RenderBuffer, StdMutex, Walker, WalkerError, Widget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Diagnostic)]
pub enum HistWalkError {
    /// A walk control call was made while the addon slot does not hold a history walk.
    #[error("history walk is not active")]
    #[diagnostic(code(r3bl_line_editor::histwalk::inactive))]
    Inactive,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Walker(#[from] WalkerError),
}

/// Arguments for [start].
#[derive(Default)]
pub struct HistWalkConfig {
    /// Gets first refusal on events while the walk is active. Defaults to
    /// [DummyHandler].
    pub binding: Option<Box<dyn Handler>>,

    /// What to walk. Starting without one only produces a notification.
    pub walker: Option<Box<dyn Walker>>,
}

impl Debug for HistWalkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistWalkConfig")
            .field("binding", &self.binding.as_ref().map(|_| "Handler"))
            .field("walker", &self.walker.as_ref().map(|it| it.prefix().to_string()))
            .finish()
    }
}

/// The widget that sits in the addon slot while a walk is active. It owns its walker;
/// the walker is only ever advanced under [`App::mutate_state`].
pub struct HistWalkWidget {
    binding: Box<dyn Handler>,
    walker: StdMutex<Box<dyn Walker>>,
    /// [Walker::current_seq] before the first step, ie: at the starting position.
    origin_seq: usize,
}

impl Debug for HistWalkWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let walker = lock(&self.walker);
        f.debug_struct("HistWalkWidget")
            .field("prefix", &walker.prefix())
            .field("current_seq", &walker.current_seq())
            .field("current_cmd", &walker.current_cmd())
            .finish_non_exhaustive()
    }
}

impl Widget for HistWalkWidget {
    fn render(&self, width: usize, height: usize) -> RenderBuffer {
        let seq = lock(&self.walker).current_seq();
        let mut it = RenderBuffer::mode_line(width, &format!(" HISTORY #{seq} "));
        it.trim_to_lines(0, height);
        it
    }

    /// Keys the binding does not claim end the walk: the preview is accepted and the
    /// key is replayed on the code area, so typing simply continues editing.
    fn handle(&self, app: &App, event: &Event) -> bool {
        if self.binding.handle(app, event) {
            return true;
        }
        // Resize, focus and mouse events leave the walk alone.
        let is_input = match event {
            Event::Key(key_event) => key_event.kind != KeyEventKind::Release,
            Event::Paste(_) => true,
            _ => false,
        };
        if !is_input {
            return false;
        }
        accept(app);
        app.handle_code_area_event(event);
        true
    }

    fn focus(&self) -> bool { false }
}

/// The overlay that shows the walker's current command: everything after the prefix
/// replaces everything after the prefix in the buffer. `None` at the starting position,
/// where the buffer is shown as it was typed.
fn preview_pending(walker: &dyn Walker, origin_seq: usize, buffer: &Buffer) -> Option<Pending> {
    if walker.current_seq() == origin_seq {
        return None;
    }
    let prefix_len = walker.prefix().len();
    let suffix = walker.current_cmd().get(prefix_len..).unwrap_or_default();
    Some(Pending::new(
        floor_char_boundary(&buffer.content, prefix_len),
        buffer.content.len(),
        suffix,
    ))
}

fn show_preview(widget: &HistWalkWidget, walker: &dyn Walker, buffer: &mut Buffer) {
    match preview_pending(walker, widget.origin_seq, buffer) {
        Some(pending) => buffer.set_pending(pending),
        None => buffer.clear_pending(),
    }
}

/// Start a walk. The walker is advanced once right away, so the first thing shown is
/// the newest match. If there is no walker or nothing matches, the user is notified and
/// nothing else changes.
pub fn start(app: &App, config: HistWalkConfig) {
    let Some(mut walker) = config.walker else {
        app.notify("no history to walk");
        return;
    };

    let origin_seq = walker.current_seq();
    if let Err(error) = walker.prev() {
        tracing::debug!(message = "histwalk -> no match", prefix = walker.prefix());
        app.notify(error.to_string());
        return;
    }

    tracing::debug!(
        message = "histwalk -> start",
        prefix = walker.prefix(),
        seq = walker.current_seq()
    );

    let widget = Arc::new(HistWalkWidget {
        binding: config.binding.unwrap_or_else(|| Box::new(DummyHandler)),
        walker: StdMutex::new(walker),
        origin_seq,
    });

    app.mutate_state(|state| {
        show_preview(&widget, &**lock(&widget.walker), &mut state.buffer);
        state.addon = Some(Addon::HistoryWalk(widget.clone()));
    });
    app.redraw();
}

/// Walk to the next older match.
///
/// # Errors
///
/// - [`HistWalkError::Inactive`] if no history walk is active.
/// - [`HistWalkError::Walker`] if there is no older match. The preview is unchanged.
pub fn prev(app: &App) -> Result<(), HistWalkError> { walk(app, |walker| walker.prev()) }

/// Walk back towards the newest match, and finally to the text the walk started from.
///
/// # Errors
///
/// - [`HistWalkError::Inactive`] if no history walk is active.
/// - [`HistWalkError::Walker`] if the walk is already back where it started.
pub fn next(app: &App) -> Result<(), HistWalkError> { walk(app, |walker| walker.next()) }

fn walk(
    app: &App,
    step: impl FnOnce(&mut dyn Walker) -> Result<(), WalkerError>,
) -> Result<(), HistWalkError> {
    let seq = app.mutate_state(|state| {
        let Some(Addon::HistoryWalk(widget)) = &state.addon else {
            return Err(HistWalkError::Inactive);
        };
        let widget = widget.clone();
        let mut walker = lock(&widget.walker);

        step(&mut **walker)?;

        show_preview(&widget, &**walker, &mut state.buffer);
        Ok(walker.current_seq())
    })?;

    tracing::debug!(message = "histwalk -> walk", seq);
    app.redraw();
    Ok(())
}

/// Discard the preview and end the walk. Does nothing if no walk is active.
pub fn close(app: &App) {
    let closed = app.mutate_state(|state| {
        if !is_history_walk(state.addon.as_ref()) {
            return false;
        }
        state.addon = None;
        state.buffer.clear_pending();
        true
    });
    if closed {
        tracing::debug!(message = "histwalk -> close");
        app.redraw();
    }
}

/// Commit the preview into the buffer and end the walk. Does nothing if no walk is
/// active.
pub fn accept(app: &App) {
    let accepted = app.mutate_state(|state| {
        if !is_history_walk(state.addon.as_ref()) {
            return None;
        }
        state.addon = None;
        state.buffer.apply_pending();
        Some(state.buffer.content.clone())
    });
    if let Some(content) = accepted {
        tracing::debug!(message = "histwalk -> accept", content);
        app.redraw();
    }
}

/// Whether the addon slot holds a history walk.
#[must_use]
pub fn is_active(app: &App) -> bool {
    app.read_state(|state| is_history_walk(state.addon.as_ref()))
}

fn is_history_walk(addon: Option<&Addon>) -> bool {
    addon.is_some_and(Addon::is_history_walk)
}
