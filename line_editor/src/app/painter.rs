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

use std::io::{self, Write};

use crossterm::{cursor,
                style::{ContentStyle, Print, PrintStyledContent, StyledContent},
                terminal::{Clear, ClearType::FromCursorDown},
                QueueableCommand};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::{AppState, RenderLine};

/// Everything below the notes: `prompt + preview` wrapped to the terminal width,
/// followed by whatever the active addon renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<RenderLine>,

    /// Column, row (relative to the first line of the frame).
    pub cursor: (usize, usize),
}

/// Lay out `state` for painting. Pure, does not touch the terminal.
#[must_use]
pub fn compose(state: &AppState, prompt: &str) -> Frame {
    let width = usize::from(state.term_size.0).max(1);
    let height = usize::from(state.term_size.1);

    let preview = state.buffer.preview();
    let text = format!("{prompt}{}", preview.text);
    let (rows, mut cursor) = wrap_to_width(&text, prompt.len() + preview.dot, width);
    let code_rows = rows.len();

    let mut lines: Vec<RenderLine> = rows
        .into_iter()
        .map(|text| RenderLine {
            text,
            style: ContentStyle::default(),
        })
        .collect();

    if let Some(addon) = &state.addon {
        let widget = addon.widget();
        let rendered = widget.render(width, height.saturating_sub(code_rows));
        if widget.focus() && rendered.height() > 0 {
            cursor = (0, code_rows);
        }
        lines.extend(rendered.lines);
    }

    Frame { lines, cursor }
}

/// Break `text` into rows at most `width` columns wide, and find the row and column
/// of the grapheme at byte offset `cursor_offset`.
fn wrap_to_width(
    text: &str,
    cursor_offset: usize,
    width: usize,
) -> (Vec<String>, (usize, usize)) {
    let mut rows = vec![String::new()];
    let mut col = 0;
    let mut cursor = None;

    for (offset, grapheme) in text.grapheme_indices(true) {
        let grapheme_width = UnicodeWidthStr::width(grapheme);
        if col > 0 && col + grapheme_width > width {
            rows.push(String::new());
            col = 0;
        }
        if cursor.is_none() && offset >= cursor_offset {
            cursor = Some((col, rows.len() - 1));
        }
        if let Some(row) = rows.last_mut() {
            row.push_str(grapheme);
        }
        col += grapheme_width;
    }

    let cursor = cursor.unwrap_or_else(|| {
        if col >= width {
            rows.push(String::new());
            col = 0;
        }
        (col, rows.len() - 1)
    });

    (rows, cursor)
}

fn to_u16(it: usize) -> u16 { u16::try_from(it).unwrap_or(u16::MAX) }

/// Paints [Frame]s in place. Remembers which row of the last frame the cursor was left
/// on, so the next paint can move back to the top of the frame and clear it first.
#[derive(Debug, Default)]
pub struct Painter {
    cursor_row: usize,
}

impl Painter {
    /// Print `notes` above the editing area, then repaint `frame` and place the cursor.
    pub fn paint(
        &mut self,
        term: &mut dyn Write,
        notes: &[String],
        frame: &Frame,
    ) -> io::Result<()> {
        self.queue_clear(term)?;
        queue_notes(term, notes)?;
        queue_lines(term, &frame.lines)?;

        let last_row = frame.lines.len().saturating_sub(1);
        let (col, row) = frame.cursor;
        let row = row.min(last_row);
        if last_row > row {
            term.queue(cursor::MoveUp(to_u16(last_row - row)))?;
        }
        term.queue(cursor::MoveToColumn(to_u16(col)))?;
        self.cursor_row = row;

        term.flush()
    }

    /// Repaint `frame` one last time and leave the cursor at the start of the line
    /// below it, ready for whatever is printed next.
    pub fn finish(
        &mut self,
        term: &mut dyn Write,
        notes: &[String],
        frame: &Frame,
    ) -> io::Result<()> {
        self.queue_clear(term)?;
        queue_notes(term, notes)?;
        queue_lines(term, &frame.lines)?;
        term.queue(Print("\r\n"))?;
        self.cursor_row = 0;
        term.flush()
    }

    /// Erase the last frame.
    pub fn clear(&mut self, term: &mut dyn Write) -> io::Result<()> {
        self.queue_clear(term)?;
        self.cursor_row = 0;
        term.flush()
    }

    fn queue_clear(&self, term: &mut dyn Write) -> io::Result<()> {
        if self.cursor_row > 0 {
            term.queue(cursor::MoveUp(to_u16(self.cursor_row)))?;
        }
        term.queue(cursor::MoveToColumn(0))?;
        term.queue(Clear(FromCursorDown))?;
        Ok(())
    }
}

fn queue_notes(term: &mut dyn Write, notes: &[String]) -> io::Result<()> {
    for note in notes {
        term.queue(Print(note))?;
        term.queue(Print("\r\n"))?;
    }
    Ok(())
}

fn queue_lines(term: &mut dyn Write, lines: &[RenderLine]) -> io::Result<()> {
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            term.queue(Print("\r\n"))?;
        }
        term.queue(PrintStyledContent(StyledContent::new(
            line.style,
            line.text.as_str(),
        )))?;
    }
    Ok(())
}
