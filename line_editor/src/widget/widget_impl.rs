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

use crossterm::{event::Event,
                style::{Attribute, Color, ContentStyle}};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::App;

/// Contract implemented by every overlay that can sit in the addon slot of
/// [`crate::AppState`].
///
/// The [App] handle is passed in explicitly, rather than captured by the widget, so that
/// a widget can call back into the control surface (eg: [`crate::histwalk::accept`])
/// without holding a reference to the state it lives in.
pub trait Widget: Send + Sync {
    /// Pure function of the widget's current state. The returned buffer is at most
    /// `width` columns wide and `height` rows tall (`height == 0` is legal and yields an
    /// empty buffer).
    fn render(&self, width: usize, height: usize) -> RenderBuffer;

    /// Try to consume `event`, returning whether it was consumed. This is called outside
    /// of the state lock, so it may freely call [`App::mutate_state`].
    fn handle(&self, app: &App, event: &Event) -> bool;

    /// Whether the widget wants to own the caret while it is active. When `false` the
    /// caret stays in the code area.
    fn focus(&self) -> bool;
}

/// One styled row of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderLine {
    pub text: String,
    pub style: ContentStyle,
}

/// Output of [Widget::render]. Every line is clipped to `width` display columns as it
/// is added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderBuffer {
    pub width: usize,
    pub lines: Vec<RenderLine>,
}

impl RenderBuffer {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            lines: vec![],
        }
    }

    /// A single row in the mode line style, eg: `" HISTORY #12 "`.
    pub fn mode_line(width: usize, text: &str) -> Self {
        let mut it = Self::new(width);
        it.push_line(text, mode_line_style());
        it
    }

    pub fn push_line(&mut self, text: &str, style: ContentStyle) {
        self.lines.push(RenderLine {
            text: clip_to_width(text, self.width),
            style,
        });
    }

    /// Keep only the rows in `from..to` (clamped to what exists).
    pub fn trim_to_lines(&mut self, from: usize, to: usize) {
        let to = to.min(self.lines.len());
        let from = from.min(to);
        self.lines.truncate(to);
        self.lines.drain(..from);
    }

    #[must_use]
    pub fn height(&self) -> usize { self.lines.len() }
}

pub fn mode_line_style() -> ContentStyle {
    ContentStyle {
        foreground_color: Some(Color::Black),
        background_color: Some(Color::Magenta),
        underline_color: None,
        attributes: Attribute::Bold.into(),
    }
}

/// Longest prefix of `text` (on grapheme boundaries) that fits in `width` columns.
#[must_use]
pub fn clip_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut it = String::new();
    for grapheme in text.graphemes(true) {
        let grapheme_width = UnicodeWidthStr::width(grapheme);
        if used + grapheme_width > width {
            break;
        }
        used += grapheme_width;
        it.push_str(grapheme);
    }
    it
}
