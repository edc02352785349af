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

use std::{fmt::Debug, sync::Arc};

use crate::{code_area_bindings, Handler, SafeHistory, DEFAULT_PROMPT, DEFAULT_TERM_SIZE};

/// Knobs for an [`crate::App`]. Fixed for the lifetime of the app.
pub struct AppConfig {
    pub prompt: String,

    /// Initial terminal size (columns, rows). Updated from resize events afterwards.
    pub term_size: (u16, u16),

    /// Where committed lines go and what the history walk reads from. When `None`,
    /// starting a history walk only produces a notification.
    pub history: Option<SafeHistory>,

    /// Gets first refusal on every event that reaches the code area, before the
    /// built-in editing keys.
    pub code_area_binding: Arc<dyn Handler>,

    /// Leave `prompt + line` on screen once a line is committed. When `false` the
    /// editing area is cleared instead.
    pub should_print_line_on_commit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            term_size: DEFAULT_TERM_SIZE,
            history: None,
            code_area_binding: Arc::new(code_area_bindings()),
            should_print_line_on_commit: true,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn with_history(mut self, history: SafeHistory) -> Self {
        self.history = Some(history);
        self
    }
}

impl Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("prompt", &self.prompt)
            .field("term_size", &self.term_size)
            .field("history", &self.history.as_ref().map(|_| "SafeHistory"))
            .field("should_print_line_on_commit", &self.should_print_line_on_commit)
            .finish_non_exhaustive()
    }
}
