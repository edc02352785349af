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

use crate::{Addon, Buffer, DEFAULT_TERM_SIZE};

/// The single source of truth for a running editor. It is only ever touched through
/// [`crate::App::mutate_state`] and [`crate::App::copy_state`].
#[derive(Debug, Clone)]
pub struct AppState {
    pub buffer: Buffer,

    /// Single occupancy slot. Starting an addon while another one is active replaces it.
    pub addon: Option<Addon>,

    /// Notifications waiting to be printed above the editing area.
    pub notes: Vec<String>,

    /// Columns, rows.
    pub term_size: (u16, u16),
}

impl Default for AppState {
    fn default() -> Self { Self::new(DEFAULT_TERM_SIZE) }
}

impl AppState {
    pub fn new(term_size: (u16, u16)) -> Self {
        Self {
            buffer: Buffer::default(),
            addon: None,
            notes: vec![],
            term_size,
        }
    }

    /// Drop the addon and the buffer, keep everything else.
    pub fn reset_code_area(&mut self) {
        self.addon = None;
        self.buffer = Buffer::default();
    }
}
