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

use crate::{HistWalkWidget, Widget};

/// Occupant of the single addon slot in [`crate::AppState`]. The slot holds at most one
/// addon; starting another one replaces it. Matching on the variant is how callers ask
/// "is the history walk active", instead of a runtime type check.
///
/// Variants hold an [Arc] so that [`crate::App::copy_state`] is cheap, and so that the
/// widget can be driven (eg: [Widget::handle]) after the state lock has been released.
#[derive(Clone)]
pub enum Addon {
    HistoryWalk(Arc<HistWalkWidget>),
    /// Any other overlay, eg: a navigation or completion widget.
    Custom(Arc<dyn Widget>),
}

impl Addon {
    #[must_use]
    pub fn widget(&self) -> &dyn Widget {
        match self {
            Addon::HistoryWalk(widget) => widget.as_ref(),
            Addon::Custom(widget) => widget.as_ref(),
        }
    }

    #[must_use]
    pub fn is_history_walk(&self) -> bool { matches!(self, Addon::HistoryWalk(_)) }
}

impl Debug for Addon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Addon::HistoryWalk(widget) => f.debug_tuple("HistoryWalk").field(widget).finish(),
            Addon::Custom(_) => f.write_str("Custom"),
        }
    }
}
