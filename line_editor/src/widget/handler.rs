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

use std::{collections::HashMap, fmt::Debug};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::App;

/// Something that gets first refusal on an input event, eg: the key bindings of an
/// addon. Returns whether the event was consumed.
pub trait Handler: Send + Sync {
    fn handle(&self, app: &App, event: &Event) -> bool;
}

impl<F> Handler for F
where
    F: Fn(&App, &Event) -> bool + Send + Sync,
{
    fn handle(&self, app: &App, event: &Event) -> bool { self(app, event) }
}

/// Declines every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyHandler;

impl Handler for DummyHandler {
    fn handle(&self, _app: &App, _event: &Event) -> bool { false }
}

/// Normalized key press used as the key of [MapBindings]. `SHIFT` is dropped for
/// character keys since it is already reflected in the character itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        let modifiers = match code {
            KeyCode::Char(_) => modifiers.difference(KeyModifiers::SHIFT),
            _ => modifiers,
        };
        Self { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> Self { Self::new(code, KeyModifiers::NONE) }

    pub fn ctrl(ch: char) -> Self { Self::new(KeyCode::Char(ch), KeyModifiers::CONTROL) }
}

impl From<&KeyEvent> for KeyPress {
    fn from(key_event: &KeyEvent) -> Self { Self::new(key_event.code, key_event.modifiers) }
}

pub type BoundCommand = Box<dyn Fn(&App) + Send + Sync>;

/// Key bindings: a map from [KeyPress] to a command that receives the [App] handle.
/// Only [`KeyEventKind::Press`] events are matched.
#[derive(Default)]
pub struct MapBindings {
    bindings: HashMap<KeyPress, BoundCommand>,
}

impl MapBindings {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn bind(mut self, key: KeyPress, command: impl Fn(&App) + Send + Sync + 'static) -> Self {
        self.bindings.insert(key, Box::new(command));
        self
    }

    #[must_use]
    pub fn contains(&self, key: &KeyPress) -> bool { self.bindings.contains_key(key) }

    #[must_use]
    pub fn len(&self) -> usize { self.bindings.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.bindings.is_empty() }
}

impl Debug for MapBindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.bindings.keys()).finish()
    }
}

impl Handler for MapBindings {
    fn handle(&self, app: &App, event: &Event) -> bool {
        let Event::Key(key_event) = event else {
            return false;
        };
        if key_event.kind != KeyEventKind::Press {
            return false;
        }
        match self.bindings.get(&KeyPress::from(key_event)) {
            Some(command) => {
                command(app);
                true
            }
            None => false,
        }
    }
}
