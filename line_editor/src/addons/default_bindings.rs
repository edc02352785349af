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

use crossterm::event::KeyCode;

use crate::{histwalk::{self, HistWalkConfig, HistWalkError},
            lock, App, KeyPress, MapBindings, Walker};

/// Default [`crate::AppConfig::code_area_binding`]: Up starts a history walk.
pub fn code_area_bindings() -> MapBindings {
    MapBindings::new().bind(KeyPress::plain(KeyCode::Up), start_history_walk)
}

/// Bindings that are active while a history walk is. Any other key accepts the walk
/// and is then handled by the code area.
pub fn histwalk_bindings() -> MapBindings {
    MapBindings::new()
        .bind(KeyPress::plain(KeyCode::Up), |app| {
            notify_on_error(app, histwalk::prev(app));
        })
        .bind(KeyPress::plain(KeyCode::Down), |app| {
            notify_on_error(app, histwalk::next(app));
        })
        .bind(KeyPress::plain(KeyCode::Esc), histwalk::close)
        .bind(KeyPress::ctrl('g'), histwalk::close)
}

/// Walk the configured history, filtered by the text before the caret.
pub fn start_history_walk(app: &App) {
    let prefix = app.mutate_state(|state| state.buffer.content_before_dot().to_string());
    let walker = app
        .config()
        .history
        .as_ref()
        .map(|history| Box::new(lock(history).walker(prefix)) as Box<dyn Walker>);

    histwalk::start(
        app,
        HistWalkConfig {
            binding: Some(Box::new(histwalk_bindings())),
            walker,
        },
    );
}

fn notify_on_error(app: &App, result: Result<(), HistWalkError>) {
    if let Err(error) = result {
        app.notify(error.to_string());
    }
}
