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

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::{App, Buffer, KeyPress};

/// Built-in editing keys of the code area. This is what every event falls through to
/// when neither the active addon nor [`crate::AppConfig::code_area_binding`] claims it.
///
/// Any edit drops the pending overlay first, since its range was captured against the
/// content before the edit.
pub fn handle_code_area_builtin(app: &App, event: &Event) -> bool {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            handle_key(app, KeyPress::from(key_event))
        }
        Event::Paste(text) => {
            edit(app, |buffer| {
                buffer.insert_at_dot(text);
            });
            true
        }
        Event::Resize(columns, rows) => {
            app.mutate_state(|state| state.term_size = (*columns, *rows));
            true
        }
        _ => false,
    }
}

fn handle_key(app: &App, key: KeyPress) -> bool {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, KeyModifiers::NONE) => app.commit_code(),

        (KeyCode::Char('c'), KeyModifiers::CONTROL) => app.interrupt(),

        (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
            let is_empty = app.mutate_state(|state| {
                if state.buffer.is_empty() {
                    return true;
                }
                state.buffer.clear_pending();
                state.buffer.delete_after_dot();
                false
            });
            if is_empty {
                app.commit_eof();
            }
        }

        (KeyCode::Char('u'), KeyModifiers::CONTROL) => edit(app, |buffer| {
            buffer.kill_to_start();
        }),

        (KeyCode::Char('w'), KeyModifiers::CONTROL) => edit(app, |buffer| {
            buffer.kill_word_before_dot();
        }),

        #[cfg(feature = "emacs")]
        (KeyCode::Char('a'), KeyModifiers::CONTROL) => edit(app, Buffer::move_dot_to_start),

        #[cfg(feature = "emacs")]
        (KeyCode::Char('e'), KeyModifiers::CONTROL) => edit(app, Buffer::move_dot_to_end),

        (KeyCode::Char(ch), KeyModifiers::NONE) => {
            edit(app, |buffer| buffer.insert_at_dot(ch.encode_utf8(&mut [0; 4])));
        }

        (KeyCode::Backspace, KeyModifiers::NONE) => edit(app, |buffer| {
            buffer.delete_before_dot();
        }),

        (KeyCode::Delete, KeyModifiers::NONE) => edit(app, |buffer| {
            buffer.delete_after_dot();
        }),

        (KeyCode::Left, KeyModifiers::NONE) => edit(app, |buffer| {
            buffer.move_dot_left();
        }),

        (KeyCode::Right, KeyModifiers::NONE) => edit(app, |buffer| {
            buffer.move_dot_right();
        }),

        (KeyCode::Home, KeyModifiers::NONE) => edit(app, Buffer::move_dot_to_start),

        (KeyCode::End, KeyModifiers::NONE) => edit(app, Buffer::move_dot_to_end),

        _ => return false,
    }
    true
}

fn edit(app: &App, f: impl FnOnce(&mut Buffer)) {
    app.mutate_state(|state| {
        state.buffer.clear_pending();
        f(&mut state.buffer);
    });
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEvent;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{AppConfig, Pending};

    fn press(app: &App, code: KeyCode, modifiers: KeyModifiers) -> bool {
        handle_code_area_builtin(app, &Event::Key(KeyEvent::new(code, modifiers)))
    }

    fn type_text(app: &App, text: &str) {
        for ch in text.chars() {
            assert!(press(app, KeyCode::Char(ch), KeyModifiers::NONE));
        }
    }

    fn content_and_dot(app: &App) -> (String, usize) {
        app.mutate_state(|state| (state.buffer.content.clone(), state.buffer.dot))
    }

    #[test]
    fn test_typing_and_moving() {
        let app = App::new(AppConfig::default());
        type_text(&app, "lss");
        press(&app, KeyCode::Backspace, KeyModifiers::NONE);
        press(&app, KeyCode::Home, KeyModifiers::NONE);
        press(&app, KeyCode::Right, KeyModifiers::NONE);
        press(&app, KeyCode::Delete, KeyModifiers::NONE);
        assert_eq!(content_and_dot(&app), ("l".to_string(), 1));

        press(&app, KeyCode::Left, KeyModifiers::NONE);
        type_text(&app, "A");
        press(&app, KeyCode::End, KeyModifiers::NONE);
        assert_eq!(content_and_dot(&app), ("Al".to_string(), 2));
    }

    #[test]
    fn test_shifted_char_is_inserted() {
        let app = App::new(AppConfig::default());
        assert!(press(&app, KeyCode::Char('L'), KeyModifiers::SHIFT));
        assert_eq!(content_and_dot(&app), ("L".to_string(), 1));
    }

    #[test]
    fn test_kill_keys() {
        let app = App::new(AppConfig::default());
        type_text(&app, "git status");
        press(&app, KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(content_and_dot(&app), ("git ".to_string(), 4));
        press(&app, KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(content_and_dot(&app), (String::new(), 0));
    }

    #[cfg(feature = "emacs")]
    #[test]
    fn test_emacs_keys() {
        let app = App::new(AppConfig::default());
        type_text(&app, "abc");
        press(&app, KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(content_and_dot(&app).1, 0);
        press(&app, KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(content_and_dot(&app).1, 3);
    }

    #[test]
    fn test_edit_drops_pending() {
        let app = App::new(AppConfig::default());
        type_text(&app, "gi");
        app.mutate_state(|state| state.buffer.set_pending(Pending::new(2, 2, "t status")));
        type_text(&app, "t");
        app.mutate_state(|state| {
            assert_eq!(state.buffer.pending, None);
            assert_eq!(state.buffer.content, "git");
        });
    }

    #[test]
    fn test_ctrl_d_deletes_or_ends() {
        let app = App::new(AppConfig::default());
        type_text(&app, "ab");
        press(&app, KeyCode::Left, KeyModifiers::NONE);
        press(&app, KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(content_and_dot(&app), ("a".to_string(), 1));
    }

    #[test]
    fn test_resize_and_paste() {
        let app = App::new(AppConfig::default());
        assert!(handle_code_area_builtin(&app, &Event::Resize(100, 40)));
        assert!(handle_code_area_builtin(&app, &Event::Paste("echo hi".to_string())));
        let state = app.copy_state();
        assert_eq!(state.term_size, (100, 40));
        assert_eq!(state.buffer.content, "echo hi");
    }

    #[test]
    fn test_unknown_keys_are_declined() {
        let app = App::new(AppConfig::default());
        assert!(!press(&app, KeyCode::F(5), KeyModifiers::NONE));
        assert!(!press(&app, KeyCode::Up, KeyModifiers::NONE));
        assert!(!handle_code_area_builtin(&app, &Event::FocusGained));
    }
}
