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

//! Drive [App::read_code] with scripted key presses, and check both what it returns and
//! what was painted.

use std::sync::Arc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use r3bl_line_editor::{test_fixtures::{gen_input_stream, StdoutMock},
                       App, AppConfig, CrosstermEventResult, MemoryHistory,
                       ReadCodeEvent, SafeRawTerminal, StdMutex};

fn key(code: KeyCode) -> CrosstermEventResult {
    Ok(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

fn chars(text: &str) -> Vec<CrosstermEventResult> {
    text.chars().map(|ch| key(KeyCode::Char(ch))).collect()
}

fn app_with_history(cmds: &[&str]) -> App {
    let history = MemoryHistory::with_cmds(cmds.iter().copied());
    App::new(AppConfig::default().with_history(Arc::new(StdMutex::new(history))))
}

fn terminal(stdout_mock: &StdoutMock) -> SafeRawTerminal {
    Arc::new(StdMutex::new(stdout_mock.clone()))
}

#[tokio::test]
async fn test_walk_and_accept_with_enter() {
    let app = app_with_history(&["ls", "git status", "grep foo"]);
    let stdout_mock = StdoutMock::default();

    let mut events = chars("gi");
    events.push(key(KeyCode::Up));
    events.push(key(KeyCode::Enter));
    let mut input_stream = gen_input_stream(events);

    let result = app.read_code(&mut input_stream, terminal(&stdout_mock)).await;
    assert_eq!(result.unwrap(), ReadCodeEvent::Code("git status".to_string()));

    let output = stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
    assert!(output.contains("HISTORY #1"));
    assert!(output.contains("> git status"));
    assert!(app.copy_state().addon.is_none());
}

#[tokio::test]
async fn test_walk_then_keep_typing() {
    let app = app_with_history(&["ls", "git status", "git log"]);
    let stdout_mock = StdoutMock::default();

    let mut events = chars("git");
    events.push(key(KeyCode::Up));
    events.push(key(KeyCode::Up));
    events.extend(chars(" -n"));
    events.push(key(KeyCode::Enter));
    let mut input_stream = gen_input_stream(events);

    let result = app.read_code(&mut input_stream, terminal(&stdout_mock)).await;
    assert_eq!(result.unwrap(), ReadCodeEvent::Code("git status -n".to_string()));
}

#[tokio::test]
async fn test_walk_then_escape() {
    let app = app_with_history(&["ls", "git status"]);
    let stdout_mock = StdoutMock::default();

    let mut events = chars("gi");
    events.push(key(KeyCode::Up));
    events.push(key(KeyCode::Esc));
    events.extend(chars("t"));
    events.push(key(KeyCode::Enter));
    let mut input_stream = gen_input_stream(events);

    let result = app.read_code(&mut input_stream, terminal(&stdout_mock)).await;
    assert_eq!(result.unwrap(), ReadCodeEvent::Code("git".to_string()));
}

#[tokio::test]
async fn test_no_match_is_notified() {
    let app = app_with_history(&["ls"]);
    let stdout_mock = StdoutMock::default();

    let mut events = chars("zzz");
    events.push(key(KeyCode::Up));
    events.push(key(KeyCode::Enter));
    let mut input_stream = gen_input_stream(events);

    let result = app.read_code(&mut input_stream, terminal(&stdout_mock)).await;
    assert_eq!(result.unwrap(), ReadCodeEvent::Code("zzz".to_string()));

    let output = stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
    assert!(output.contains("end of history"));
    assert!(!output.contains("HISTORY #"));
}

#[tokio::test]
async fn test_committed_lines_feed_the_next_walk() {
    let app = app_with_history(&[]);
    let stdout_mock = StdoutMock::default();

    let mut events = chars("echo one");
    events.push(key(KeyCode::Enter));
    events.push(key(KeyCode::Up));
    events.push(key(KeyCode::Enter));
    let mut input_stream = gen_input_stream(events);

    let first = app.read_code(&mut input_stream, terminal(&stdout_mock)).await.unwrap();
    let ReadCodeEvent::Code(code) = first else {
        panic!("expected a line of code, got {first:?}");
    };
    assert_eq!(app.add_history_entry(code), Some(0));

    let second = app.read_code(&mut input_stream, terminal(&stdout_mock)).await;
    assert_eq!(second.unwrap(), ReadCodeEvent::Code("echo one".to_string()));
}
