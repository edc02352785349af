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

use strum_macros::{Display, EnumString};
use tracing_core::LevelFilter;

/// Where and how much to log. Pass it to [`crate::tracing_logging::init`].
///
/// Fields:
/// - `writers`: zero or more [WriterArg]s. With none (or only [WriterArg::None]) logging
///   is off.
/// - `level`: [tracing::Level] to log at.
/// - `log_file_path`: eg: `/tmp/line_editor.log`. Used by [WriterArg::File].
/// - `preferred_display`: used by [WriterArg::Stdout].
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub writers: Vec<WriterArg>,
    pub level: tracing::Level,
    pub log_file_path: String,
    pub preferred_display: DisplayPreference,
}

/// Parsed from a command line or config string, eg: `"stdout"` or `"file"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum WriterArg {
    Stdout,
    File,
    #[strum(serialize = "none", serialize = "")]
    None,
}

/// The display used by [WriterArg::Stdout]. Logging to stderr keeps the log lines
/// from interleaving with what the editor paints on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayPreference {
    Stdout,
    #[default]
    Stderr,
}

/// What [WriterArg]s boil down to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterConfig {
    Display,
    File,
    DisplayAndFile,
}

impl TryFrom<&[WriterArg]> for WriterConfig {
    type Error = &'static str;

    fn try_from(writers: &[WriterArg]) -> Result<Self, Self::Error> {
        let contains_file_writer = writers.contains(&WriterArg::File);
        let contains_stdout_writer = writers.contains(&WriterArg::Stdout);
        match (contains_file_writer, contains_stdout_writer) {
            (true, true) => Ok(WriterConfig::DisplayAndFile),
            (true, false) => Ok(WriterConfig::File),
            (false, true) => Ok(WriterConfig::Display),
            (false, false) => Err("No valid writer configuration found"),
        }
    }
}

impl TracingConfig {
    /// Log to `log_file_path` only, at `DEBUG`.
    pub fn new_file(log_file_path: impl Into<String>) -> Self {
        Self {
            writers: vec![WriterArg::File],
            level: tracing::Level::DEBUG,
            log_file_path: log_file_path.into(),
            preferred_display: DisplayPreference::default(),
        }
    }

    pub fn get_level_filter(&self) -> LevelFilter { LevelFilter::from_level(self.level) }
}

impl Default for TracingConfig {
    fn default() -> Self { Self::new_file("line_editor_debug.log") }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_writer_arg_from_str() {
        assert_eq!(WriterArg::from_str("stdout"), Ok(WriterArg::Stdout));
        assert_eq!(WriterArg::from_str("file"), Ok(WriterArg::File));
        assert_eq!(WriterArg::from_str("none"), Ok(WriterArg::None));
        assert_eq!(WriterArg::from_str(""), Ok(WriterArg::None));
        assert!(WriterArg::from_str("syslog").is_err());
    }

    #[test]
    fn test_writer_config_from_args() {
        use WriterArg::{File, None, Stdout};
        assert_eq!(
            WriterConfig::try_from([File, Stdout].as_slice()),
            Ok(WriterConfig::DisplayAndFile)
        );
        assert_eq!(WriterConfig::try_from([File].as_slice()), Ok(WriterConfig::File));
        assert_eq!(
            WriterConfig::try_from([Stdout, None].as_slice()),
            Ok(WriterConfig::Display)
        );
        assert!(WriterConfig::try_from([None].as_slice()).is_err());
    }
}
