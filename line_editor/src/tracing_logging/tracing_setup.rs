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

use miette::IntoDiagnostic;
use tracing_core::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, registry::LookupSpan,
                         util::SubscriberInitExt, Layer};

use super::{rolling_file_appender_impl, DisplayPreference, TracingConfig, WriterConfig};

pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_thread_ids(true)
            .with_thread_names(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true)
    };
}

/// Initialize the global tracing subscriber with the provided [TracingConfig]. Does
/// nothing if the config has no writers.
///
/// # Errors
///
/// If the log file can't be created, or a global subscriber is already set.
pub fn init(tracing_config: TracingConfig) -> miette::Result<()> {
    match try_create_layers(tracing_config)? {
        Some(layers) => tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .into_diagnostic(),
        None => Ok(()),
    }
}

/// Returns the layers without initializing anything. Eg:
/// `try_create_layers(..)?.map(|layers| tracing_subscriber::registry().with(layers).init());`
///
/// # Errors
///
/// If the log file can't be created.
pub fn try_create_layers(
    tracing_config: TracingConfig,
) -> miette::Result<Option<Vec<Box<DynLayer<tracing_subscriber::Registry>>>>> {
    let Ok(writer_config) = WriterConfig::try_from(tracing_config.writers.as_slice())
    else {
        return Ok(None);
    };

    let level_filter = tracing_config.get_level_filter();

    let mut layers: Vec<Box<DynLayer<tracing_subscriber::Registry>>> =
        vec![Box::new(level_filter)];

    if let Some(layer) = try_create_display_layer(
        writer_config,
        level_filter,
        tracing_config.preferred_display,
    ) {
        layers.push(layer);
    }

    if let Some(layer) =
        try_create_file_layer(writer_config, level_filter, &tracing_config.log_file_path)?
    {
        layers.push(layer);
    }

    Ok(Some(layers))
}

fn try_create_display_layer<S>(
    writer_config: WriterConfig,
    level_filter: LevelFilter,
    preferred_display: DisplayPreference,
) -> Option<Box<DynLayer<S>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!();

    match writer_config {
        WriterConfig::DisplayAndFile | WriterConfig::Display => match preferred_display {
            DisplayPreference::Stdout => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stdout)
                    .with_filter(level_filter),
            )),
            DisplayPreference::Stderr => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stderr)
                    .with_filter(level_filter),
            )),
        },
        WriterConfig::File => None,
    }
}

fn try_create_file_layer<S>(
    writer_config: WriterConfig,
    level_filter: LevelFilter,
    log_file_path: &str,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!();

    Ok(match writer_config {
        WriterConfig::DisplayAndFile | WriterConfig::File => {
            let file = rolling_file_appender_impl::try_create(log_file_path)?;
            Some(Box::new(
                fmt_layer
                    .with_ansi(false)
                    .with_writer(file)
                    .with_filter(level_filter),
            ))
        }
        WriterConfig::Display => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracing_logging::WriterArg;

    #[test]
    fn test_no_writers_no_layers() {
        let config = TracingConfig {
            writers: vec![WriterArg::None],
            ..TracingConfig::default()
        };
        assert!(try_create_layers(config).unwrap().is_none());
    }

    #[test]
    fn test_file_and_display_layers() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = TracingConfig {
            writers: vec![WriterArg::File, WriterArg::Stdout],
            log_file_path: temp_dir.path().join("debug.log").to_string_lossy().into(),
            ..TracingConfig::default()
        };
        let layers = try_create_layers(config).unwrap().unwrap();
        // Level filter, display, file.
        assert_eq!(layers.len(), 3);
    }

    #[test]
    fn test_file_logging_writes_to_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_file_path = temp_dir.path().join("debug.log");
        let config = TracingConfig::new_file(log_file_path.to_string_lossy());
        let layers = try_create_layers(config).unwrap().unwrap();

        let subscriber = tracing_subscriber::registry().with(layers);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(message = "hello from the line editor");
        });

        let contents = std::fs::read_to_string(&log_file_path).unwrap();
        assert!(contents.contains("hello from the line editor"));
    }
}
