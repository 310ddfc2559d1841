//! Session configuration.

use std::{fmt, sync::Arc, time::Duration};

/// Options a [`Db`](crate::Db) session is built with.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Append bound parameter values to logged statements.
    pub log_query_parameters: bool,

    /// Log statements after they run, together with how long they took.
    pub benchmark: bool,

    /// Where executed statements are reported.
    pub logging: Logging,

    /// Defaults applied to every model definition.
    pub define: DefineOptions,
}

impl Options {
    pub fn log_query_parameters(mut self, enabled: bool) -> Options {
        self.log_query_parameters = enabled;
        self
    }

    pub fn benchmark(mut self, enabled: bool) -> Options {
        self.benchmark = enabled;
        self
    }

    pub fn logging(mut self, logging: Logging) -> Options {
        self.logging = logging;
        self
    }

    pub fn define(mut self, define: DefineOptions) -> Options {
        self.define = define;
        self
    }
}

/// Model defaults. Individual models may override them.
#[derive(Debug, Clone)]
pub struct DefineOptions {
    /// Add `createdAt` and `updatedAt` attributes.
    pub timestamps: bool,

    /// Use the model name as the table name instead of its plural.
    pub freeze_table_name: bool,
}

impl DefineOptions {
    pub fn timestamps(mut self, timestamps: bool) -> DefineOptions {
        self.timestamps = timestamps;
        self
    }

    pub fn freeze_table_name(mut self, freeze: bool) -> DefineOptions {
        self.freeze_table_name = freeze;
        self
    }
}

impl Default for DefineOptions {
    fn default() -> Self {
        DefineOptions {
            timestamps: true,
            freeze_table_name: false,
        }
    }
}

/// Statement log sink.
#[derive(Clone, Default)]
pub enum Logging {
    /// Report through the `log` facade at `info` on target `joinery::sql`.
    #[default]
    Log,

    Off,

    /// Hand each entry to a callback. The duration is set when
    /// benchmarking.
    Custom(Arc<dyn Fn(&str, Option<Duration>) + Send + Sync>),
}

impl Logging {
    pub fn custom(f: impl Fn(&str, Option<Duration>) + Send + Sync + 'static) -> Logging {
        Logging::Custom(Arc::new(f))
    }

    pub(crate) fn emit(&self, message: &str, elapsed: Option<Duration>) {
        match self {
            Logging::Log => match elapsed {
                Some(elapsed) => {
                    log::info!(target: "joinery::sql", "{message} Elapsed time: {elapsed:?}")
                }
                None => log::info!(target: "joinery::sql", "{message}"),
            },
            Logging::Off => {}
            Logging::Custom(f) => f(message, elapsed),
        }
    }
}

impl fmt::Debug for Logging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logging::Log => f.write_str("Log"),
            Logging::Off => f.write_str("Off"),
            Logging::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Options of [`Db::sync`](crate::Db::sync).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Drop existing tables before creating them.
    pub force: bool,
}

impl SyncOptions {
    pub fn force() -> SyncOptions {
        SyncOptions { force: true }
    }
}
