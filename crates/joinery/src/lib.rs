pub mod db;
pub use db::Db;

mod engine;

mod hooks;

mod model;
pub use model::{FindOptions, Instance, ModelHandle};

pub mod options;
pub use options::{DefineOptions, Logging, Options, SyncOptions};

pub mod relation;
pub use relation::{AddOptions, BelongsToManyHandle};

pub use joinery_core::{
    driver::{self, Dialect},
    schema::{self, Attribute, BelongsToManyOptions, ModelDef, Type},
    stmt::{Direction, Record, Value},
    Error, Result,
};
