//! # Type Resolution
//!
//! Turns raw parsed trees (YAML or JSON mappings, lists, scalars) into typed
//! [`Value`]s and [`Record`]s following the declared [`TypeExpr`] of each
//! schema field.
//!
//! Resolution is forgiving: a value that cannot be coerced is kept raw and a
//! [`ResolutionWarning`] is recorded, so unknown or future inputs still load.
//! Only the required fields of the root record are fatal. Record fields that
//! the schema does not declare are preserved in an extra-field channel.
//!
//! [`TypeExpr`]: crate::schema::TypeExpr

mod error;
mod record;
mod resolver;
mod value;


pub use error::{ResolutionError, ResolutionWarning, WarningKind};
pub use record::Record;
pub use resolver::Resolver;
pub use value::{Timestamp, Value};

pub(crate) use record::join_path;
