//! Backend adapters for the query federation layer.
//!
//! Each adapter translates the generic query intent into one backend's
//! native query shape and normalizes the raw results into uniform JSON
//! records. Drivers sit below the adapters and own transport; adapters
//! never interpolate condition values into query text.

pub mod document;
pub mod driver;
pub mod es;
pub mod relational;
pub mod search;
pub mod sql;
pub mod sqlite;

pub use document::DocumentAdapter;
pub use driver::{DocumentDriver, DriverError, SearchDriver, SqlDriver, SqlRow, SqlValue};
pub use es::{EsClient, EsConfig};
pub use relational::RelationalAdapter;
pub use search::SearchAdapter;
pub use sql::{SqlDialect, SqlQuery, build_select, is_safe_identifier};
pub use sqlite::SqliteDriver;
