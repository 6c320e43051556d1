//! Record Source Adapter
//!
//! Parameterized query execution against the registrar, teacher and login
//! stores, returning ordered [`Row`]s.

pub mod factory;
pub mod memory;
pub mod row;
pub mod traits;

pub use factory::create_record_source;
pub use memory::MemorySource;
pub use row::{Query, QueryParam, Row};
pub use traits::RecordSource;
