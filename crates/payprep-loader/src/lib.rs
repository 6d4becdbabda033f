pub mod errors;
pub mod loader;
pub mod schema;

pub use errors::LoaderError;
pub use loader::{load_transactions, load_transactions_with_mapping};
pub use schema::{ColumnMapping, REQUIRED_COLUMNS};
