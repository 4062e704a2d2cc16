pub mod catalog;
pub mod todo;

pub use catalog::{CatalogEntry, CatalogKind};
pub use todo::Todo;
