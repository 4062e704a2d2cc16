pub mod catalog;
pub mod seed;
pub mod todo;

pub use catalog::CatalogService;
pub use seed::SeedService;
pub use todo::TodoService;
