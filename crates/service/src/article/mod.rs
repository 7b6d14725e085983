pub mod repository;
pub mod memory;
pub mod service;

pub use memory::MemoryArticleRepository;
pub use repository::{ArticleRepository, SeaOrmArticleRepository};
pub use service::ArticleService;
