//! Service layer for articles.
//! - `ArticleRepository` is the storage seam; SeaORM and in-memory backends implement it.
//! - `ArticleService` applies the write rules before touching storage.

pub mod errors;
pub mod article;
#[cfg(test)]
pub mod test_support;
