//! Tubely Database Library
//!
//! Metadata store for video records. [`VideoRepository`] is the contract the upload
//! pipeline depends on; [`PgVideoRepository`] is the production implementation and
//! [`InMemoryVideoRepository`] serves development and tests.

pub mod memory;
pub mod postgres;
pub mod repository;

pub use memory::InMemoryVideoRepository;
pub use postgres::PgVideoRepository;
pub use repository::VideoRepository;
