//! Repositories: one unit struct per table with static async query fns.

pub mod page_repo;
pub mod version_repo;

pub use page_repo::PageRepo;
pub use version_repo::VersionRepo;
