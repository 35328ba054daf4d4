mod reader;
mod repo;

#[cfg(test)]
pub(crate) mod fake;

pub use reader::RepositoryReader;
pub use repo::GitRepo;
