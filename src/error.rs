use thiserror::Error;

pub type Result<T> = std::result::Result<T, VisagitError>;

#[derive(Error, Debug)]
pub enum VisagitError {
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Report file error: {0}")]
    Snapshot(String),
    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Other: {0}")]
    Other(String),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
}

// gix errors are large; keep the enum small by boxing them on conversion.
impl From<gix::object::find::existing::Error> for VisagitError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        VisagitError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for VisagitError {
    fn from(err: gix::object::commit::Error) -> Self {
        VisagitError::Commit(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for VisagitError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        VisagitError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for VisagitError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        VisagitError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for VisagitError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        VisagitError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for VisagitError {
    fn from(err: gix::objs::decode::Error) -> Self {
        VisagitError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for VisagitError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        VisagitError::DiffTreeToTree(Box::new(err))
    }
}

impl From<gix::discover::Error> for VisagitError {
    fn from(err: gix::discover::Error) -> Self {
        VisagitError::GitDiscover(Box::new(err))
    }
}
