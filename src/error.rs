use std::path::PathBuf;

use thiserror::Error;

use crate::validate::Violation;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Community index {0} is outside of 1..=84")]
    CommunityOutOfRange(u32),

    #[error("Couldn't create the raw directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    ParseSelector(String),
    #[error("Node #{0} in the graph has no id")]
    ParseMissingNodeId(usize),
    #[error("Couldn't parse {value:?} as {attr_type} for key {key}")]
    ParseValue {
        key: String,
        attr_type: String,
        value: String,
    },

    #[error("Couldn't load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        source: Box<Error>,
    },
    #[error("Community {community} failed validation: {violation}")]
    Invalid { community: u8, violation: Violation },
}
