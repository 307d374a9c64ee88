//! Add Health community networks: fetch the raw `.dat` files from the web
//! archive and check the node attributes of the generated GraphML files.

mod macros;

pub mod community;
mod error;
pub mod parse;
pub mod process;
pub mod request;
pub mod validate;

pub use error::{Error, Result};

/// First and last community index in the Add Health collection.
pub const FIRST_COMMUNITY: u8 = 1;
pub const LAST_COMMUNITY: u8 = 84;
/// Community whose raw files were never archived. Fetching it always fails.
pub const KNOWN_MISSING_COMMUNITY: u8 = 48;

/// Linton Freeman's page is gone, so everything goes through the web archive.
/// `0if_` asks for the raw archived bytes without the wayback toolbar.
pub const ARCHIVE_URL_PREFIX: &str = "https://web.archive.org/web/0if_/http://moreno.ss.uci.edu/";

/// Where the fetcher puts the downloaded `.dat` files.
pub const RAW_DIR: &str = "addhealth/raw";
/// Where the GraphML files produced from the raw files live.
pub const DATA_DIR: &str = "addhealth/data";
