use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::{Error, Result, FIRST_COMMUNITY, KNOWN_MISSING_COMMUNITY, LAST_COMMUNITY};

/// One Add Health community network, indexed `1..=84`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Community(u8);

/// The two raw files published for every community.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    /// Edge list, `commN.dat`.
    Network,
    /// Node attributes, `commN_att.dat`.
    Attributes,
}

impl RawKind {
    pub const ALL: [RawKind; 2] = [RawKind::Network, RawKind::Attributes];
}

impl Community {
    pub const RANGE: RangeInclusive<u8> = FIRST_COMMUNITY..=LAST_COMMUNITY;

    pub fn new(index: u32) -> Result<Self> {
        u8::try_from(index)
            .ok()
            .filter(|i| Self::RANGE.contains(i))
            .map(Community)
            .ok_or(Error::CommunityOutOfRange(index))
    }

    /// Every community, in index order.
    pub fn all() -> impl Iterator<Item = Community> {
        Self::RANGE.map(Community)
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    /// Not on the archive, see [`KNOWN_MISSING_COMMUNITY`].
    pub fn is_known_missing(self) -> bool {
        self.0 == KNOWN_MISSING_COMMUNITY
    }

    pub fn raw_file_name(self, kind: RawKind) -> String {
        match kind {
            RawKind::Network => format!("comm{}.dat", self.0),
            RawKind::Attributes => format!("comm{}_att.dat", self.0),
        }
    }

    /// Both raw file names, network file first.
    pub fn raw_files(self) -> [String; 2] {
        RawKind::ALL.map(|kind| self.raw_file_name(kind))
    }

    pub fn graph_file_name(self) -> String {
        format!("community_{}.xml", self.0)
    }

    pub fn graph_path(self, data_dir: impl AsRef<Path>) -> PathBuf {
        data_dir.as_ref().join(self.graph_file_name())
    }
}

impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
