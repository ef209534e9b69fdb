use std::fmt;

use crate::provider::ItemVariant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Node id from before the last resync, or never issued by this table.
    StaleRow,
    /// Tried to insert under a row that is not a container.
    NotAContainer,
    /// The provider does not create this variant.
    UnsupportedVariant(ItemVariant),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleRow => write!(f, "row no longer exists"),
            Self::NotAContainer => write!(f, "row is not a container"),
            Self::UnsupportedVariant(variant) => {
                write!(f, "this list cannot create {variant:?} rows")
            }
        }
    }
}

impl std::error::Error for TableError {}
