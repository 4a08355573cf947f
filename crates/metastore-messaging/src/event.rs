//! Event kinds and their wire names.

use std::fmt;

/// The catalog operation a message describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CreateDatabase,
    DropDatabase,
    CreateTable,
    AlterTable,
    DropTable,
    AddPartition,
    AlterPartition,
    DropPartition,
    CreateFunction,
    DropFunction,
    CreateIndex,
    DropIndex,
    AlterIndex,
    Insert,
    /// Any `eventType` this codec does not recognise.
    Unknown,
}

impl EventKind {
    /// Every kind a message can be built for.
    pub const ALL: [EventKind; 14] = [
        Self::CreateDatabase,
        Self::DropDatabase,
        Self::CreateTable,
        Self::AlterTable,
        Self::DropTable,
        Self::AddPartition,
        Self::AlterPartition,
        Self::DropPartition,
        Self::CreateFunction,
        Self::DropFunction,
        Self::CreateIndex,
        Self::DropIndex,
        Self::AlterIndex,
        Self::Insert,
    ];

    /// Wire name stored under the `eventType` key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateDatabase => "CREATE_DATABASE",
            Self::DropDatabase => "DROP_DATABASE",
            Self::CreateTable => "CREATE_TABLE",
            Self::AlterTable => "ALTER_TABLE",
            Self::DropTable => "DROP_TABLE",
            Self::AddPartition => "ADD_PARTITION",
            Self::AlterPartition => "ALTER_PARTITION",
            Self::DropPartition => "DROP_PARTITION",
            Self::CreateFunction => "CREATE_FUNCTION",
            Self::DropFunction => "DROP_FUNCTION",
            Self::CreateIndex => "CREATE_INDEX",
            Self::DropIndex => "DROP_INDEX",
            Self::AlterIndex => "ALTER_INDEX",
            Self::Insert => "INSERT",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse a wire name. Unrecognised names map to [`EventKind::Unknown`].
    pub fn parse(s: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
