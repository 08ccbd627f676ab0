/// Kind of a server response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseType {
    SuccessAtom,
    SuccessSequence,
    SuccessPartial,
    WaitComplete,
    ServerInfo,
    ClientError,
    CompileError,
    RuntimeError,
}

impl ResponseType {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            1 => Self::SuccessAtom,
            2 => Self::SuccessSequence,
            3 => Self::SuccessPartial,
            4 => Self::WaitComplete,
            5 => Self::ServerInfo,
            16 => Self::ClientError,
            17 => Self::CompileError,
            18 => Self::RuntimeError,
            _ => return None,
        })
    }

    pub fn code(self) -> i64 {
        match self {
            Self::SuccessAtom => 1,
            Self::SuccessSequence => 2,
            Self::SuccessPartial => 3,
            Self::WaitComplete => 4,
            Self::ServerInfo => 5,
            Self::ClientError => 16,
            Self::CompileError => 17,
            Self::RuntimeError => 18,
        }
    }

    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::ClientError | Self::CompileError | Self::RuntimeError
        )
    }

    /// More batches may follow this one.
    pub fn is_partial(self) -> bool {
        self == Self::SuccessPartial
    }
}

/// Category of a runtime error response.
pub mod error_type {
    pub const INTERNAL: i64 = 1000000;
    pub const RESOURCE_LIMIT: i64 = 2000000;
    pub const QUERY_LOGIC: i64 = 3000000;
    pub const NON_EXISTENCE: i64 = 3100000;
    pub const OP_FAILED: i64 = 4100000;
    pub const OP_INDETERMINATE: i64 = 4200000;
    pub const USER: i64 = 5000000;
    pub const PERMISSION_ERROR: i64 = 6000000;
}

/// Extra information attached to a response, it tells which kind of stream a cursor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseNote {
    SequenceFeed,
    AtomFeed,
    OrderByLimitFeed,
    UnionedFeed,
    IncludesStates,
}

impl ResponseNote {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            1 => Self::SequenceFeed,
            2 => Self::AtomFeed,
            3 => Self::OrderByLimitFeed,
            4 => Self::UnionedFeed,
            5 => Self::IncludesStates,
            _ => return None,
        })
    }
}
