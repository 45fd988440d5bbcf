//! The closed set of protocol versions this engine negotiates, in chronological
//! (and `Ord`) order. Declaration order matters: `derive(PartialOrd, Ord)`
//! ranks variants by position, so `V2024_11_05 < V2025_03_26 < V2025_06_18 <
//! V2025_11_25` falls out of the enum itself rather than a hand-written
//! comparison.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum McpVersion {
    V2024_11_05,
    V2025_03_26,
    V2025_06_18,
    V2025_11_25,
}

impl McpVersion {
    pub const LATEST: McpVersion = McpVersion::V2025_11_25;

    pub fn parse_version(s: &str) -> Option<Self> {
        match s {
            "2024-11-05" => Some(McpVersion::V2024_11_05),
            "2025-03-26" => Some(McpVersion::V2025_03_26),
            "2025-06-18" => Some(McpVersion::V2025_06_18),
            "2025-11-25" => Some(McpVersion::V2025_11_25),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            McpVersion::V2024_11_05 => "2024-11-05",
            McpVersion::V2025_03_26 => "2025-03-26",
            McpVersion::V2025_06_18 => "2025-06-18",
            McpVersion::V2025_11_25 => "2025-11-25",
        }
    }

    /// Streamable HTTP (SSE-capable transport) was introduced in 2025-03-26;
    /// 2024-11-05 only ever spoke the older HTTP+SSE transport pair.
    pub fn supports_streamable_http(&self) -> bool {
        *self >= McpVersion::V2025_03_26
    }

    /// Structured `_meta`, `progressToken`, and `cursor` landed in 2025-06-18.
    pub fn supports_meta_fields(&self) -> bool {
        *self >= McpVersion::V2025_06_18
    }

    pub fn supports_progress_and_cursor(&self) -> bool {
        *self >= McpVersion::V2025_06_18
    }

    pub fn supports_elicitation(&self) -> bool {
        *self >= McpVersion::V2025_06_18
    }

    /// Batch rejection (400 on a JSON array body) applies from 2025-06-18 on.
    pub fn rejects_batches(&self) -> bool {
        *self >= McpVersion::V2025_06_18
    }

    pub fn supports_tasks(&self) -> bool {
        *self >= McpVersion::V2025_11_25
    }

    pub fn supports_icons(&self) -> bool {
        *self >= McpVersion::V2025_11_25
    }
}

impl Default for McpVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

impl fmt::Display for McpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for McpVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_version(s).ok_or_else(|| format!("unsupported protocol version: {s}"))
    }
}
