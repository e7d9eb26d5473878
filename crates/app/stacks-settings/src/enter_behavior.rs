use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use specta::Type;

use crate::error::Error;

/// What pressing Enter on a launcher result does.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Type, Default)]
pub enum EnterBehavior {
    #[default]
    #[serde(rename = "copy")]
    Copy,
    #[serde(rename = "paste-or-copy")]
    PasteOrCopy,
}

impl EnterBehavior {
    /// All choices, in display order.
    pub const ALL: [EnterBehavior; 2] = [EnterBehavior::Copy, EnterBehavior::PasteOrCopy];

    pub fn as_str(self) -> &'static str {
        match self {
            EnterBehavior::Copy => "copy",
            EnterBehavior::PasteOrCopy => "paste-or-copy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EnterBehavior::Copy => "Copy",
            EnterBehavior::PasteOrCopy => "Paste if possible, else copy",
        }
    }
}

impl fmt::Display for EnterBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnterBehavior {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnterBehavior::ALL
            .into_iter()
            .find(|behavior| behavior.as_str() == s)
            .ok_or_else(|| Error::configuration(format!("unknown enter behavior: {s}")))
    }
}
