use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use specta::Type;

use crate::error::Error;

/// Modifier keys that can take part in the activation chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Shift,
    Ctrl,
    Alt,
    Command,
}

impl Modifier {
    /// All modifiers, in display order.
    pub const ALL: [Modifier; 4] = [
        Modifier::Shift,
        Modifier::Ctrl,
        Modifier::Alt,
        Modifier::Command,
    ];

    /// Key used in the persisted shortcut map.
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Shift => "shift",
            Modifier::Ctrl => "ctrl",
            Modifier::Alt => "alt",
            Modifier::Command => "command",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Modifier::Shift => "Shift",
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Command => "Command",
        }
    }

    /// Spelling used by global shortcut registration ("Control+Space").
    fn accelerator(self) -> &'static str {
        match self {
            Modifier::Shift => "Shift",
            Modifier::Ctrl => "Control",
            Modifier::Alt => "Alt",
            Modifier::Command => "Command",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modifier::ALL
            .into_iter()
            .find(|modifier| modifier.as_str() == s)
            .ok_or_else(|| Error::configuration(format!("unknown modifier: {s}")))
    }
}

/// One activation combination: modifier name to membership.
///
/// Serializes as a plain `{ "shift": true, ... }` map and is sent to the
/// backend unchanged. Missing keys mean "not held". Names outside
/// [`Modifier::ALL`] are kept but never take part in activation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Type, Default)]
#[serde(transparent)]
pub struct ShortcutSet(BTreeMap<String, bool>);

impl ShortcutSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn is_held(&self, modifier: Modifier) -> bool {
        self.contains(modifier.as_str())
    }

    /// Flip membership of `name`.
    pub fn toggle(&mut self, name: &str) {
        let held = self.contains(name);
        self.0.insert(name.to_owned(), !held);
    }

    /// Copy of this set with `name` flipped.
    pub fn toggled(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.toggle(name);
        next
    }

    /// Recognized modifiers that are held, in display order.
    pub fn modifiers(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::ALL
            .into_iter()
            .filter(|modifier| self.is_held(*modifier))
    }

    /// Held names that are not recognized modifiers.
    pub fn unrecognized(&self) -> impl Iterator<Item = &str> + '_ {
        self.0
            .iter()
            .filter(|(name, held)| **held && name.parse::<Modifier>().is_err())
            .map(|(name, _)| name.as_str())
    }

    /// Chord in global shortcut registration form, e.g. `Shift+Command+Space`.
    pub fn accelerator(&self) -> String {
        self.modifiers()
            .map(Modifier::accelerator)
            .chain(std::iter::once("Space"))
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl FromIterator<Modifier> for ShortcutSet {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|modifier| (modifier.as_str().to_owned(), true))
                .collect(),
        )
    }
}

impl fmt::Display for ShortcutSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.accelerator())
    }
}
