//! Per-membership privilege tiers.
//!
//! One [`PrivilegeHandle`] exists per (nick, channel) pair. The same handle
//! is stored in the channel's member map and in the nick's channel map, so a
//! mode change applied through either side is visible from both.

use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A privilege tier, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Owner,
    Admin,
    Op,
    HalfOp,
    Voice,
}

impl Tier {
    /// All tiers from highest to lowest.
    pub const ALL: [Tier; 5] = [Tier::Owner, Tier::Admin, Tier::Op, Tier::HalfOp, Tier::Voice];

    /// Channel mode character that grants this tier (`q a o h v`).
    pub fn from_mode_char(c: char) -> Option<Self> {
        match c {
            'q' => Some(Tier::Owner),
            'a' => Some(Tier::Admin),
            'o' => Some(Tier::Op),
            'h' => Some(Tier::HalfOp),
            'v' => Some(Tier::Voice),
            _ => None,
        }
    }

    /// NAMES prefix glyph for this tier (`~ & @ % +`).
    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            '~' => Some(Tier::Owner),
            '&' => Some(Tier::Admin),
            '@' => Some(Tier::Op),
            '%' => Some(Tier::HalfOp),
            '+' => Some(Tier::Voice),
            _ => None,
        }
    }

    pub fn mode_char(self) -> char {
        match self {
            Tier::Owner => 'q',
            Tier::Admin => 'a',
            Tier::Op => 'o',
            Tier::HalfOp => 'h',
            Tier::Voice => 'v',
        }
    }

    pub fn prefix(self) -> char {
        match self {
            Tier::Owner => '~',
            Tier::Admin => '&',
            Tier::Op => '@',
            Tier::HalfOp => '%',
            Tier::Voice => '+',
        }
    }
}

/// Member privileges (owner, admin, op, halfop, voice). Tiers are
/// independent: a member can hold op and voice at once.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Privileges {
    pub owner: bool,  // +q (~)
    pub admin: bool,  // +a (&)
    pub op: bool,     // +o (@)
    pub halfop: bool, // +h (%)
    pub voice: bool,  // +v (+)
}

impl Privileges {
    pub fn has(&self, tier: Tier) -> bool {
        match tier {
            Tier::Owner => self.owner,
            Tier::Admin => self.admin,
            Tier::Op => self.op,
            Tier::HalfOp => self.halfop,
            Tier::Voice => self.voice,
        }
    }

    pub fn set(&mut self, tier: Tier, value: bool) {
        match tier {
            Tier::Owner => self.owner = value,
            Tier::Admin => self.admin = value,
            Tier::Op => self.op = value,
            Tier::HalfOp => self.halfop = value,
            Tier::Voice => self.voice = value,
        }
    }

    /// Get the highest prefix character for this member.
    /// Priority: ~ > & > @ > % > +
    pub fn prefix_char(&self) -> Option<char> {
        Tier::ALL
            .into_iter()
            .find(|tier| self.has(*tier))
            .map(Tier::prefix)
    }

    /// Get all prefix characters for this member, highest to lowest.
    pub fn all_prefix_chars(&self) -> String {
        Tier::ALL
            .into_iter()
            .filter(|tier| self.has(*tier))
            .map(Tier::prefix)
            .collect()
    }

    /// Check if this member has operator privileges (op or higher).
    pub fn has_op_or_higher(&self) -> bool {
        self.owner || self.admin || self.op
    }

    /// Check if this member has halfop or higher (can kick, change some modes).
    pub fn has_halfop_or_higher(&self) -> bool {
        self.owner || self.admin || self.op || self.halfop
    }

    /// Check if this member has voice or higher (can speak in moderated channel).
    pub fn has_voice_or_higher(&self) -> bool {
        self.owner || self.admin || self.op || self.halfop || self.voice
    }
}

/// Shared handle to one membership's privileges.
///
/// Cloning the handle shares the record; it never copies it. Writes are
/// crate-private and only happen while the tracker lock is held.
#[derive(Clone, Default)]
pub struct PrivilegeHandle(Arc<Mutex<Privileges>>);

impl PrivilegeHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Current privileges.
    pub fn get(&self) -> Privileges {
        *self.0.lock()
    }

    pub(crate) fn set(&self, tier: Tier, value: bool) {
        self.0.lock().set(tier, value);
    }

    /// Whether both handles point at the same record.
    pub fn ptr_eq(&self, other: &PrivilegeHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for PrivilegeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivilegeHandle").field(&self.get()).finish()
    }
}
