//! Mode string application.
//!
//! Mode lines from the server are applied as-is and never rejected: a
//! truncated argument list or a bad limit value degrades to skipping or a
//! default instead of failing the whole line.

use tracing::{debug, trace};

use super::{Channel, Nick, Tier};

impl Channel {
    /// Apply a channel mode string and its positional arguments.
    ///
    /// Polarity starts as removal until a `+` is seen. Returns the number of
    /// arguments consumed.
    pub(crate) fn apply_modes(&mut self, modes: &str, args: &[String]) -> usize {
        let mut adding = false;
        let mut args = args.iter();
        let mut consumed = 0;

        for c in modes.chars() {
            match c {
                '+' => adding = true,
                '-' => adding = false,
                'k' if adding => {
                    let Some(key) = args.next() else {
                        trace!(channel = %self.name, "+k without argument");
                        continue;
                    };
                    consumed += 1;
                    self.modes.key = Some(key.clone());
                }
                'k' => self.modes.key = None,
                'l' if adding => {
                    let Some(limit) = args.next() else {
                        trace!(channel = %self.name, "+l without argument");
                        continue;
                    };
                    consumed += 1;
                    self.modes.limit = limit.parse().unwrap_or(0);
                }
                'l' => self.modes.limit = 0,
                _ => {
                    if let Some(tier) = Tier::from_mode_char(c) {
                        let Some(target) = args.next() else {
                            trace!(channel = %self.name, mode = %c, "member mode without argument");
                            continue;
                        };
                        // The argument belongs to this mode even when the
                        // target is unknown.
                        consumed += 1;
                        match self.members.get(target) {
                            Some(privs) => privs.set(tier, adding),
                            None => {
                                debug!(channel = %self.name, nick = %target, mode = %c, "mode for unknown member")
                            }
                        }
                    } else if let Some(flag) = self.modes.flag_mut(c) {
                        *flag = adding;
                    } else {
                        trace!(channel = %self.name, mode = %c, "ignoring unknown channel mode");
                    }
                }
            }
        }

        consumed
    }
}

impl Nick {
    /// Apply a user mode string. Unknown characters are ignored.
    pub(crate) fn apply_modes(&mut self, modes: &str) {
        let mut adding = false;
        for c in modes.chars() {
            match c {
                '+' => adding = true,
                '-' => adding = false,
                _ => match self.modes.flag_mut(c) {
                    Some(flag) => *flag = adding,
                    None => trace!(nick = %self.nick, mode = %c, "ignoring unknown user mode"),
                },
            }
        }
    }
}
