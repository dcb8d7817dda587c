//! Property-based tests for the membership invariant.
//!
//! Uses proptest to generate random sequences of membership-affecting lines
//! and verify that after every step:
//! 1. Nick and channel sides agree, sharing one privilege record per pair
//! 2. Renames never lose or duplicate memberships
//! 3. Mode lines never panic, whatever their argument count

mod common;

use common::Harness;
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

/// Small pools so that events collide on the same nicks and channels.
fn nick_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["mirror", "alice", "bob", "carol", "dave"]).prop_map(String::from)
}

fn channel_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["#x", "#y", "&z"]).prop_map(String::from)
}

/// Mode strings mixing tiers, argument modes, flags and junk.
fn modes_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[+-]?[qaohvklntmsb+-]{1,6}").expect("valid regex")
}

fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (nick_strategy(), channel_strategy()).prop_map(|(n, c)| format!(":{n}!u@h JOIN {c}")),
        (nick_strategy(), channel_strategy()).prop_map(|(n, c)| format!(":{n}!u@h PART {c}")),
        (channel_strategy(), nick_strategy()).prop_map(|(c, n)| format!(":op!o@h KICK {c} {n}")),
        nick_strategy().prop_map(|n| format!(":{n}!u@h QUIT :gone")),
        (nick_strategy(), nick_strategy()).prop_map(|(a, b)| format!(":{a}!u@h NICK {b}")),
        (
            channel_strategy(),
            modes_strategy(),
            prop::collection::vec(nick_strategy(), 0..4)
        )
            .prop_map(|(c, m, args)| format!(":op!o@h MODE {c} {m} {}", args.join(" "))
                .trim_end()
                .to_string()),
        (
            channel_strategy(),
            prop::collection::vec(("[~&@%+]?", nick_strategy()), 1..5)
        )
            .prop_map(|(c, names)| {
                let tokens: Vec<String> = names.into_iter().map(|(p, n)| p + &n).collect();
                format!(":irc.test 353 mirror = {c} :{}", tokens.join(" "))
            }),
    ]
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn membership_stays_consistent(lines in prop::collection::vec(line_strategy(), 1..40)) {
        let h = Harness::new("mirror");
        for line in &lines {
            h.feed(line);
            let violations = h.state.consistency_violations();
            prop_assert!(violations.is_empty(), "after {:?}: {:?}", line, violations);
        }
    }

    #[test]
    fn rename_moves_every_membership(
        joins in prop::collection::vec(channel_strategy(), 1..4),
        new in "[a-z]{3,8}2",
    ) {
        let h = Harness::new("mirror");
        for channel in &joins {
            h.feed(&format!(":alice!u@h JOIN {channel}"));
        }
        let before = h.state.get_nick("alice").unwrap().channels.len();

        h.feed(&format!(":alice!u@h NICK {new}"));

        let renamed = h.state.get_nick(&new).unwrap();
        prop_assert_eq!(renamed.channels.len(), before);
        for channel in renamed.channels.keys() {
            prop_assert!(h.state.get_privs(channel, &new).is_some());
            prop_assert!(h.state.get_privs(channel, "alice").is_none());
        }
    }
}
