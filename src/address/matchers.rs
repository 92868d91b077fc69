//! Path sub-grammars.
//!
//! Each matcher sees the path body after the direction letter (`I.` / `O.`
//! already removed) and either locates a channel or declines. `PATH_MATCHERS`
//! fixes the order they are tried in: the `Data[..]` and `Data.` forms come
//! before the bare numeric form so `Data.5` is never read as `<N>`.

/// Result of one matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatch {
    Matched {
        /// Slot carried inside the path (FlexBus), overrides the address slot.
        flex_slot: Option<u32>,
        channel: u32,
    },
    NoMatch,
}

impl PathMatch {
    fn channel(channel: u32) -> Self {
        PathMatch::Matched {
            flex_slot: None,
            channel,
        }
    }
}

pub type PathMatcher = fn(&str) -> PathMatch;

/// Matchers in priority order, with a short form name the parser logs at `trace`.
pub const PATH_MATCHERS: [(&str, PathMatcher); 5] = [
    ("flexbus-indexed", match_flexbus_indexed),
    ("three-dot", match_three_dot),
    ("channel-suffixed", match_channel_suffixed),
    ("channel-bracket", match_channel_bracket),
    ("bare-index", match_bare_index),
];

/// Try every matcher in order; the first hit wins.
pub fn match_path(body: &str) -> Option<(&'static str, PathMatch)> {
    PATH_MATCHERS.iter().find_map(|(name, matcher)| match matcher(body) {
        PathMatch::NoMatch => None,
        hit => Some((*name, hit)),
    })
}

/// `Data[<S>].<N>`
pub fn match_flexbus_indexed(body: &str) -> PathMatch {
    let Some(rest) = body.strip_prefix("Data[") else {
        return PathMatch::NoMatch;
    };
    let Some((slot, channel)) = rest.split_once("].") else {
        return PathMatch::NoMatch;
    };
    match (parse_index(slot), parse_index(channel)) {
        (Some(slot), Some(channel)) => PathMatch::Matched {
            flex_slot: Some(slot),
            channel,
        },
        _ => PathMatch::NoMatch,
    }
}

/// `Data.<N>`
pub fn match_three_dot(body: &str) -> PathMatch {
    body.strip_prefix("Data.")
        .and_then(parse_index)
        .map_or(PathMatch::NoMatch, PathMatch::channel)
}

/// `Ch<N>Data`
pub fn match_channel_suffixed(body: &str) -> PathMatch {
    body.strip_prefix("Ch")
        .and_then(|rest| rest.strip_suffix("Data"))
        .and_then(parse_index)
        .map_or(PathMatch::NoMatch, PathMatch::channel)
}

/// `Ch[<N>]` or `Channel[<N>]`, optionally followed by `.Data` or `Data`.
pub fn match_channel_bracket(body: &str) -> PathMatch {
    let Some(rest) = body
        .strip_prefix("Channel[")
        .or_else(|| body.strip_prefix("Ch["))
    else {
        return PathMatch::NoMatch;
    };
    let Some((index, tail)) = rest.split_once(']') else {
        return PathMatch::NoMatch;
    };
    if !matches!(tail, "" | ".Data" | "Data") {
        return PathMatch::NoMatch;
    }
    parse_index(index).map_or(PathMatch::NoMatch, PathMatch::channel)
}

/// `<N>` (compact bus modules).
pub fn match_bare_index(body: &str) -> PathMatch {
    parse_index(body).map_or(PathMatch::NoMatch, PathMatch::channel)
}

/// Plain decimal digits only; no sign, no blanks.
fn parse_index(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(channel: u32) -> PathMatch {
        PathMatch::Matched {
            flex_slot: None,
            channel,
        }
    }

    #[test]
    fn flexbus_indexed() {
        assert_eq!(
            match_flexbus_indexed("Data[4].12"),
            PathMatch::Matched {
                flex_slot: Some(4),
                channel: 12
            }
        );
        assert_eq!(match_flexbus_indexed("Data.12"), PathMatch::NoMatch);
        assert_eq!(match_flexbus_indexed("Data[x].1"), PathMatch::NoMatch);
        assert_eq!(match_flexbus_indexed("Data[1]"), PathMatch::NoMatch);
    }

    #[test]
    fn three_dot() {
        assert_eq!(match_three_dot("Data.10"), hit(10));
        assert_eq!(match_three_dot("Data.1.2"), PathMatch::NoMatch);
        assert_eq!(match_three_dot("Value.1"), PathMatch::NoMatch);
    }

    #[test]
    fn channel_suffixed() {
        assert_eq!(match_channel_suffixed("Ch6Data"), hit(6));
        assert_eq!(match_channel_suffixed("Ch10Data"), hit(10));
        assert_eq!(match_channel_suffixed("ChData"), PathMatch::NoMatch);
        assert_eq!(match_channel_suffixed("ChxData"), PathMatch::NoMatch);
    }

    #[test]
    fn channel_bracket_variants() {
        assert_eq!(match_channel_bracket("Ch[3]"), hit(3));
        assert_eq!(match_channel_bracket("Channel[3]"), hit(3));
        assert_eq!(match_channel_bracket("Ch[3].Data"), hit(3));
        assert_eq!(match_channel_bracket("Channel[7]Data"), hit(7));
        assert_eq!(match_channel_bracket("Ch[3].Value"), PathMatch::NoMatch);
        assert_eq!(match_channel_bracket("Ch[]"), PathMatch::NoMatch);
    }

    #[test]
    fn bare_index() {
        assert_eq!(match_bare_index("4"), hit(4));
        assert_eq!(match_bare_index("-4"), PathMatch::NoMatch);
        assert_eq!(match_bare_index(" 4"), PathMatch::NoMatch);
        assert_eq!(match_bare_index("99999999999"), PathMatch::NoMatch);
    }

    #[test]
    fn specific_forms_are_tried_before_bare_index() {
        assert_eq!(match_path("Data[2].5").map(|(name, _)| name), Some("flexbus-indexed"));
        assert_eq!(match_path("Data.5").map(|(name, _)| name), Some("three-dot"));
        assert_eq!(match_path("5").map(|(name, _)| name), Some("bare-index"));
        assert_eq!(match_path("Data"), None);
    }
}
