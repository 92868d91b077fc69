//! Tag name -> KIP (instrument) display name.

use std::sync::LazyLock;

use regex::Regex;

/// Letters followed by digits with an optional letter suffix: `FT101A` -> (`FT`, `101A`).
static KIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([A-Z]+)([0-9]+[A-Z]*)").expect("kip pattern is valid")
});

/// Convert an internal tag name into a short instrument identifier.
///
/// A single leading `i`/`o` direction marker is stripped. Names carrying an
/// underscore are already instrument codes and are returned as-is; otherwise
/// `HEAD` letters and the numeric `TAIL` are joined with a hyphen.
/// Display only: the result is never used for addressing.
pub fn canonicalize(tag_name: &str) -> String {
    let kip = tag_name
        .strip_prefix('i')
        .or_else(|| tag_name.strip_prefix('o'))
        .unwrap_or(tag_name);

    if kip.contains('_') {
        return kip.to_string();
    }

    match KIP_RE.captures(kip) {
        Some(caps) => format!("{}-{}", &caps[1], &caps[2]),
        None => kip.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_tag_gets_hyphenated() {
        assert_eq!(canonicalize("iFT101A"), "FT-101A");
        assert_eq!(canonicalize("iFT101"), "FT-101");
    }

    #[test]
    fn underscore_names_only_lose_the_marker() {
        assert_eq!(canonicalize("oXV_12"), "XV_12");
    }

    #[test]
    fn strips_at_most_one_marker() {
        assert_eq!(canonicalize("ioPT5"), "oPT-5");
    }

    #[test]
    fn marker_is_case_sensitive() {
        assert_eq!(canonicalize("IFT7"), "IFT-7");
    }

    #[test]
    fn no_marker_still_canonicalized() {
        assert_eq!(canonicalize("XV200"), "XV-200");
        assert_eq!(canonicalize("xv200b"), "xv-200b");
    }

    #[test]
    fn unmatched_names_are_returned_stripped() {
        assert_eq!(canonicalize("o123"), "123");
        assert_eq!(canonicalize("iSPARE"), "SPARE");
        assert_eq!(canonicalize(""), "");
    }
}
