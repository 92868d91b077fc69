//! Tag description decoder.
//!
//! Controller exports escape non-ASCII text as `$HHHH` (one UTF-16 code unit
//! per escape) and line breaks as `$N` / `$Q`, e.g.
//! `$0422$0435$043a$0443$0449$0430$044f` -> `Текущая`.
//!
//! Decoding is best-effort and never fails: a truncated escape at the end of
//! the input stops decoding and whatever was decoded so far is returned.

const ESCAPE: char = '$';
const HEX_LEN: usize = 4;

/// Decode an escape-coded description. `None` decodes to an empty string.
pub fn decode(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut pos = 0;

    while pos < chars.len() {
        let ch = chars[pos];
        if ch != ESCAPE {
            out.push(ch);
            pos += 1;
            continue;
        }

        if pos + 1 >= chars.len() {
            break;
        }
        match chars[pos + 1] {
            'Q' | 'N' => {
                out.push('\n');
                pos += 2;
                continue;
            }
            ESCAPE => {
                out.push(ESCAPE);
                pos += 2;
                continue;
            }
            _ => {}
        }

        let end = pos + 1 + HEX_LEN;
        if end > chars.len() {
            break;
        }
        let code: String = chars[pos + 1..end].iter().collect();
        match parse_hex_code(&code) {
            Some(decoded) => {
                out.push(decoded);
                pos = end;
            }
            None => {
                out.push(ESCAPE);
                pos += 1;
            }
        }
    }

    out
}

fn parse_hex_code(code: &str) -> Option<char> {
    if !code.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(code, 16).ok()?;
    Some(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER))
}
