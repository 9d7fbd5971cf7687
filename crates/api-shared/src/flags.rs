//! Boolean query flags.

/// Parses a boolean query flag.
///
/// Accepts `y`, `yes`, `t`, `true`, `on`, `1` and `n`, `no`, `f`, `false`, `off`, `0`, in any
/// case. Anything else is `None`.
pub fn parse_bool_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Some(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}
