use std::io::IsTerminal;

use colored::{ColoredString, Colorize};

// Colors a hex string in rotating colors by chunk, keeping a leading "0x" plain
pub fn hex_color(s: impl AsRef<str>, chunk_size: usize) -> ColoredString {
    let s = s.as_ref();
    let colors = [
        Colorize::red,
        Colorize::green,
        Colorize::yellow,
        Colorize::blue,
        Colorize::magenta,
        Colorize::cyan,
    ];
    let (prefix, digits) = match s.strip_prefix("0x") {
        Some(digits) => ("0x", digits),
        None => ("", s),
    };

    let mut colored = String::from(prefix);
    for (i, chunk) in digits.as_bytes().chunks(chunk_size.max(1)).enumerate() {
        let color = colors[i % colors.len()];
        let part = std::str::from_utf8(chunk).unwrap_or("");
        colored.push_str(&color(part).to_string());
    }
    colored.normal()
}

// Plain text unless stdout is a terminal, so CI logs and pipes get bare hex
pub fn display_hex(s: impl AsRef<str>) -> String {
    if std::io::stdout().is_terminal() {
        hex_color(s, 8).to_string()
    } else {
        s.as_ref().to_string()
    }
}
