//! Shared helpers used by the API and CLI layers.

/// Render a frame as upper-case, space separated hex (`01 04 02 00 05`).
pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
