//! Human-readable rendering of received octets.

/// Render a payload as a byte-count header followed by space-separated
/// two-digit uppercase hex bytes.
pub fn render_octets(octets: &[u8]) -> String {
    let hex = octets
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("Generated octets ({} bytes): {}", octets.len(), hex)
}
