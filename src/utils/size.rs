/// Render a byte count as whole kilobytes, rounding half up.
pub fn format_kilobytes(bytes: u64) -> String {
    format!("{} KB", bytes.saturating_add(512) / 1024)
}
