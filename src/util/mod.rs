//! Small helpers shared by the API layer and the terminal views.
//!
//! - **Text**: single-line sanitising and column-width truncation for list rows
//! - **Paths**: percent-encoding of user-supplied URL path segments (slugs)

mod text;

pub use text::{display_width, fit_width, fit_width_tail, single_line};

/// Percent-encode one URL path segment (RFC 3986 unreserved characters pass through).
///
/// Used for slugs interpolated into endpoint paths, e.g. `/admin/categories/{slug}/posts-count`.
pub fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
