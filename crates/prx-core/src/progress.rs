//! Pure progress math and the slug helper.
//!
//! `progress` is the single source of truth for enrollment percentages; the
//! enrollment ledger in `prx-db` calls it after every completion fact and
//! persists the result. Keeping it pure keeps the rounding rules trivially
//! testable.

/// Map completed/total lesson counts to a percentage and completion flag.
///
/// Counts arrive as `i64` straight from SQL `COUNT(*)`.
///
/// - `total <= 0` → `(0, false)`: content with no lessons is never complete.
/// - `completed >= total` → `(100, true)`: stale over-counts clamp to 100
///   and always read as complete.
/// - Otherwise, round half up: `(1, 3)` → 33, `(2, 3)` → 67.
#[must_use]
pub const fn progress(completed: i64, total: i64) -> (i64, bool) {
    if total <= 0 {
        return (0, false);
    }
    if completed >= total {
        return (100, true);
    }
    if completed <= 0 {
        return (0, false);
    }
    // Integer round-half-up: floor((completed / total) * 100 + 0.5).
    let pct = (completed * 200 + total) / (total * 2);
    (pct, false)
}

/// Generate a URL-safe slug: lowercase, whitespace to `-`, strip everything
/// outside `[a-z0-9-]`, collapse runs of `-`, trim leading/trailing `-`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut prev_dash = true; // suppress a leading dash
    for c in text.trim().to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            prev_dash = false;
        } else if (c.is_whitespace() || c == '-') && !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}
