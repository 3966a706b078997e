//! # Record Identity
//!
//! Records that arrive without an id (fresh drafts, hand-edited or legacy
//! persisted data) get a human-readable one derived from their content:
//!
//! ```text
//! ["Grade Midterms", "Kim"]  ->  grade-midterms-kim-m3x9k2a1
//!  \___ slug ___/                \___ slug ____/ \_ suffix _/
//! ```
//!
//! - **Slug**: lower-cased, every run of non-alphanumeric characters collapsed to
//!   a single `-`, leading and trailing separators stripped.
//! - **Suffix**: current time in milliseconds, base-36 encoded.
//! - **Empty slug**: the id is the suffix alone.
//!
//! The suffix clock is monotonic within the process: a second id requested in the
//! same millisecond gets `last + 1`, so two derived ids never collide even when
//! their parts are identical.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

const SEPARATOR: char = '-';
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

static LAST_TICK: AtomicI64 = AtomicI64::new(0);

/// Build a slug from the given parts. Blank parts are skipped.
pub fn slugify<S: AsRef<str>>(parts: &[S]) -> String {
    let mut slug = String::new();
    let mut pending_separator = false;

    for part in parts {
        for c in part.as_ref().chars() {
            if c.is_alphanumeric() {
                if pending_separator && !slug.is_empty() {
                    slug.push(SEPARATOR);
                }
                pending_separator = false;
                slug.extend(c.to_lowercase());
            } else {
                pending_separator = true;
            }
        }
        // Parts are always separated from each other.
        pending_separator = true;
    }

    slug
}

/// Derive a unique identifier from the given parts.
pub fn derive_id<S: AsRef<str>>(parts: &[S]) -> String {
    let slug = slugify(parts);
    let suffix = to_base36(next_tick());
    if slug.is_empty() {
        suffix
    } else {
        format!("{}{}{}", slug, SEPARATOR, suffix)
    }
}

fn next_tick() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_TICK.load(Ordering::Relaxed);
    loop {
        let next = if now > last { now } else { last + 1 };
        match LAST_TICK.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

fn to_base36(value: i64) -> String {
    let mut n = value.unsigned_abs();
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
