//! Escaping cases using datatest-stable.
//!
//! Each test case is a file in `tests/escape-cases/` with format:
//! ```text
//! <raw text>
//! ===
//! <escaped with quotes>
//! ```
//!
//! The test verifies both escape(raw) == escaped and unescape(escaped) == raw.

use plated::escape::{escape, unescape};
use std::path::Path;

fn run_escape_case(path: &Path) -> datatest_stable::Result<()> {
    facet_testhelpers::setup();

    let content = std::fs::read_to_string(path)?;
    let parts: Vec<&str> = content.split("\n===\n").collect();

    if parts.len() != 2 {
        return Err(format!(
            "Case file must have exactly one '===' separator, found {} parts",
            parts.len()
        )
        .into());
    }

    let raw = parts[0];
    let escaped = parts[1].strip_suffix('\n').unwrap_or(parts[1]);

    let result = escape(raw, true);
    if result != escaped {
        return Err(format!(
            "escape mismatch!\nRaw: {raw}\nResult: {result}\nExpected: {escaped}"
        )
        .into());
    }

    let back = unescape(escaped);
    if back != raw {
        return Err(format!(
            "unescape mismatch!\nEscaped: {escaped}\nResult: {back}\nExpected: {raw}"
        )
        .into());
    }

    Ok(())
}

datatest_stable::harness! {
    { test = run_escape_case, root = "tests/escape-cases", pattern = r".*\.txt$" },
}
