// src/display.rs

//! Human-readable rendering for the `status` subcommand.

use crate::status::Status;

/// Divisors between consecutive entries of [`UNITS`].
const UNIT_STEPS: [f64; 6] = [
    60.0,              // seconds per minute
    60.0,              // minutes per hour
    24.0,              // hours per day
    7.0,               // days per week
    365.0 / 7.0 / 12.0, // weeks per month
    12.0,              // months per year
];

const UNITS: [&str; 7] = ["second", "minute", "hour", "day", "week", "month", "year"];

/// Format a number of seconds as the largest whole unit, e.g. `90` becomes
/// `"1 minute"` and `7200` becomes `"2 hours"`.
pub fn format_seconds(seconds: i64) -> String {
    let mut value = seconds as f64;
    let mut idx = 0;
    while idx < UNIT_STEPS.len() && value >= UNIT_STEPS[idx] {
        value /= UNIT_STEPS[idx];
        idx += 1;
    }

    let whole = value.floor() as i64;
    let plural = if whole == 1 { "" } else { "s" };
    format!("{whole} {}{plural}", UNITS[idx])
}

/// Two-column table with the humanised uptime and the counters.
pub fn status_table(status: &Status) -> String {
    let rows = [
        ("Uptime", format_seconds(status.uptime)),
        ("Running", status.running.to_string()),
        ("Queued", status.queued.to_string()),
        ("Failed", status.failed.to_string()),
        ("Succeeded", status.succeeded.to_string()),
    ];

    let left = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let right = rows.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    let border = format!("+{}+{}+", "-".repeat(left + 2), "-".repeat(right + 2));

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    for (key, value) in rows.iter() {
        out.push_str(&format!("| {key:<left$} | {value:<right$} |\n"));
    }
    out.push_str(&border);
    out.push('\n');
    out
}
