use std::time::Duration;

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Renders a duration in the largest unit it exceeds, with two decimals.
pub fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs_f64();
    let hours = seconds / SECONDS_PER_HOUR;
    let minutes = seconds / SECONDS_PER_MINUTE;

    if hours > 1.0 {
        format!("{hours:.2} hours")
    } else if minutes > 1.0 {
        format!("{minutes:.2} minutes")
    } else {
        format!("{seconds:.2} seconds")
    }
}
