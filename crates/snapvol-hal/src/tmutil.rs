//! Parsing helpers for `tmutil` snapshot output.

const LIST_HEADER: &str = "Snapshots for";
const CREATED_PREFIX: &str = "Created local snapshot with date:";

/// Snapshot ids from `tmutil listlocalsnapshots` output, in listed order.
pub fn parse_snapshot_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(LIST_HEADER))
        .map(str::to_string)
        .collect()
}

/// Date stamp reported by `tmutil localsnapshot`, if any.
pub fn parse_created_snapshot(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        line.trim()
            .strip_prefix(CREATED_PREFIX)
            .map(str::trim)
            .filter(|date| !date.is_empty())
            .map(str::to_string)
    })
}
