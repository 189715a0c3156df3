//! Effective privilege of the running process.

/// Privilege query trait.
///
/// Implementations must read the live process state on every call; callers rely on
/// this not being memoized.
pub trait PrivilegeOps {
    /// True when the process can perform mount operations without escalation.
    fn is_elevated(&self) -> bool;
}

/// Build the command line that is actually executed.
///
/// Elevated processes run `argv` untouched. Otherwise `helper` is prepended and the
/// given vector follows unchanged.
pub fn elevate_argv(argv: &[String], elevated: bool, helper: &str) -> Vec<String> {
    if elevated {
        return argv.to_vec();
    }
    let mut out = Vec::with_capacity(argv.len() + 1);
    out.push(helper.to_string());
    out.extend(argv.iter().cloned());
    out
}
