//! Environment sanitization for toolchain subprocesses

use std::collections::BTreeMap;

/// Prefixes of variables that leak shell or tooling state into the child
const VOLATILE_PREFIXES: &[&str] = &[
    "PYTEST_",
    "TERM_",
    "SHLVL",
    "OLDPWD",
    "PWD",
    "_",
    "CONDA_",
    "HOMEBREW_",
    "INFOPATH",
    "DISPLAY",
    "npm_",
    "XPC_",
    "SSH_",
    "LOGNAME",
    "USER",
    "TMPDIR",
    "SHELL",
    "INIT_CWD",
    "NODE",
    "COLOR",
    "LANG",
    "EDITOR",
    "OBJC_DISABLE_INITIALIZE_FORK_SAFETY",
    "VIRTUAL_ENV",
];

pub fn is_volatile(key: &str) -> bool {
    VOLATILE_PREFIXES.iter().any(|prefix| key.starts_with(prefix))
}

/// Drop volatile variables from an environment
pub fn sanitize_env<I>(vars: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter().filter(|(key, _)| !is_volatile(key)).collect()
}

/// The current process environment, sanitized
pub fn clean_process_env() -> BTreeMap<String, String> {
    sanitize_env(std::env::vars())
}
