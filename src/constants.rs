// src/constants.rs

/// Pattern of a raw string that looks like an option name (one or more leading dashes).
pub const OPTION_PATTERN: &str = r"^-+([\s\S]*)";

/// Pattern a sub-command token must match before a child lookup is attempted.
pub const COMMAND_PATTERN: &str = r"(?i)^[a-z0-9]+";

/// Built-in type names.
pub const TYPE_STRING: &str = "string";
/// Greedy string: consumes the next token even when it looks like an option.
pub const TYPE_GREEDY_STRING: &str = "string*";
/// Digits only.
pub const TYPE_NUMBER: &str = "number";
/// `1, 0, true, false, yes, no`.
pub const TYPE_BOOLEAN: &str = "boolean";
/// Presence-only flag.
pub const TYPE_SWITCH: &str = "switch";

/// Parameter keys resolving to the matched command label.
pub const COMMAND_KEYS: &[&str] = &["command", "cmd", "cmd0", "$command", "$cmd", "$0"];

/// Parameter keys resolving to the command node itself.
pub const SELF_KEYS: &[&str] = &["self", "$self", "$this"];

/// Parameter keys resolving to the positional list.
pub const ARGV_KEYS: &[&str] = &["argv", "$argv"];

/// Parameter keys resolving to the positional count.
pub const ARGC_KEYS: &[&str] = &["argc", "$argc"];

/// Options registered by `version()`.
pub const VERSION_OPTION_NAMES: [&str; 2] = ["-v", "--version"];

/// Options registered by `help()`.
pub const HELP_OPTION_NAMES: [&str; 2] = ["-h", "--help"];

/// Printed by `version()`/`help()` when the configured text resolves to nothing.
pub const UNKNOWN_TEXT: &str = "unknown";

/// How many empty positionals `set("$N")` may insert to reach slot `N`.
pub const MAX_POSITIONAL_PADDING: usize = 256;
