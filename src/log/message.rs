pub const UNEXPECTED_CHARACTER: &str = "unexpected character";
pub const INVALID_SEQUENCE: &str = "invalid sequence";
pub const UNEXPECTED_BLOCK: &str = "unexpected block";
pub const UNCLOSED_BLOCK: &str = "unclosed block";
pub const UNKNOWN_FILTER: &str = "unknown filter";
pub const NOT_ITERABLE: &str = "not iterable";
pub const INVALID_SYNTAX: &str = "invalid syntax";
