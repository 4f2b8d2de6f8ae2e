//! Exit code constants for the schoolcrew CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid task choice)
//! - 2: Configuration error (unreadable or invalid crew.yaml)
//! - 3: LLM or tool failure
//! - 4: I/O failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or an unknown task choice.
pub const USER_ERROR: i32 = 1;

/// Configuration error: crew.yaml could not be parsed or validated.
pub const CONFIG_ERROR: i32 = 2;

/// LLM failure: the model backend or a tool it depends on failed.
pub const LLM_FAILURE: i32 = 3;

/// I/O failure: reading input or writing outputs failed.
pub const IO_FAILURE: i32 = 4;
