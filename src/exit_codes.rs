//! Exit codes for the sprout CLI.
//!
//! Every fatal error maps to one of these codes so scripts wrapping sprout
//! can tell user mistakes apart from generation and filesystem failures.

/// Command completed successfully.
pub const SUCCESS: i32 = 0;

/// Invalid arguments, missing environment configuration, or bad input.
pub const USER_ERROR: i32 = 1;

/// A control document could not be resolved or dispatched.
pub const GENERATION_FAILURE: i32 = 2;

/// A file was missing, already occupied, or could not be written.
pub const FS_FAILURE: i32 = 3;
