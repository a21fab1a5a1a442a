/*!
 * Core Types
 * Common types used across the scheduler
 */

/// Process ID type (OS-level pid for launched jobs)
pub type Pid = u32;

/// Timestamp or duration in whole milliseconds
pub type Millis = u64;
