//! Centralized limits for the weft transform.

/// Maximum recursion depth for the transform traversal.
///
/// Nodes nested deeper than this are left untouched rather than overflowing
/// the stack. Matches the depth the printer and ESTree converter accept.
pub const MAX_AST_DEPTH: u32 = 500;

/// Maximum number of plain/tilde markers a single call may carry.
///
/// The first marker is the result position, the second the continuation
/// position. A third marker is an error.
pub const MAX_MARKERS_PER_CALL: usize = 2;

/// Upper bound on numeric suffixes tried when generating a unique name.
pub const MAX_UNIQUE_NAME_ATTEMPTS: u32 = 10_000;
