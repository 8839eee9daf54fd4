//! Shared constants for integration tests
//!
//! When test data changes (usernames, canned catalog ids), update only
//! this file.

// ============================================================================
// Test Users
// ============================================================================

/// Username the assistant acts on behalf of in tests
pub const TEST_USER: &str = "alice";

/// A second user for isolation tests
pub const OTHER_USER: &str = "bob";

/// Catalog-side id the stub resolves the authenticated user to
pub const STUB_USER_ID: &str = "user-1";

// ============================================================================
// Canned Catalog Ids
// ============================================================================

/// First playlist id the stub hands out
pub const FIRST_PLAYLIST_ID: &str = "pl-1";
