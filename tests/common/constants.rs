//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When test data changes (admin credentials, catalog IDs, etc.),
//! update only this file.

// ============================================================================
// Test Admin Credentials
// ============================================================================

/// Seeded admin display name
pub const ADMIN_NAME: &str = "Test Admin";

/// Seeded admin email (used to log in)
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Seeded admin password
pub const ADMIN_PASS: &str = "adminpass123";

// ============================================================================
// Test Catalog IDs
// ============================================================================

/// Artist ID for "The Crooners"
pub const ARTIST_1_ID: &str = "artist-1";

/// Artist ID for "Nina Meyer"
pub const ARTIST_2_ID: &str = "artist-2";

/// Category ID for "Rock"
pub const CATEGORY_ROCK_ID: &str = "cat-rock";

/// Category ID for "Duets"
pub const CATEGORY_DUETS_ID: &str = "cat-duets";

/// Category ID for "Evergreens" (seeded with no songs)
pub const CATEGORY_EVERGREENS_ID: &str = "cat-evergreens";

// ============================================================================
// Test Catalog Metadata
// ============================================================================

/// Artist 1 name
pub const ARTIST_1_NAME: &str = "The Crooners";

/// Artist 2 name
pub const ARTIST_2_NAME: &str = "Nina Meyer";

/// Song 1 title (artist 1, Rock)
pub const SONG_1_TITLE: &str = "All Night Long";

/// Song 1 machine code
pub const SONG_1_CODE: &str = "10001";

/// Song 1 lyrics
pub const SONG_1_LYRICS: &str = "All night long we sing along";

/// Song 2 title (artist 2, Rock + Duets)
pub const SONG_2_TITLE: &str = "Banana Boat";

/// Song 2 machine code
pub const SONG_2_CODE: &str = "10002";

/// Song 3 title (both artists, Duets)
pub const SONG_3_TITLE: &str = "Crying In The Rain";

/// Song 3 machine code
pub const SONG_3_CODE: &str = "10003";

/// Song 3 lyrics
pub const SONG_3_LYRICS: &str = "The rain keeps falling on my mind";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
