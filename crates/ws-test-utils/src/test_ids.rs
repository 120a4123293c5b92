//! Fixed test IDs for deterministic tests
//!
//! All test IDs are deterministic to ensure reproducible test results.

use uuid::Uuid;

// Subjects
pub const TEST_USER_ALICE: &str = "alice";
pub const TEST_USER_BOB: &str = "bob";
pub const TEST_ADMIN: &str = "ops-admin";

// Roles
pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_USER: &str = "USER";
pub const ROLE_GUEST: &str = "GUEST";

// Seeded collaboration types
pub const COLLABORATION_PERSONAL: Uuid = Uuid::from_u128(0x5a1f6f3e_8c0d_4e55_9b7b_4c3f1b2f6a01);
pub const COLLABORATION_TEAM: Uuid = Uuid::from_u128(0x9d2c4b7a_1e6f_4a38_8f5d_0b7e3c9a2d02);

// Seeded stems
pub const STEM_STICKER: Uuid = Uuid::from_u128(0x2fdf996e_2372_4f3c_bccf_d8efcca8bd49);
pub const STEM_2D: Uuid = Uuid::from_u128(0x78e95523_4ed2_49e6_8b1a_b8c073daab41);
pub const STEM_3D: Uuid = Uuid::from_u128(0xb8d78dda_027c_498e_8609_33cc6f4a6dbe);

// Identifiers that never exist (1-99)
pub const MISSING_PROJECT_ID: Uuid = Uuid::from_u128(1);
pub const MISSING_WORKSPACE_ID: Uuid = Uuid::from_u128(2);
pub const MISSING_ASSET_ID: Uuid = Uuid::from_u128(3);
