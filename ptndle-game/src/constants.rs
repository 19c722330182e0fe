//! Centralized gameplay and tuning constants for ptndle.
//!
//! These values define the deterministic math for target selection and
//! scoring. Keeping them together ensures that gameplay can only be adjusted
//! via code changes reviewed in version control.

// Game rules ---------------------------------------------------------------
/// Maximum guesses allowed per puzzle.
pub const MAX_GUESSES: usize = 6;

/// Attribute keys in the order the guess table shows them.
pub const ATTRIBUTE_KEYS: [&str; 5] = ["code", "alignment", "tendency", "height", "birthplace"];

/// Submissions stay blocked for this long after a guess is accepted.
pub const GUESS_COOLDOWN_MS: u32 = 500;

// Seeding ------------------------------------------------------------------
pub(crate) const CYRB53_DEFAULT_SEED: u32 = 727;
pub(crate) const CYRB53_LANE_ONE: u32 = 0xdead_beef;
pub(crate) const CYRB53_LANE_TWO: u32 = 0x41c6_ce57;
pub(crate) const CYRB53_MIX_ONE: u32 = 2_654_435_761;
pub(crate) const CYRB53_MIX_TWO: u32 = 1_597_334_677;
pub(crate) const CYRB53_FINAL_ONE: u32 = 2_246_822_507;
pub(crate) const CYRB53_FINAL_TWO: u32 = 3_266_489_909;
pub(crate) const CYRB53_HIGH_MASK: u32 = 0x001f_ffff;

// Thresholds ---------------------------------------------------------------
/// Most common height in the catalog, as of 2025-04-18.
pub const MOST_COMMON_HEIGHT: i64 = 168;
pub(crate) const CODE_HIGH_BASE: f64 = 5.0;
pub(crate) const CODE_HIGH_SCALE: f64 = 0.1;
pub(crate) const CODE_VERY_HIGH_BASE: f64 = 50.0;
pub(crate) const CODE_VERY_HIGH_SCALE: f64 = 0.35;
pub(crate) const HEIGHT_HIGH_BASE: f64 = 3.0;
pub(crate) const HEIGHT_HIGH_SCALE: f64 = 0.1;
pub(crate) const HEIGHT_VERY_HIGH_BASE: f64 = 15.0;
pub(crate) const HEIGHT_VERY_HIGH_SCALE: f64 = 0.35;

// Storage ------------------------------------------------------------------
pub(crate) const STORAGE_PREFIX: &str = "ptndle";
pub(crate) const LAST_PLAYED_KEY: &str = "ptndle.last_played";

// Share text ---------------------------------------------------------------
pub(crate) const SHARE_TITLE: &str = "ptndle";
pub(crate) const EMOJI_EXACT: &str = "🟩";
pub(crate) const EMOJI_HIGH: &str = "🟨";
pub(crate) const EMOJI_VERY_HIGH: &str = "🟧";
pub(crate) const EMOJI_MISS: &str = "🟥";
