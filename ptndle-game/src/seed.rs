//! Deterministic seed hashing and seed-string construction.
//! Daily seeds are `YYYY-MM-DD`; endless seeds are `YYYY-MM-DDT00:00:00.NNNZ`
//! where `NNN` is the endless counter for that day.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::constants::{
    CYRB53_DEFAULT_SEED, CYRB53_FINAL_ONE, CYRB53_FINAL_TWO, CYRB53_HIGH_MASK, CYRB53_LANE_ONE,
    CYRB53_LANE_TWO, CYRB53_MIX_ONE, CYRB53_MIX_TWO,
};

/// 53-bit cyrb53 hash over the UTF-16 code units of `input`.
///
/// Two 32-bit lanes are mixed independently, then folded into a value below
/// 2^53. Not cryptographic.
#[must_use]
pub fn cyrb53(input: &str, seed: u32) -> u64 {
    let mut h1 = CYRB53_LANE_ONE ^ seed;
    let mut h2 = CYRB53_LANE_TWO ^ seed;
    for unit in input.encode_utf16() {
        let ch = u32::from(unit);
        h1 = (h1 ^ ch).wrapping_mul(CYRB53_MIX_ONE);
        h2 = (h2 ^ ch).wrapping_mul(CYRB53_MIX_TWO);
    }
    h1 = (h1 ^ (h1 >> 16)).wrapping_mul(CYRB53_FINAL_ONE);
    h1 ^= (h2 ^ (h2 >> 13)).wrapping_mul(CYRB53_FINAL_TWO);
    h2 = (h2 ^ (h2 >> 16)).wrapping_mul(CYRB53_FINAL_ONE);
    h2 ^= (h1 ^ (h1 >> 13)).wrapping_mul(CYRB53_FINAL_TWO);

    (u64::from(h2 & CYRB53_HIGH_MASK) << 32) | u64::from(h1)
}

/// Index into a collection of `len` items for a seed string.
#[must_use]
pub fn seeded_index(seed: &str, len: usize) -> usize {
    let Ok(modulus) = u64::try_from(len) else {
        return 0;
    };
    if modulus == 0 {
        return 0;
    }
    usize::try_from(cyrb53(seed, CYRB53_DEFAULT_SEED) % modulus).unwrap_or(0)
}

/// Calendar date used as the daily seed and history key.
#[must_use]
pub fn utc_date(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Millisecond-precision UTC timestamp, e.g. `2025-06-01T09:30:00.000Z`.
#[must_use]
pub fn utc_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Whether daily seed `date` is the calendar day right after `previous`.
/// Seeds that are not `YYYY-MM-DD` dates never follow each other.
#[must_use]
pub fn is_following_day(previous: &str, date: &str) -> bool {
    let parse = |raw: &str| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
    match (parse(previous), parse(date)) {
        (Some(previous), Some(date)) => previous.succ_opt() == Some(date),
        _ => false,
    }
}

/// Endless-mode seed for `date` after `count` resets on that day.
#[must_use]
pub fn endless_seed(date: &str, count: u32) -> String {
    format!("{date}T00:00:00.{count:03}Z")
}
