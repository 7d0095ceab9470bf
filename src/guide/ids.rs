//! Synthetic id and uid construction for every output entity type.
//!
//! The output shares one flat id space, so each entity class carries a
//! type-prefix letter on its natural id. uids are the format's
//! human-readable cross-reference strings, `!TypeName!distinguishing-text`;
//! two entities of the same type with the same text collide by design.
//!
//! Keeping these as small pure functions means every cross-reference in
//! the assembled document is built from the same source of truth.

/// Service id for a channel: `s{channelIndex}`.
#[must_use]
pub fn service_id(channel_index: i64) -> String {
    format!("s{channel_index}")
}

/// Service uid: `!Service!{callSign}`.
#[must_use]
pub fn service_uid(call_sign: &str) -> String {
    format!("!Service!{call_sign}")
}

/// Program uid: `!Program!{programId}`.
#[must_use]
pub fn program_uid(program_id: &str) -> String {
    format!("!Program!{program_id}")
}

/// Person id: `p{personId}`.
#[must_use]
pub fn person_id(natural_id: &str) -> String {
    format!("p{natural_id}")
}

/// Person uid: `!Person!{name}`.
#[must_use]
pub fn person_uid(name: &str) -> String {
    format!("!Person!{name}")
}

/// Series id: `si{parentProgramId}`.
#[must_use]
pub fn series_id(parent: &str) -> String {
    format!("si{parent}")
}

/// Series uid: `!SeriesInfo!{parentProgramId}`.
#[must_use]
pub fn series_uid(parent: &str) -> String {
    format!("!SeriesInfo!{parent}")
}

/// Season id: `sn{parentProgramId}`.
#[must_use]
pub fn season_id(parent: &str) -> String {
    format!("sn{parent}")
}

/// Season uid: `!Season!{parentProgramId}`.
#[must_use]
pub fn season_uid(parent: &str) -> String {
    format!("!Season!{parent}")
}

/// Guide image id for a program show-card: `i{programId}`.
#[must_use]
pub fn program_image_id(program_id: &str) -> String {
    format!("i{program_id}")
}

/// Guide image uid for a program show-card: `!Image!{programId}`.
#[must_use]
pub fn program_image_uid(program_id: &str) -> String {
    format!("!Image!{program_id}")
}

/// Guide image id for a channel logo: `i{channelIndex}`.
#[must_use]
pub fn channel_image_id(channel_index: i64) -> String {
    format!("i{channel_index}")
}

/// Guide image uid for a channel logo: `!Image!{callSign}`.
#[must_use]
pub fn channel_image_uid(call_sign: &str) -> String {
    format!("!Image!{call_sign}")
}

/// Affiliate uid: `!Affiliate!{network}`.
#[must_use]
pub fn affiliate_uid(network: &str) -> String {
    format!("!Affiliate!{network}")
}

/// Lineup uid: `!Lineup!{lineupName}`.
#[must_use]
pub fn lineup_uid(lineup_name: &str) -> String {
    format!("!Lineup!{lineup_name}")
}

/// Channel-mapping uid: `!Channel!{lineupName}!{major}.{minor}`.
#[must_use]
pub fn channel_uid(lineup_name: &str, major: i64, minor: i64) -> String {
    format!("!Channel!{lineup_name}!{major}.{minor}")
}

/// Virtual channel number rendering: `{major}.{minor}`, minor always
/// rendered even when zero.
#[must_use]
pub fn channel_number(major: i64, minor: i64) -> String {
    format!("{major}.{minor}")
}
