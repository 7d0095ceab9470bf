//! Typed records for the three fetched JSON documents.
//!
//! Decoding applies the permissive defaulting policy in one place: every
//! field tolerates absence, `null`, and number/string drift (see
//! [`flex`](super::flex)), and record lists skip malformed elements
//! instead of failing the document. Downstream code reads defaults
//! through the accessor methods, never ad hoc.

use serde::Deserialize;

use super::flex;

/// Placeholder for absent text fields in the guide output.
const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// User document

/// `GET /api/user/{user_id}` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(deserialize_with = "flex::opt_string")]
    user_id: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    login_name: Option<String>,
}

impl UserDocument {
    /// Reduces the user document to the provider identity used in the
    /// output header.
    #[must_use]
    pub fn provider_info(self) -> ProviderInfo {
        ProviderInfo {
            id: self.user_id.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            name: self.login_name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

/// Provider identity emitted in the `Providers` section.
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    /// Provider id (the account's user id).
    pub id: String,
    /// Provider display name (the account's login name).
    pub name: String,
}

// ---------------------------------------------------------------------------
// Lineup document

/// `GET /api/lineup/{user_id}` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LineupDocument {
    #[serde(deserialize_with = "flex::lenient_vec")]
    lineups: Vec<LineupInfo>,
}

impl LineupDocument {
    /// Returns the first lineup, if any. Accounts here always have exactly
    /// one lineup per service area.
    #[must_use]
    pub fn into_first(self) -> Option<LineupInfo> {
        self.lineups.into_iter().next()
    }
}

/// One lineup entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineupInfo {
    #[serde(deserialize_with = "flex::opt_string")]
    lineup_id: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    lineup_name: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    time_zone: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    utc_offset: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    provider_id: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    provider_name: Option<String>,
    #[serde(deserialize_with = "flex::opt_bool")]
    observes_dst: Option<bool>,
}

impl LineupInfo {
    /// Lineup id, empty when absent.
    #[must_use]
    pub fn id(&self) -> &str {
        self.lineup_id.as_deref().unwrap_or_default()
    }

    /// Lineup display name, empty when absent.
    #[must_use]
    pub fn name(&self) -> &str {
        self.lineup_name.as_deref().unwrap_or_default()
    }

    /// Lineup time zone name, empty when absent.
    #[must_use]
    pub fn time_zone(&self) -> &str {
        self.time_zone.as_deref().unwrap_or_default()
    }

    /// UTC offset as reported by the provider, empty when absent.
    #[must_use]
    pub fn utc_offset(&self) -> &str {
        self.utc_offset.as_deref().unwrap_or_default()
    }

    /// Listings provider id as reported on the lineup, empty when absent.
    #[must_use]
    pub fn provider_id(&self) -> &str {
        self.provider_id.as_deref().unwrap_or_default()
    }

    /// Listings provider name as reported on the lineup, empty when absent.
    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider_name.as_deref().unwrap_or_default()
    }

    /// Whether the lineup observes daylight saving.
    #[must_use]
    pub fn observes_dst(&self) -> bool {
        self.observes_dst.unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Channel document

/// `GET /api/channel/{user_id}/{lineup_id}` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChannelDocument {
    /// Channel list; malformed entries are skipped.
    #[serde(deserialize_with = "flex::lenient_vec")]
    pub channels: Vec<Channel>,
}

/// One channel from the lineup's channel list.
///
/// `channelIndex` is the only join key shared with the schedule tree;
/// `channelId` is not guaranteed to appear in both documents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Channel {
    #[serde(deserialize_with = "flex::opt_string")]
    channel_id: Option<String>,
    #[serde(deserialize_with = "flex::opt_i64")]
    channel_index: Option<i64>,
    #[serde(deserialize_with = "flex::opt_string")]
    call_sign: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    network: Option<String>,
    #[serde(deserialize_with = "flex::opt_i64")]
    major_channel: Option<i64>,
    #[serde(deserialize_with = "flex::opt_i64")]
    minor_channel: Option<i64>,
    #[serde(deserialize_with = "flex::opt_bool")]
    hd_capable: Option<bool>,
    #[serde(deserialize_with = "flex::opt_string")]
    logo: Option<String>,
}

impl Channel {
    /// Provider channel id, empty when absent.
    #[must_use]
    pub fn id(&self) -> &str {
        self.channel_id.as_deref().unwrap_or_default()
    }

    /// Provider-local ordinal joining this channel to the schedule tree;
    /// -1 when absent.
    #[must_use]
    pub fn index(&self) -> i64 {
        self.channel_index.unwrap_or(-1)
    }

    /// Station call sign, empty when absent.
    #[must_use]
    pub fn call_sign(&self) -> &str {
        self.call_sign.as_deref().unwrap_or_default()
    }

    /// Network name, empty when absent.
    #[must_use]
    pub fn network(&self) -> &str {
        self.network.as_deref().unwrap_or_default()
    }

    /// Virtual channel major number, -1 when absent.
    #[must_use]
    pub fn major(&self) -> i64 {
        self.major_channel.unwrap_or(-1)
    }

    /// Virtual channel minor number, 0 when absent.
    #[must_use]
    pub fn minor(&self) -> i64 {
        self.minor_channel.unwrap_or(0)
    }

    /// Whether the station broadcasts in HD.
    #[must_use]
    pub fn hd_capable(&self) -> bool {
        self.hd_capable.unwrap_or(false)
    }

    /// Station logo URL, empty when the channel has none.
    #[must_use]
    pub fn logo(&self) -> &str {
        self.logo.as_deref().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Schedule document

/// `GET /api/schedule/{user_id}/{lineup_id}/{start}/{duration}` response.
///
/// The tree nests channel → day → event; any missing level decodes to
/// empty, because a window with no guide data is not an error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScheduleDocument {
    /// Per-channel day lists; malformed entries are skipped.
    #[serde(deserialize_with = "flex::lenient_vec")]
    pub channels: Vec<ScheduleChannel>,
}

/// One channel's slice of the schedule tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleChannel {
    #[serde(deserialize_with = "flex::opt_i64")]
    channel_index: Option<i64>,
    /// Day buckets; malformed entries are skipped.
    #[serde(deserialize_with = "flex::lenient_vec")]
    pub days: Vec<ScheduleDay>,
}

impl ScheduleChannel {
    /// Join key into the channel list; -1 when absent.
    #[must_use]
    pub fn index(&self) -> i64 {
        self.channel_index.unwrap_or(-1)
    }
}

/// One day bucket of schedule events.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScheduleDay {
    /// Events airing this day; malformed entries are skipped.
    #[serde(deserialize_with = "flex::lenient_vec")]
    pub events: Vec<ScheduleEvent>,
}

/// One raw schedule event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleEvent {
    #[serde(deserialize_with = "flex::opt_string")]
    program_id: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    series_id: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    start_time: Option<String>,
    #[serde(deserialize_with = "flex::opt_i64")]
    duration: Option<i64>,
    #[serde(deserialize_with = "flex::opt_string")]
    title: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    episode_title: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    description: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    display_genre: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    program_type: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    original_air_date: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    show_card: Option<String>,
    #[serde(rename = "isCC", deserialize_with = "flex::opt_bool")]
    is_cc: Option<bool>,
    #[serde(deserialize_with = "flex::opt_bool")]
    is_stereo: Option<bool>,
    #[serde(deserialize_with = "flex::opt_i64")]
    age_ceiling: Option<i64>,
    /// Cast and crew credits; malformed entries are skipped.
    #[serde(deserialize_with = "flex::lenient_vec")]
    pub cast_and_crew: Vec<CastMember>,
}

impl ScheduleEvent {
    /// Natural program identifier, `"N/A"` when absent.
    #[must_use]
    pub fn program_id(&self) -> &str {
        self.program_id.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Series-parent identifier: the provider's `seriesId` when present,
    /// otherwise this event's own program id.
    #[must_use]
    pub fn series_parent(&self) -> &str {
        match self.series_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => self.program_id(),
        }
    }

    /// Event start time string, `"N/A"` when absent.
    #[must_use]
    pub fn start_time(&self) -> &str {
        self.start_time.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Event duration in minutes, 0 when absent.
    #[must_use]
    pub fn duration(&self) -> i64 {
        self.duration.unwrap_or(0)
    }

    /// Program title, `"N/A"` when absent.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Episode title, `"N/A"` when absent.
    #[must_use]
    pub fn episode_title(&self) -> &str {
        self.episode_title.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Program description, `"N/A"` when absent.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Display genre, `"N/A"` when absent.
    #[must_use]
    pub fn genre(&self) -> &str {
        self.display_genre.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Original air date, `"N/A"` when absent.
    #[must_use]
    pub fn original_air_date(&self) -> &str {
        self.original_air_date.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Show-card image URL, empty when the event has none.
    #[must_use]
    pub fn show_card(&self) -> &str {
        self.show_card.as_deref().unwrap_or_default()
    }

    /// Whether the provider classifies this event as a series episode.
    #[must_use]
    pub fn is_series(&self) -> bool {
        self.program_type.as_deref() == Some("Series")
    }

    /// Whether this is children's programming (age ceiling above zero).
    #[must_use]
    pub fn is_kids(&self) -> bool {
        self.age_ceiling.unwrap_or(0) > 0
    }

    /// Whether the event carries closed captions.
    #[must_use]
    pub fn is_cc(&self) -> bool {
        self.is_cc.unwrap_or(false)
    }

    /// Whether the event's audio is stereo.
    #[must_use]
    pub fn is_stereo(&self) -> bool {
        self.is_stereo.unwrap_or(false)
    }
}

/// One cast or crew credit on an event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CastMember {
    #[serde(deserialize_with = "flex::opt_string")]
    person_id: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    name: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    role: Option<String>,
    #[serde(deserialize_with = "flex::opt_string")]
    character_name: Option<String>,
}

impl CastMember {
    /// Natural person identifier, `"N/A"` when absent.
    #[must_use]
    pub fn person_id(&self) -> &str {
        self.person_id.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Person name, `"N/A"` when absent.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Credit role (Actor, Director, ...), `"N/A"` when absent.
    #[must_use]
    pub fn role(&self) -> &str {
        self.role.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Character name for acting credits.
    #[must_use]
    pub fn character_name(&self) -> Option<&str> {
        self.character_name.as_deref()
    }
}
