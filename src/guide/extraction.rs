//! Extraction of flat guide records from the schedule tree.
//!
//! One pass over channel → day → event produces every record set the
//! output needs. Entities that repeat across events (programs, people,
//! series, images, affiliates) are deduplicated by their natural id with
//! first-seen-wins semantics: the provider returns identical metadata on
//! every occurrence, so later duplicates are dropped without merging.
//! Schedule entries are one-per-event and never deduplicated.

use std::collections::HashSet;

use tracing::warn;

use super::ids;
use super::keywords::keyword_for_genre;
use super::models::{Channel, ScheduleDocument};

/// A deduplicated program, keyed by the provider's `programId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramRecord {
    pub id: String,
    pub uid: String,
    pub title: String,
    pub episode_title: String,
    pub description: String,
    pub short_description: String,
    pub original_air_date: String,
    /// Keyword id from the fixed genre vocabulary.
    pub keywords: String,
    /// `"1"`/`"0"` per the output schema's boolean convention.
    pub is_series: String,
    pub is_kids: String,
    /// SeriesInfo id this program belongs to, for series episodes.
    pub series: Option<String>,
}

/// One airing of a program on a service. Never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntryRecord {
    pub service: String,
    pub program: String,
    pub start_time: String,
    pub duration: String,
    pub is_cc: String,
    /// `"2"` for stereo audio, `"1"` otherwise.
    pub audio_format: String,
}

/// A deduplicated cast or crew member, keyed by `personId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub id: String,
    pub uid: String,
    pub name: String,
    pub role: String,
    pub character_name: Option<String>,
}

/// A deduplicated series, keyed by the series-parent identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRecord {
    pub id: String,
    pub uid: String,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub start_air_date: String,
}

/// One season shell per series, carrying the back-reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonRecord {
    pub id: String,
    pub uid: String,
    /// The SeriesInfo id this season belongs to.
    pub series: String,
}

/// A deduplicated guide image (program show-card or channel logo), keyed
/// by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: String,
    pub uid: String,
    pub url: String,
}

/// A deduplicated network affiliate, keyed by network name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliateRecord {
    pub name: String,
    pub uid: String,
}

/// Every record set extracted from one schedule fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuideRecords {
    pub programs: Vec<ProgramRecord>,
    pub schedule_entries: Vec<ScheduleEntryRecord>,
    pub people: Vec<PersonRecord>,
    pub series: Vec<SeriesRecord>,
    pub seasons: Vec<SeasonRecord>,
    pub images: Vec<ImageRecord>,
    pub affiliates: Vec<AffiliateRecord>,
}

/// First 100 characters of the description, no ellipsis.
fn short_description(description: &str) -> String {
    description.chars().take(100).collect()
}

fn flag(value: bool) -> String {
    String::from(if value { "1" } else { "0" })
}

/// Extracts all record sets from a schedule tree and the channel list.
///
/// Missing levels in the tree yield empty sets; a schedule channel
/// without a `channelIndex` is skipped entirely, because no service can
/// be joined to it. Deterministic: output order follows input order.
#[must_use]
pub fn extract(schedule: &ScheduleDocument, channels: &[Channel]) -> GuideRecords {
    let mut records = GuideRecords::default();
    let mut seen_programs = HashSet::new();
    let mut seen_people = HashSet::new();
    let mut seen_series = HashSet::new();
    let mut seen_images = HashSet::new();
    let mut seen_affiliates = HashSet::new();

    for schedule_channel in &schedule.channels {
        let index = schedule_channel.index();
        if index < 0 {
            warn!("schedule channel missing channelIndex, skipping");
            continue;
        }
        let service = ids::service_id(index);

        for day in &schedule_channel.days {
            for event in &day.events {
                let program_id = event.program_id().to_string();

                records.schedule_entries.push(ScheduleEntryRecord {
                    service: service.clone(),
                    program: program_id.clone(),
                    start_time: event.start_time().to_string(),
                    duration: event.duration().to_string(),
                    is_cc: flag(event.is_cc()),
                    audio_format: String::from(if event.is_stereo() { "2" } else { "1" }),
                });

                if seen_programs.insert(program_id.clone()) {
                    let series = event
                        .is_series()
                        .then(|| ids::series_id(event.series_parent()));
                    records.programs.push(ProgramRecord {
                        uid: ids::program_uid(&program_id),
                        id: program_id.clone(),
                        title: event.title().to_string(),
                        episode_title: event.episode_title().to_string(),
                        description: event.description().to_string(),
                        short_description: short_description(event.description()),
                        original_air_date: event.original_air_date().to_string(),
                        keywords: keyword_for_genre(event.genre()).to_string(),
                        is_series: flag(event.is_series()),
                        is_kids: flag(event.is_kids()),
                        series,
                    });
                }

                if event.is_series() {
                    let parent = event.series_parent().to_string();
                    if seen_series.insert(parent.clone()) {
                        records.series.push(SeriesRecord {
                            id: ids::series_id(&parent),
                            uid: ids::series_uid(&parent),
                            title: event.title().to_string(),
                            description: event.description().to_string(),
                            short_description: short_description(event.description()),
                            start_air_date: event.original_air_date().to_string(),
                        });
                        records.seasons.push(SeasonRecord {
                            id: ids::season_id(&parent),
                            uid: ids::season_uid(&parent),
                            series: ids::series_id(&parent),
                        });
                    }
                }

                for member in &event.cast_and_crew {
                    let natural = member.person_id().to_string();
                    if seen_people.insert(natural.clone()) {
                        records.people.push(PersonRecord {
                            id: ids::person_id(&natural),
                            uid: ids::person_uid(member.name()),
                            name: member.name().to_string(),
                            role: member.role().to_string(),
                            character_name: member.character_name().map(str::to_string),
                        });
                    }
                }

                let show_card = event.show_card();
                if !show_card.is_empty() && seen_images.insert(show_card.to_string()) {
                    records.images.push(ImageRecord {
                        id: ids::program_image_id(&program_id),
                        uid: ids::program_image_uid(&program_id),
                        url: show_card.to_string(),
                    });
                }
            }
        }
    }

    for channel in channels {
        let logo = channel.logo();
        if !logo.is_empty() && seen_images.insert(logo.to_string()) {
            records.images.push(ImageRecord {
                id: ids::channel_image_id(channel.index()),
                uid: ids::channel_image_uid(channel.call_sign()),
                url: logo.to_string(),
            });
        }

        let network = channel.network();
        if !network.is_empty() && seen_affiliates.insert(network.to_string()) {
            records.affiliates.push(AffiliateRecord {
                name: network.to_string(),
                uid: ids::affiliate_uid(network),
            });
        }
    }

    records
}
