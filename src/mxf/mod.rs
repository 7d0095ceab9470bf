//! Assembly of the MXF guide-import document.
//!
//! The consuming importer is order-sensitive: referenced entities must be
//! declared before the sections that reference them, so the section order
//! here is fixed. Every attribute value is written through the XML writer,
//! which escapes reserved characters; absent values reach this module as
//! empty strings (never a literal "None") because the decode layer
//! defaults them centrally.

use std::collections::{HashMap, HashSet};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use thiserror::Error;
use tracing::warn;

use crate::guide::models::{Channel, LineupInfo, ProviderInfo};
use crate::guide::{GuideRecords, ScheduleEntryRecord, ids, keywords};

/// Fixed id of the single synthetic lineup.
const LINEUP_ID: &str = "l1";

/// Strong-name key of the Media Center guide assemblies; the importer
/// checks it verbatim.
const ASSEMBLY_PUBLIC_KEY: &str = "0024000004800000940000000602000000240000525341310004000001000100B5FC90E7027F67871E773A8FDE8938C81DD402BA65B9201D60593E96C492651E889CC13F1415EBB53FAC1131AE0BD333C5EE6021672D9718EA31A8AEBD0DA0072F25D87DBA6FC90FFD598ED4DA35E44C398C454307E8E33B8426143DAEC9F596836F97C8F74750E5975C64E2189F45DEF46B2A2B1247ADC3652BF5C308055DA9";

const ASSEMBLY_VERSION: &str = "6.0.6000.0";

/// Errors that can occur while serializing the document.
#[derive(Debug, Error)]
pub enum MxfError {
    /// The XML writer failed; writing to an in-memory buffer, this only
    /// happens on malformed element construction.
    #[error("failed to serialize MXF document: {0}")]
    Write(String),
}

/// Thin wrapper around [`quick_xml::Writer`] with slice-of-attrs helpers.
struct MxfWriter {
    inner: Writer<Vec<u8>>,
}

impl MxfWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn declaration(&mut self) -> Result<(), MxfError> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), MxfError> {
        let mut element = BytesStart::new(name);
        for attr in attrs {
            element.push_attribute(*attr);
        }
        self.write(Event::Start(element))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), MxfError> {
        let mut element = BytesStart::new(name);
        for attr in attrs {
            element.push_attribute(*attr);
        }
        self.write(Event::Empty(element))
    }

    fn end(&mut self, name: &str) -> Result<(), MxfError> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), MxfError> {
        self.inner
            .write_event(event)
            .map_err(|error| MxfError::Write(error.to_string()))
    }

    fn into_xml(self) -> Result<String, MxfError> {
        String::from_utf8(self.inner.into_inner())
            .map_err(|error| MxfError::Write(error.to_string()))
    }
}

/// Assembles the complete MXF document and returns it as a string.
///
/// # Errors
///
/// Returns [`MxfError`] when serialization fails.
pub fn assemble(
    provider: &ProviderInfo,
    lineup: &LineupInfo,
    channels: &[Channel],
    records: &GuideRecords,
) -> Result<String, MxfError> {
    let mut w = MxfWriter::new();

    w.declaration()?;
    w.start(
        "MXF",
        &[
            ("xmlns:sql", "urn:schemas-microsoft-com:XML-sql"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;

    write_assemblies(&mut w)?;
    write_providers(&mut w, provider)?;

    w.start("With", &[("provider", &provider.id)])?;
    write_keywords(&mut w)?;
    write_guide_images(&mut w, records)?;
    write_people(&mut w, records)?;
    write_series_infos(&mut w, records)?;
    write_seasons(&mut w, records)?;
    write_programs(&mut w, records)?;
    write_affiliates(&mut w, records)?;
    let services = write_services(&mut w, channels)?;
    write_schedule_entries(&mut w, &records.schedule_entries, &services)?;
    write_lineups(&mut w, lineup, channels)?;
    w.end("With")?;

    w.end("MXF")?;
    w.into_xml()
}

/// Assembly/type declarations the importer expects at the top of every
/// guide file.
fn write_assemblies(w: &mut MxfWriter) -> Result<(), MxfError> {
    let mcstore_types: &[(&str, &[(&str, &str)])] = &[
        ("Provider", &[]),
        ("UId", &[("parentFieldName", "target")]),
    ];
    let mcepg_types: &[(&str, &[(&str, &str)])] = &[
        ("Lineup", &[]),
        ("Channel", &[("parentFieldName", "lineup")]),
        ("Service", &[]),
        ("ScheduleEntry", &[("groupName", "ScheduleEntries")]),
        ("Program", &[]),
        ("Keyword", &[]),
        ("KeywordGroup", &[]),
        ("Person", &[("groupName", "People")]),
        ("ActorRole", &[("parentFieldName", "program")]),
        ("DirectorRole", &[("parentFieldName", "program")]),
        ("WriterRole", &[("parentFieldName", "program")]),
        ("HostRole", &[("parentFieldName", "program")]),
        ("GuideImage", &[]),
        ("Affiliate", &[]),
        ("SeriesInfo", &[]),
        ("Season", &[]),
    ];

    for (assembly, namespace, types) in [
        ("mcstore", "Microsoft.MediaCenter.Store", mcstore_types),
        ("mcepg", "Microsoft.MediaCenter.Guide", mcepg_types),
    ] {
        w.start(
            "Assembly",
            &[
                ("name", assembly),
                ("version", ASSEMBLY_VERSION),
                ("cultureInfo", ""),
                ("publicKey", ASSEMBLY_PUBLIC_KEY),
            ],
        )?;
        w.start("NameSpace", &[("name", namespace)])?;
        for &(type_name, extra) in types {
            let mut attrs: Vec<(&str, &str)> = vec![("name", type_name)];
            attrs.extend_from_slice(extra);
            w.empty("Type", &attrs)?;
        }
        w.end("NameSpace")?;
        w.end("Assembly")?;
    }
    Ok(())
}

fn write_providers(w: &mut MxfWriter, provider: &ProviderInfo) -> Result<(), MxfError> {
    w.start("Providers", &[])?;
    w.empty(
        "Provider",
        &[
            ("id", &provider.id),
            ("name", &provider.name),
            ("displayName", &provider.name),
            ("copyright", "© TitanTV Inc. All Rights Reserved."),
        ],
    )?;
    w.end("Providers")
}

/// The full keyword vocabulary plus its single group; static reference
/// data, emitted regardless of which genres occur in the fetched guide.
fn write_keywords(w: &mut MxfWriter) -> Result<(), MxfError> {
    w.start("Keywords", &[])?;
    for &(id, word) in keywords::KEYWORDS {
        w.empty("Keyword", &[("id", id), ("word", word)])?;
    }
    w.end("Keywords")?;

    let members: Vec<&str> = keywords::KEYWORDS
        .iter()
        .map(|(id, _)| *id)
        .filter(|id| *id != keywords::DEFAULT_KEYWORD)
        .collect();
    let member_list = members.join(",");

    w.start("KeywordGroups", &[])?;
    w.empty(
        "KeywordGroup",
        &[
            ("uid", "!KeywordGroup!General"),
            ("groupName", "General"),
            ("keywords", &member_list),
        ],
    )?;
    w.end("KeywordGroups")
}

fn write_guide_images(w: &mut MxfWriter, records: &GuideRecords) -> Result<(), MxfError> {
    w.start("GuideImages", &[])?;
    for image in &records.images {
        w.empty(
            "GuideImage",
            &[
                ("id", &image.id),
                ("uid", &image.uid),
                ("imageUrl", &image.url),
            ],
        )?;
    }
    w.end("GuideImages")
}

fn write_people(w: &mut MxfWriter, records: &GuideRecords) -> Result<(), MxfError> {
    w.start("People", &[])?;
    for person in &records.people {
        w.empty(
            "Person",
            &[
                ("id", &person.id),
                ("name", &person.name),
                ("uid", &person.uid),
            ],
        )?;
    }
    w.end("People")
}

fn write_series_infos(w: &mut MxfWriter, records: &GuideRecords) -> Result<(), MxfError> {
    w.start("SeriesInfos", &[])?;
    for series in &records.series {
        w.empty(
            "SeriesInfo",
            &[
                ("id", &series.id),
                ("uid", &series.uid),
                ("title", &series.title),
                ("shortTitle", &series.title),
                ("description", &series.description),
                ("shortDescription", &series.short_description),
                ("startAirdate", &series.start_air_date),
            ],
        )?;
    }
    w.end("SeriesInfos")
}

fn write_seasons(w: &mut MxfWriter, records: &GuideRecords) -> Result<(), MxfError> {
    w.start("Seasons", &[])?;
    for season in &records.seasons {
        w.empty(
            "Season",
            &[
                ("id", &season.id),
                ("uid", &season.uid),
                ("series", &season.series),
            ],
        )?;
    }
    w.end("Seasons")
}

fn write_programs(w: &mut MxfWriter, records: &GuideRecords) -> Result<(), MxfError> {
    w.start("Programs", &[])?;
    for program in &records.programs {
        let mut attrs: Vec<(&str, &str)> = vec![
            ("id", &program.id),
            ("uid", &program.uid),
            ("title", &program.title),
            ("description", &program.description),
            ("shortDescription", &program.short_description),
            ("episodeTitle", &program.episode_title),
            ("originalAirdate", &program.original_air_date),
            ("keywords", &program.keywords),
            ("isSeries", &program.is_series),
            ("isKids", &program.is_kids),
        ];
        if let Some(series) = &program.series {
            attrs.push(("series", series));
        }
        w.empty("Program", &attrs)?;
    }
    w.end("Programs")
}

fn write_affiliates(w: &mut MxfWriter, records: &GuideRecords) -> Result<(), MxfError> {
    w.start("Affiliates", &[])?;
    for affiliate in &records.affiliates {
        w.empty(
            "Affiliate",
            &[("name", &affiliate.name), ("uid", &affiliate.uid)],
        )?;
    }
    w.end("Affiliates")
}

/// Writes the Services section and returns the set of service ids
/// actually emitted, for filtering the schedule-entry blocks.
fn write_services(w: &mut MxfWriter, channels: &[Channel]) -> Result<HashSet<String>, MxfError> {
    let mut emitted = HashSet::new();

    w.start("Services", &[])?;
    for channel in channels {
        if channel.index() < 0 {
            warn!(
                call_sign = channel.call_sign(),
                "channel missing channelIndex, no service emitted"
            );
            continue;
        }
        let id = ids::service_id(channel.index());
        let uid = ids::service_uid(channel.call_sign());
        let affiliate = ids::affiliate_uid(channel.network());
        let logo_image = ids::channel_image_id(channel.index());

        let mut attrs: Vec<(&str, &str)> = vec![
            ("id", &id),
            ("uid", &uid),
            ("name", channel.network()),
            ("callSign", channel.call_sign()),
        ];
        if !channel.network().is_empty() {
            attrs.push(("affiliate", &affiliate));
        }
        if !channel.logo().is_empty() {
            attrs.push(("logoImage", &logo_image));
        }
        w.empty("Service", &attrs)?;
        emitted.insert(id);
    }
    w.end("Services")?;

    Ok(emitted)
}

/// One `ScheduleEntries` block per service, in first-seen order.
///
/// Entries whose service id has no emitted `Service` are dropped rather
/// than left dangling; the importer rejects unresolved references.
fn write_schedule_entries(
    w: &mut MxfWriter,
    entries: &[ScheduleEntryRecord],
    services: &HashSet<String>,
) -> Result<(), MxfError> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&ScheduleEntryRecord>> = HashMap::new();
    let mut dropped = 0usize;

    for entry in entries {
        if !services.contains(&entry.service) {
            dropped += 1;
            continue;
        }
        let service = entry.service.as_str();
        if !groups.contains_key(service) {
            order.push(service);
        }
        groups.entry(service).or_default().push(entry);
    }

    if dropped > 0 {
        warn!(dropped, "schedule entries without a matching service");
    }

    for service in order {
        w.start("ScheduleEntries", &[("service", service)])?;
        if let Some(group) = groups.get(service) {
            for entry in group {
                w.empty(
                    "ScheduleEntry",
                    &[
                        ("program", &entry.program),
                        ("startTime", &entry.start_time),
                        ("duration", &entry.duration),
                        ("isCC", &entry.is_cc),
                        ("audioFormat", &entry.audio_format),
                    ],
                )?;
            }
        }
        w.end("ScheduleEntries")?;
    }
    Ok(())
}

fn write_lineups(
    w: &mut MxfWriter,
    lineup: &LineupInfo,
    channels: &[Channel],
) -> Result<(), MxfError> {
    let uid = ids::lineup_uid(lineup.name());

    w.start("Lineups", &[])?;
    w.start(
        "Lineup",
        &[("id", LINEUP_ID), ("uid", &uid), ("name", lineup.name())],
    )?;
    w.start("channels", &[])?;
    for channel in channels {
        if channel.index() < 0 {
            continue;
        }
        let channel_uid = ids::channel_uid(lineup.name(), channel.major(), channel.minor());
        let service = ids::service_id(channel.index());
        let number = ids::channel_number(channel.major(), channel.minor());

        w.empty(
            "Channel",
            &[
                ("uid", &channel_uid),
                ("lineup", LINEUP_ID),
                ("service", &service),
                ("number", &number),
                ("matchName", channel.call_sign()),
            ],
        )?;
    }
    w.end("channels")?;
    w.end("Lineup")?;
    w.end("Lineups")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::guide::extract;
    use crate::guide::models::ScheduleDocument;
    use serde_json::json;

    fn provider() -> ProviderInfo {
        ProviderInfo {
            id: "12345".to_string(),
            name: "guideuser".to_string(),
        }
    }

    fn lineup() -> LineupInfo {
        serde_json::from_value(json!({
            "lineupId": "L1",
            "lineupName": "Local Broadcast",
        }))
        .unwrap()
    }

    fn channels() -> Vec<Channel> {
        serde_json::from_value(json!([
            {"channelIndex": 5, "callSign": "WXYZ", "network": "ABC",
             "majorChannel": 7, "minorChannel": 1,
             "logo": "https://img.example/wxyz.png"},
        ]))
        .unwrap()
    }

    fn schedule() -> ScheduleDocument {
        serde_json::from_value(json!({
            "channels": [{"channelIndex": 5, "days": [{"events": [
                {"programId": "P1", "title": "News at Five",
                 "startTime": "20250101170000", "duration": 30,
                 "displayGenre": "News"},
            ]}]}]
        }))
        .unwrap()
    }

    fn assemble_fixture() -> String {
        let channels = channels();
        let records = extract(&schedule(), &channels);
        assemble(&provider(), &lineup(), &channels, &records).unwrap()
    }

    #[test]
    fn test_document_shape() {
        let xml = assemble_fixture();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<MXF"));
        assert!(xml.trim_end().ends_with("</MXF>"));
        assert!(xml.contains("<Assembly name=\"mcepg\""));
        assert!(xml.contains("<With provider=\"12345\">"));
    }

    #[test]
    fn test_section_order_is_fixed() {
        let xml = assemble_fixture();
        let sections = [
            "<Assembly", "<Providers>", "<Keywords>", "<KeywordGroups>", "<GuideImages>",
            "<People>", "<SeriesInfos>", "<Seasons>", "<Programs>", "<Affiliates>",
            "<Services>", "<ScheduleEntries ", "<Lineups>",
        ];
        let positions: Vec<usize> = sections
            .iter()
            .map(|s| xml.find(s).unwrap_or_else(|| panic!("missing section {s}")))
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted, "sections out of order");
    }

    #[test]
    fn test_keyword_table_always_emitted_in_full() {
        let records = GuideRecords::default();
        let xml = assemble(&provider(), &lineup(), &[], &records).unwrap();
        for (id, word) in keywords::KEYWORDS {
            assert!(
                xml.contains(&format!("<Keyword id=\"{id}\" word=\"{word}\"/>")),
                "missing keyword {id}"
            );
        }
        assert!(xml.contains("k100,k101,"));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let xml = assemble_fixture();

        assert!(xml.contains("<Program id=\"P1\""));
        assert!(xml.contains("keywords=\"k109\""));
        assert_eq!(xml.matches("<Program ").count(), 1);

        assert!(xml.contains("<ScheduleEntries service=\"s5\">"));
        assert!(xml.contains("<ScheduleEntry program=\"P1\""));
        assert!(xml.contains("startTime=\"20250101170000\""));
        assert!(xml.contains("duration=\"30\""));

        assert!(xml.contains("<Service id=\"s5\""));
        assert!(xml.contains("callSign=\"WXYZ\""));
        assert!(xml.contains("logoImage=\"i5\""));

        assert!(xml.contains("<Channel uid=\"!Channel!Local Broadcast!7.1\""));
        assert!(xml.contains("number=\"7.1\""));
        assert!(xml.contains("<Lineup id=\"l1\" uid=\"!Lineup!Local Broadcast\""));
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let channels: Vec<Channel> = serde_json::from_value(json!([
            {"channelIndex": 2, "callSign": "A&E", "network": "A&E"},
        ]))
        .unwrap();
        let records = extract(&ScheduleDocument::default(), &channels);
        let xml = assemble(&provider(), &lineup(), &channels, &records).unwrap();
        assert!(xml.contains("callSign=\"A&amp;E\""));
        assert!(!xml.contains("callSign=\"A&E\""));
    }

    #[test]
    fn test_entries_without_service_are_dropped() {
        // schedule references channelIndex 9, channel list only has 5
        let schedule: ScheduleDocument = serde_json::from_value(json!({
            "channels": [{"channelIndex": 9, "days": [{"events": [
                {"programId": "P9"},
            ]}]}]
        }))
        .unwrap();
        let channels = channels();
        let records = extract(&schedule, &channels);
        let xml = assemble(&provider(), &lineup(), &channels, &records).unwrap();

        assert!(!xml.contains("service=\"s9\""));
        assert!(!xml.contains("<ScheduleEntry program=\"P9\""));
    }

    #[test]
    fn test_no_literal_none_in_output() {
        let xml = assemble_fixture();
        assert!(!xml.contains("\"None\""));
    }

    #[test]
    fn test_channel_without_logo_has_no_logo_image() {
        let channels: Vec<Channel> = serde_json::from_value(json!([
            {"channelIndex": 3, "callSign": "KAAA", "network": "PBS"},
        ]))
        .unwrap();
        let records = extract(&ScheduleDocument::default(), &channels);
        let xml = assemble(&provider(), &lineup(), &channels, &records).unwrap();
        assert!(!xml.contains("logoImage="));
        assert!(!xml.contains("<GuideImage "));
    }
}
