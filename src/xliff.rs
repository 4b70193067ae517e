//! XLIFF 1.2 reading and writing.
//!
//! Only the structure the sync engine needs is interpreted
//! (`xliff/file/body/trans-unit`). Source and target payloads, notes and the
//! file header are carried as raw markup. Units come from the first `<file>`;
//! later files are kept verbatim. One level of `<group>` is supported, any
//! other body structure is rejected rather than rewritten.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::catalogue::{Catalogue, MessageRecord};
use crate::error::{Result, SyncError};

pub const FILE_EXTENSION: &str = "xlf";

pub fn parse_catalogue(input: &str) -> Result<Catalogue> {
    let mut reader = Reader::from_str(input);
    reader.trim_text(true);

    let mut catalogue = Catalogue {
        xliff_attributes: Vec::new(),
        file_attributes: Vec::new(),
        ..Catalogue::default()
    };
    let mut seen_file = false;
    let mut in_file = false;
    let mut in_body = false;
    let mut group = None;

    loop {
        let before = reader.buffer_position();
        match reader.read_event()? {
            Event::Start(start) => match start.local_name().as_ref() {
                b"xliff" => catalogue.xliff_attributes = attributes(&start)?,
                b"file" if seen_file => {
                    let end = start.to_end().into_owned();
                    reader.read_to_end(end.name())?;
                    let fragment = input[before..reader.buffer_position()].trim();
                    catalogue.other_files.push(fragment.to_string());
                }
                b"file" => {
                    in_file = true;
                    seen_file = true;
                    read_file_header(&mut catalogue, &start)?;
                }
                b"body" if in_file => in_body = true,
                b"group" if in_body => {
                    if group.is_some() {
                        return Err(SyncError::Malformed("nested <group> elements are not supported".to_string()));
                    }
                    catalogue.groups.push(attributes(&start)?);
                    group = Some(catalogue.groups.len() - 1);
                }
                b"trans-unit" if in_body => {
                    let mut unit = read_unit(&mut reader, input, &start)?;
                    unit.group = group;
                    catalogue.units.push(unit);
                }
                name if in_body => return Err(unsupported(name)),
                _ if in_file => {
                    let end = start.to_end().into_owned();
                    reader.read_to_end(end.name())?;
                    let fragment = input[before..reader.buffer_position()].trim();
                    catalogue.file_extras.push(fragment.to_string());
                }
                _ => {}
            },
            Event::Empty(start) => match start.local_name().as_ref() {
                b"file" if seen_file => {
                    let fragment = input[before..reader.buffer_position()].trim();
                    catalogue.other_files.push(fragment.to_string());
                }
                b"file" => {
                    seen_file = true;
                    read_file_header(&mut catalogue, &start)?;
                }
                b"group" if in_body => {
                    if group.is_some() {
                        return Err(SyncError::Malformed("nested <group> elements are not supported".to_string()));
                    }
                    catalogue.groups.push(attributes(&start)?);
                }
                b"trans-unit" if in_body => {
                    let mut unit = MessageRecord::new(unit_id(&start)?, "");
                    unit.attributes = unit_attributes(&start)?;
                    unit.group = group;
                    catalogue.units.push(unit);
                }
                name if in_body => return Err(unsupported(name)),
                _ if in_file => {
                    let fragment = input[before..reader.buffer_position()].trim();
                    catalogue.file_extras.push(fragment.to_string());
                }
                _ => {}
            },
            Event::End(end) => match end.local_name().as_ref() {
                b"group" => group = None,
                b"body" => in_body = false,
                b"file" => in_file = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(id) = catalogue.duplicate_id() {
        return Err(SyncError::DuplicateId(id.to_string()));
    }

    Ok(catalogue)
}

fn unsupported(name: &[u8]) -> SyncError {
    SyncError::Malformed(format!(
        "unsupported element <{}> in body",
        String::from_utf8_lossy(name)
    ))
}

fn read_file_header(catalogue: &mut Catalogue, start: &BytesStart) -> Result<()> {
    for (key, value) in attributes(start)? {
        match key.as_str() {
            "source-language" => catalogue.source_language = Some(value),
            "target-language" => catalogue.target_language = Some(value),
            _ => catalogue.file_attributes.push((key, value)),
        }
    }
    Ok(())
}

fn read_unit(reader: &mut Reader<&[u8]>, input: &str, start: &BytesStart) -> Result<MessageRecord> {
    let mut unit = MessageRecord::new(unit_id(start)?, "");
    unit.attributes = unit_attributes(start)?;

    loop {
        let before = reader.buffer_position();
        match reader.read_event()? {
            Event::Start(child) => {
                let end = child.to_end().into_owned();
                match child.local_name().as_ref() {
                    b"source" => {
                        let span = reader.read_to_end(end.name())?;
                        unit.source = input[span.start as usize..span.end as usize].to_string();
                    }
                    b"target" => {
                        unit.target_attributes = attributes(&child)?;
                        let span = reader.read_to_end(end.name())?;
                        unit.target = Some(input[span.start as usize..span.end as usize].to_string());
                    }
                    _ => {
                        reader.read_to_end(end.name())?;
                        let fragment = input[before..reader.buffer_position()].trim();
                        unit.extras.push(fragment.to_string());
                    }
                }
            }
            Event::Empty(child) => match child.local_name().as_ref() {
                b"source" => unit.source.clear(),
                b"target" => {
                    unit.target_attributes = attributes(&child)?;
                    unit.target = Some(String::new());
                }
                _ => {
                    let fragment = input[before..reader.buffer_position()].trim();
                    unit.extras.push(fragment.to_string());
                }
            },
            Event::End(_) => break,
            Event::Eof => {
                return Err(SyncError::Malformed(format!(
                    "trans-unit '{}' is not closed",
                    unit.id
                )));
            }
            _ => {}
        }
    }

    Ok(unit)
}

fn unit_id(start: &BytesStart) -> Result<String> {
    attributes(start)?
        .into_iter()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| SyncError::Malformed("trans-unit without an id attribute".to_string()))
}

fn unit_attributes(start: &BytesStart) -> Result<Vec<(String, String)>> {
    Ok(attributes(start)?
        .into_iter()
        .filter(|(key, _)| key != "id")
        .collect())
}

fn attributes(start: &BytesStart) -> Result<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(attributes)
}

/// Serialize a catalogue as an indented XLIFF 1.2 document.
pub fn to_xml(catalogue: &Catalogue) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut xliff = BytesStart::new("xliff");
    for (key, value) in &catalogue.xliff_attributes {
        xliff.push_attribute((key.as_str(), value.as_str()));
    }
    writer.write_event(Event::Start(xliff))?;

    let mut file = BytesStart::new("file");
    if let Some(language) = &catalogue.source_language {
        file.push_attribute(("source-language", language.as_str()));
    }
    if let Some(language) = &catalogue.target_language {
        file.push_attribute(("target-language", language.as_str()));
    }
    for (key, value) in &catalogue.file_attributes {
        file.push_attribute((key.as_str(), value.as_str()));
    }
    writer.write_event(Event::Start(file))?;
    for fragment in &catalogue.file_extras {
        write_fragment(&mut writer, fragment)?;
    }

    writer.write_event(Event::Start(BytesStart::new("body")))?;
    let mut open_group = None;
    for unit in &catalogue.units {
        if unit.group != open_group {
            if open_group.is_some() {
                writer.write_event(Event::End(BytesEnd::new("group")))?;
            }
            if let Some(index) = unit.group {
                writer.write_event(Event::Start(group_start(catalogue, index)?))?;
            }
            open_group = unit.group;
        }
        write_unit(&mut writer, unit)?;
    }
    if open_group.is_some() {
        writer.write_event(Event::End(BytesEnd::new("group")))?;
    }
    // Groups without units have no position among the units
    for index in 0..catalogue.groups.len() {
        if !catalogue.units.iter().any(|unit| unit.group == Some(index)) {
            writer.write_event(Event::Empty(group_start(catalogue, index)?))?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("file")))?;
    for fragment in &catalogue.other_files {
        write_fragment(&mut writer, fragment)?;
    }
    writer.write_event(Event::End(BytesEnd::new("xliff")))?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| SyncError::Malformed(format!("Serialized document is not UTF-8: {}", e)))?;
    xml.push('\n');
    Ok(xml)
}

fn group_start(catalogue: &Catalogue, index: usize) -> Result<BytesStart<'static>> {
    let attributes = catalogue
        .groups
        .get(index)
        .ok_or_else(|| SyncError::Malformed(format!("trans-unit refers to missing group {}", index)))?;
    let mut start = BytesStart::new("group");
    for (key, value) in attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    Ok(start)
}

fn write_unit(writer: &mut Writer<Vec<u8>>, unit: &MessageRecord) -> Result<()> {
    let mut start = BytesStart::new("trans-unit");
    start.push_attribute(("id", unit.id.as_str()));
    for (key, value) in &unit.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    writer.write_event(Event::Start(start))?;

    write_payload(writer, BytesStart::new("source"), &unit.source)?;
    if let Some(target) = &unit.target {
        let mut element = BytesStart::new("target");
        for (key, value) in &unit.target_attributes {
            element.push_attribute((key.as_str(), value.as_str()));
        }
        write_payload(writer, element, target)?;
    }
    for fragment in &unit.extras {
        write_fragment(writer, fragment)?;
    }

    writer.write_event(Event::End(BytesEnd::new("trans-unit")))?;
    Ok(())
}

fn write_payload(writer: &mut Writer<Vec<u8>>, element: BytesStart, markup: &str) -> Result<()> {
    // An empty Start/End pair would pick up indentation as content
    if markup.is_empty() {
        writer.write_event(Event::Empty(element))?;
        return Ok(());
    }
    let end = element.to_end().into_owned();
    writer.write_event(Event::Start(element))?;
    writer.write_event(Event::Text(BytesText::from_escaped(markup)))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}

fn write_fragment(writer: &mut Writer<Vec<u8>>, fragment: &str) -> Result<()> {
    use std::io::Write;

    writer.write_indent()?;
    writer.get_mut().write_all(fragment.as_bytes())?;
    Ok(())
}
