//! In-memory model of a message catalogue.
//!
//! A catalogue is the parsed form of one XLIFF document: header attributes plus
//! an ordered list of trans-units. Payloads and unknown markup are kept as raw
//! XML so a load/save cycle leaves them untouched.

use std::collections::HashSet;

/// One translatable message, keyed by its trans-unit id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: String,
    /// Inline markup between `<source>` and `</source>`
    pub source: String,
    /// Inline markup between `<target>` and `</target>`, if the unit has one
    pub target: Option<String>,
    /// Trans-unit attributes other than `id`, in document order
    pub attributes: Vec<(String, String)>,
    /// Attributes of the `<target>` element
    pub target_attributes: Vec<(String, String)>,
    /// Other child elements (notes, context groups), verbatim
    pub extras: Vec<String>,
    /// Index into `Catalogue::groups` of the `<group>` holding this unit
    pub group: Option<usize>,
}

impl MessageRecord {
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: None,
            attributes: Vec::new(),
            target_attributes: Vec::new(),
            extras: Vec::new(),
            group: None,
        }
    }

    /// Copy of this record without translated text, as sent to the provider.
    pub fn untranslated(&self) -> Self {
        Self {
            target: None,
            target_attributes: Vec::new(),
            ..self.clone()
        }
    }

    /// Copy of this record carrying `text` as its translation.
    pub fn translated(&self, text: impl Into<String>) -> Self {
        Self {
            target: Some(text.into()),
            ..self.clone()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Counts from merging translated records into a catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub appended: usize,
    /// Records skipped because the catalogue already had their id
    pub kept: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    /// Attributes of the root `<xliff>` element
    pub xliff_attributes: Vec<(String, String)>,
    /// Attributes of `<file>` other than the language pair
    pub file_attributes: Vec<(String, String)>,
    /// Children of `<file>` other than `<body>` (usually `<header>`), verbatim
    pub file_extras: Vec<String>,
    /// Attributes of each `<group>` in the body, in document order
    pub groups: Vec<Vec<(String, String)>>,
    /// `<file>` elements after the first one, verbatim
    pub other_files: Vec<String>,
    pub units: Vec<MessageRecord>,
}

impl Default for Catalogue {
    fn default() -> Self {
        Self {
            source_language: None,
            target_language: None,
            xliff_attributes: vec![
                ("version".to_string(), "1.2".to_string()),
                (
                    "xmlns".to_string(),
                    "urn:oasis:names:tc:xliff:document:1.2".to_string(),
                ),
            ],
            file_attributes: vec![
                ("datatype".to_string(), "plaintext".to_string()),
                ("original".to_string(), "ng2.template".to_string()),
            ],
            file_extras: Vec::new(),
            groups: Vec::new(),
            other_files: Vec::new(),
            units: Vec::new(),
        }
    }
}

impl Catalogue {
    pub fn new(source_language: impl Into<String>, units: Vec<MessageRecord>) -> Self {
        Self {
            source_language: Some(source_language.into()),
            units,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|unit| unit.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&MessageRecord> {
        self.units.iter().find(|unit| unit.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// First id that occurs more than once, if any.
    pub fn duplicate_id(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.ids().find(|id| !seen.insert(*id))
    }

    /// A copy of this document for `locale` with `units` substituted as its body.
    pub fn for_locale(&self, locale: &str, units: Vec<MessageRecord>) -> Self {
        Self {
            target_language: Some(locale.to_string()),
            units,
            ..self.clone()
        }
    }

    /// Append records whose id is new at the end of the body, outside any group.
    /// Existing records are never touched, so a record whose id is already
    /// present is dropped.
    pub fn merge(&mut self, records: Vec<MessageRecord>) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();
        for record in records {
            if self.contains(&record.id) {
                outcome.kept += 1;
                continue;
            }
            self.units.push(MessageRecord { group: None, ..record });
            outcome.appended += 1;
        }
        outcome
    }
}
