//! A deduplicated, searchable collection of voices gathered from many banks.

use std::path::Path;

use log::{info, warn};
use regex::{Regex, RegexBuilder};

use crate::bank::{self, Bank};
use crate::dedup::DedupTable;
use crate::error::{Error, Result};
use crate::patch::Voice;
use crate::scan;

/// Flat voice collection in scan order with duplicates removed.
///
/// Banks are folded in one at a time; the first occurrence of a voice
/// wins and later copies only bump [`Library::duplicates`].
#[derive(Debug, Default)]
pub struct Library {
    voices: Vec<Voice>,
    table: DedupTable,
    filter: Option<Regex>,
    duplicates: usize,
    scanned: usize,
    skipped: usize,
    banks: usize,
}

impl Library {
    /// Creates an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a library from every `.syx` file in `dir`.
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut library = Self::new();
        library.ingest_dir(dir)?;
        Ok(library)
    }

    /// Appends the voices of `bank` that have not been seen before.
    /// Returns how many were kept.
    ///
    /// Voices the bank already dropped through [`Bank::decode_dedup`] count
    /// as scanned duplicates.
    pub fn ingest(&mut self, bank: Bank) -> usize {
        self.banks += 1;
        self.duplicates += bank.duplicates;
        self.scanned += bank.duplicates + bank.voices.len();
        let mut kept = 0;
        for voice in bank.voices {
            if self.table.insert(&voice) {
                self.voices.push(voice);
                kept += 1;
            } else {
                self.duplicates += 1;
            }
        }
        kept
    }

    /// Decodes `data` and ingests it, tagging every voice with `file_name`.
    ///
    /// A buffer that is not a usable bank is skipped and counted in
    /// [`Library::skipped`]; it contributes no voices and no duplicates.
    pub fn ingest_bytes(&mut self, file_name: &str, data: impl Into<Vec<u8>>) -> Result<usize> {
        match Bank::decode(data) {
            Ok(bank) => Ok(self.ingest(bank.with_file_name(file_name))),
            Err(e) if e.is_skip() => {
                warn!("skipping {}: {}", file_name, e);
                self.skipped += 1;
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    /// Ingests every `.syx` file in `dir`, in file name order. Returns how
    /// many voices were kept.
    ///
    /// Files are read before any of them is ingested, so a read failure
    /// leaves the library untouched.
    pub fn ingest_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let files = scan::read_syx_files(dir)?;

        let mut kept = 0;
        for (name, data) in files {
            kept += self.ingest_bytes(&name, data)?;
        }

        info!(
            "{}: {} files, {} voices, {} duplicates, {} skipped",
            dir.display(),
            self.file_count(),
            self.len(),
            self.duplicates,
            self.skipped
        );

        Ok(kept)
    }

    /// Sets the name filter. An empty pattern removes it.
    ///
    /// The pattern is matched case-insensitively as a regular expression,
    /// or as a plain substring when it is not a valid expression.
    pub fn search(&mut self, pattern: &str) {
        if pattern.is_empty() {
            self.filter = None;
            return;
        }

        let build = |p: &str| RegexBuilder::new(p).case_insensitive(true).build();
        self.filter = match build(pattern).or_else(|_| build(&regex::escape(pattern))) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!("ignoring search pattern {:?}: {}", pattern, e);
                None
            }
        };
    }

    /// The active search pattern, if any
    pub fn pattern(&self) -> Option<&str> {
        self.filter.as_ref().map(Regex::as_str)
    }

    /// Voices matching the active pattern, or all voices without one.
    /// Recomputed on every call.
    pub fn voices(&self) -> Vec<&Voice> {
        match &self.filter {
            Some(re) => self.voices.iter().filter(|v| re.is_match(&v.name())).collect(),
            None => self.voices.iter().collect(),
        }
    }

    /// Number of voices in [`Library::voices`]
    pub fn voice_count(&self) -> usize {
        match &self.filter {
            Some(re) => self.voices.iter().filter(|v| re.is_match(&v.name())).count(),
            None => self.voices.len(),
        }
    }

    /// Encodes `voices()[index]` for sending to the instrument, see
    /// [`bank::encode_voice`]. The index is relative to the filtered view.
    pub fn build_sysex(&self, index: usize) -> Result<Vec<u8>> {
        let voices = self.voices();
        let voice = voices.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: voices.len(),
        })?;
        Ok(bank::encode_voice(voice))
    }

    /// Every kept voice, ignoring the filter
    pub fn all_voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Number of kept voices, ignoring the filter
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// Whether no voice has been kept
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Voices dropped because an identical voice came first
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Buffers that did not decode into a bank
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Banks ingested
    pub fn file_count(&self) -> usize {
        self.banks
    }

    /// Voices offered to the library, kept or not
    pub fn total_scanned(&self) -> usize {
        self.scanned
    }
}
