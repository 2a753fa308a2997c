//! In-memory shot collection built from uploaded exports.
//!
//! Each accepted file becomes a session. The library owns every shot, tracks
//! which sessions are selected, and recomputes club statistics on demand.

use crate::error::{Result, ShotError};
use crate::export::{read_export, RawRow, ReaderOptions};
use crate::model::{ClubStats, SessionSummary, Shot};
use crate::normalize::{normalize_rows, NormalizeConfig};
use crate::stats::{calculate_club_stats, OutlierConfig};
use chrono::Utc;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Everything that tunes reading, normalizing and filtering
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub reader: ReaderOptions,
    pub normalize: NormalizeConfig,
    pub outliers: OutlierConfig,
}

/// Outcome of one accepted file
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub session_id: String,
    pub hash: String,
    /// Data rows in the file
    pub rows: usize,
    /// Rows that became shots
    pub shots: usize,
}

impl IngestReport {
    pub fn rejected(&self) -> usize {
        self.rows - self.shots
    }
}

/// 32-bit rolling hash (`h * 31 + unit`, wrapping) over the UTF-16 code units of a file
pub fn content_hash(text: &str) -> String {
    let mut hash: i32 = 0;
    for unit in text.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(unit as i32);
    }
    hash.to_string()
}

/// A file that has been hashed and tokenized but not yet assigned a session
struct PreparedFile {
    hash: String,
    rows: Vec<RawRow>,
}

fn prepare(text: &str, options: &ReaderOptions) -> Result<PreparedFile> {
    let rows = read_export(text, options)?;
    Ok(PreparedFile {
        hash: content_hash(text),
        rows,
    })
}

#[derive(Debug, Default)]
pub struct ShotLibrary {
    config: PipelineConfig,
    shots: Vec<Shot>,
    hashes: HashSet<String>,
    selected: BTreeSet<String>,
    session_seq: u64,
}

impl ShotLibrary {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn next_session_id(&mut self) -> String {
        self.session_seq += 1;
        format!("session-{}-{}", Utc::now().timestamp_millis(), self.session_seq)
    }

    fn commit(&mut self, prepared: PreparedFile, session_id: String, shots: Vec<Shot>) -> Result<IngestReport> {
        if shots.is_empty() {
            return Err(ShotError::NoValidShots);
        }

        let report = IngestReport {
            session_id: session_id.clone(),
            hash: prepared.hash.clone(),
            rows: prepared.rows.len(),
            shots: shots.len(),
        };
        log::info!(
            "{}: accepted {} of {} rows",
            report.session_id,
            report.shots,
            report.rows
        );

        self.hashes.insert(prepared.hash);
        self.shots.extend(shots);
        self.selected.insert(session_id);
        Ok(report)
    }

    /// Ingest one export. The new session is selected.
    ///
    /// Fails with `DuplicateFile` if the same text was already accepted and
    /// `NoValidShots` if no row passes the validity gate; neither changes the library.
    pub fn ingest(&mut self, text: &str) -> Result<IngestReport> {
        let prepared = prepare(text, &self.config.reader)?;
        if self.hashes.contains(&prepared.hash) {
            return Err(ShotError::DuplicateFile(prepared.hash));
        }

        let session_id = self.next_session_id();
        let shots = normalize_rows(&prepared.rows, &session_id, &self.config.normalize);
        self.commit(prepared, session_id, shots)
    }

    /// Ingest several exports, tokenizing and normalizing them in parallel.
    ///
    /// Results come back in input order, one per file, and match what calling
    /// [`ShotLibrary::ingest`] on each file in turn would return. A repeat of an
    /// earlier file in the batch is a duplicate only if that earlier copy was
    /// accepted.
    pub fn ingest_many<S: AsRef<str> + Sync>(&mut self, texts: &[S]) -> Vec<Result<IngestReport>> {
        let reader = self.config.reader.clone();
        let prepared: Vec<Result<PreparedFile>> = texts
            .par_iter()
            .map(|text| prepare(text.as_ref(), &reader))
            .collect();

        // hash -> position of its first copy in this batch
        let mut first_copy: HashMap<String, usize> = HashMap::new();
        let mut copy_of: Vec<Option<usize>> = Vec::with_capacity(prepared.len());
        let mut jobs: Vec<Option<(PreparedFile, String)>> = Vec::with_capacity(prepared.len());
        let mut results: Vec<Option<Result<IngestReport>>> = Vec::with_capacity(prepared.len());
        for (i, file) in prepared.into_iter().enumerate() {
            match file {
                Ok(file) if self.hashes.contains(&file.hash) => {
                    log::warn!("Skipping duplicate file (hash {})", file.hash);
                    results.push(Some(Err(ShotError::DuplicateFile(file.hash))));
                    copy_of.push(None);
                    jobs.push(None);
                }
                Ok(file) => match first_copy.get(&file.hash).copied() {
                    Some(first) => {
                        results.push(None);
                        copy_of.push(Some(first));
                        jobs.push(None);
                    }
                    None => {
                        first_copy.insert(file.hash.clone(), i);
                        let session_id = self.next_session_id();
                        results.push(None);
                        copy_of.push(None);
                        jobs.push(Some((file, session_id)));
                    }
                },
                Err(e) => {
                    results.push(Some(Err(e)));
                    copy_of.push(None);
                    jobs.push(None);
                }
            }
        }

        let normalize = self.config.normalize.clone();
        let normalized: Vec<Option<Vec<Shot>>> = jobs
            .par_iter()
            .map(|job| {
                job.as_ref()
                    .map(|(file, session_id)| normalize_rows(&file.rows, session_id, &normalize))
            })
            .collect();

        for ((slot, job), shots) in results.iter_mut().zip(jobs).zip(normalized) {
            if let (Some((file, session_id)), Some(shots)) = (job, shots) {
                *slot = Some(self.commit(file, session_id, shots));
            }
        }

        // Later copies follow the outcome of their first copy
        for i in 0..results.len() {
            if let Some(first) = copy_of[i] {
                let outcome = match &results[first] {
                    Some(Ok(report)) => {
                        log::warn!("Skipping duplicate file (hash {})", report.hash);
                        Err(ShotError::DuplicateFile(report.hash.clone()))
                    }
                    _ => Err(ShotError::NoValidShots),
                };
                results[i] = Some(outcome);
            }
        }

        results
            .into_iter()
            .map(|r| r.unwrap_or_else(|| Err(ShotError::NoValidShots)))
            .collect()
    }

    /// Every shot in the library, selected or not
    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    /// Shots belonging to the selected sessions
    pub fn active_shots(&self) -> Vec<Shot> {
        self.shots
            .iter()
            .filter(|s| self.selected.contains(&s.session_id))
            .cloned()
            .collect()
    }

    /// Club statistics for the current selection, rebuilt on every call
    pub fn club_stats(&self) -> Vec<ClubStats> {
        calculate_club_stats(&self.active_shots(), &self.config.outliers)
    }

    /// One summary per session, newest first
    pub fn sessions(&self) -> Vec<SessionSummary> {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, Vec<&Shot>> = HashMap::new();
        for shot in &self.shots {
            let id = shot.session_id.as_str();
            if !groups.contains_key(id) {
                order.push(id);
            }
            groups.entry(id).or_default().push(shot);
        }

        let mut sessions: Vec<SessionSummary> = order
            .into_iter()
            .map(|id| {
                let shots = &groups[id];
                let total: f64 = shots.iter().map(|s| s.carry_distance).sum();
                SessionSummary {
                    id: id.to_string(),
                    date: shots[0].timestamp.clone(),
                    shot_count: shots.len(),
                    avg_carry: total / shots.len() as f64,
                }
            })
            .collect();

        sessions.sort_by(|a, b| b.date.cmp(&a.date));
        sessions
    }

    pub fn selected_sessions(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn is_selected(&self, session_id: &str) -> bool {
        self.selected.contains(session_id)
    }

    /// Flip one session in or out of the selection, returning whether it is now selected
    pub fn toggle_session(&mut self, session_id: &str) -> bool {
        if self.selected.remove(session_id) {
            false
        } else {
            let known = self.shots.iter().any(|s| s.session_id == session_id);
            if known {
                self.selected.insert(session_id.to_string());
            }
            known
        }
    }

    /// Select every session, or clear the selection if everything is already selected
    pub fn toggle_all(&mut self) {
        let all: BTreeSet<String> = self.shots.iter().map(|s| s.session_id.clone()).collect();
        if self.selected == all {
            self.selected.clear();
        } else {
            self.selected = all;
        }
    }

    /// Drop every shot, hash and selection
    pub fn purge(&mut self) {
        self.shots.clear();
        self.hashes.clear();
        self.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export(shots: &[(&str, f64, &str)]) -> String {
        let mut text = String::from("Date,Club Type,Ball Speed,Carry Distance\n,,[mph],[yds]\n");
        for (club, carry, date) in shots {
            text.push_str(&format!("{},{},{},{}\n", date, club, carry * 0.72, carry));
        }
        text
    }

    #[test]
    fn test_content_hash_matches_rolling_formula() {
        assert_eq!(content_hash(""), "0");
        assert_eq!(content_hash("a"), "97");
        // 97 * 31 + 98
        assert_eq!(content_hash("ab"), "3105");
        assert_ne!(content_hash("abc"), content_hash("acb"));
    }

    #[test]
    fn test_content_hash_wraps() {
        let long = "z".repeat(10_000);
        let hash: i64 = content_hash(&long).parse().unwrap();
        assert!(hash >= i32::MIN as i64 && hash <= i32::MAX as i64);
    }

    #[test]
    fn test_ingest_selects_new_session() {
        let mut library = ShotLibrary::default();
        let report = library
            .ingest(&export(&[("7 Iron", 150.0, "05/03/2024 10:00:00"), ("Driver", 230.0, "05/03/2024 10:05:00")]))
            .unwrap();
        assert_eq!(report.rows, 2);
        assert_eq!(report.shots, 2);
        assert_eq!(report.rejected(), 0);
        assert!(library.is_selected(&report.session_id));
        assert_eq!(library.active_shots().len(), 2);
        assert_eq!(library.shots()[0].id, format!("{}-0", report.session_id));
    }

    #[test]
    fn test_duplicate_file_rejected() {
        let mut library = ShotLibrary::default();
        let text = export(&[("7 Iron", 150.0, "05/03/2024 10:00:00")]);
        library.ingest(&text).unwrap();
        assert!(matches!(library.ingest(&text), Err(ShotError::DuplicateFile(_))));
        assert_eq!(library.shots().len(), 1);
    }

    #[test]
    fn test_no_valid_shots_leaves_library_untouched() {
        let mut library = ShotLibrary::default();
        let text = export(&[("7 Iron", 1.0, "05/03/2024 10:00:00")]);
        assert!(matches!(library.ingest(&text), Err(ShotError::NoValidShots)));
        assert!(library.shots().is_empty());
        // a rejected file is not remembered as seen
        assert!(matches!(library.ingest(&text), Err(ShotError::NoValidShots)));
    }

    #[test]
    fn test_structural_errors() {
        let mut library = ShotLibrary::default();
        assert!(matches!(library.ingest(""), Err(ShotError::EmptyFile)));
        assert!(matches!(
            library.ingest("Club Type,Carry Distance\n"),
            Err(ShotError::MissingHeaders)
        ));
    }

    #[test]
    fn test_session_selection() {
        let mut library = ShotLibrary::default();
        let first = library
            .ingest(&export(&[("7 Iron", 150.0, "05/03/2024 10:00:00")]))
            .unwrap();
        let second = library
            .ingest(&export(&[("8 Iron", 140.0, "06/03/2024 10:00:00"), ("8 Iron", 141.0, "06/03/2024 10:01:00")]))
            .unwrap();
        assert_ne!(first.session_id, second.session_id);
        assert_eq!(library.club_stats().len(), 2);

        assert!(!library.toggle_session(&first.session_id));
        let stats = library.club_stats();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].club, "8I");

        library.toggle_all();
        assert_eq!(library.active_shots().len(), 3);
        library.toggle_all();
        assert!(library.active_shots().is_empty());
        assert!(library.club_stats().is_empty());

        assert!(!library.toggle_session("session-unknown"));
    }

    #[test]
    fn test_sessions_newest_first() {
        let mut library = ShotLibrary::default();
        library
            .ingest(&export(&[("7 Iron", 150.0, "05/03/2024 10:00:00"), ("7 Iron", 154.0, "05/03/2024 10:01:00")]))
            .unwrap();
        library
            .ingest(&export(&[("PW", 110.0, "09/03/2024 09:00:00")]))
            .unwrap();

        let sessions = library.sessions();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].date, "2024-03-09T09:00:00.000Z");
        assert_eq!(sessions[0].shot_count, 1);
        assert_eq!(sessions[1].shot_count, 2);
        assert_eq!(sessions[1].avg_carry, 152.0);
    }

    #[test]
    fn test_ingest_many_in_order() {
        let mut library = ShotLibrary::default();
        let a = export(&[("7 Iron", 150.0, "05/03/2024 10:00:00")]);
        let b = export(&[("Driver", 230.0, "06/03/2024 10:00:00")]);
        let bad = export(&[("Driver", 2.0, "06/03/2024 10:00:00")]);
        let results = library.ingest_many(&[a.clone(), String::new(), b, a, bad]);

        assert_eq!(results.len(), 5);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ShotError::EmptyFile)));
        assert!(results[2].is_ok());
        assert!(matches!(results[3], Err(ShotError::DuplicateFile(_))));
        assert!(matches!(results[4], Err(ShotError::NoValidShots)));

        assert_eq!(library.shots().len(), 2);
        assert_eq!(library.club_stats().len(), 2);
    }

    #[test]
    fn test_ingest_many_repeat_of_rejected_file() {
        let bad = export(&[("7 Iron", 1.0, "05/03/2024 10:00:00")]);

        let mut sequential = ShotLibrary::default();
        assert!(matches!(sequential.ingest(&bad), Err(ShotError::NoValidShots)));
        assert!(matches!(sequential.ingest(&bad), Err(ShotError::NoValidShots)));

        let mut batch = ShotLibrary::default();
        let results = batch.ingest_many(&[bad.clone(), bad]);
        assert!(matches!(results[0], Err(ShotError::NoValidShots)));
        assert!(matches!(results[1], Err(ShotError::NoValidShots)));
        assert!(batch.shots().is_empty());
    }

    #[test]
    fn test_ingest_many_repeat_of_accepted_file() {
        let good = export(&[("7 Iron", 150.0, "05/03/2024 10:00:00")]);
        let mut library = ShotLibrary::default();
        let results = library.ingest_many(&[good.clone(), good.clone(), good]);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ShotError::DuplicateFile(_))));
        assert!(matches!(results[2], Err(ShotError::DuplicateFile(_))));
        assert_eq!(library.shots().len(), 1);
    }

    #[test]
    fn test_purge() {
        let mut library = ShotLibrary::default();
        let text = export(&[("7 Iron", 150.0, "05/03/2024 10:00:00")]);
        library.ingest(&text).unwrap();
        library.purge();
        assert!(library.shots().is_empty());
        assert_eq!(library.selected_sessions().count(), 0);
        // hashes are gone too, so the same file can be loaded again
        assert!(library.ingest(&text).is_ok());
    }
}
