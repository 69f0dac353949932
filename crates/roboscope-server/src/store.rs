//! In-memory session store backing the replay server.
//!
//! Archives are the `{session, topics, messages}` JSON dumps the export
//! endpoint produces; a directory of them is the replay server's whole
//! "database". Everything is loaded up front and served read-only.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use roboscope_core::protocol::{Message, SeekRequest, Session, SessionSource, TopicSummary};

/// One full session dump: catalog entry, topic summaries, and every message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionArchive {
    pub session: Session,
    pub topics: Vec<TopicSummary>,
    pub messages: Vec<Message>,
}

/// Read-only collection of session archives.
#[derive(Debug, Default)]
pub struct SessionStore {
    archives: Vec<SessionArchive>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.json` archive in a directory. Files that fail to parse
    /// are skipped with a warning — one corrupt dump must not take the
    /// whole replay set down.
    pub fn load_dir(dir: &Path) -> io::Result<Self> {
        let mut store = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(contents) => match serde_json::from_str::<SessionArchive>(&contents) {
                    Ok(archive) => store.insert(archive),
                    Err(e) => log::warn!("skipping {}: {e}", path.display()),
                },
                Err(e) => log::warn!("skipping {}: {e}", path.display()),
            }
        }
        Ok(store)
    }

    /// Add an archive, keeping its messages sorted by timestamp so seeks
    /// can truncate deterministically.
    pub fn insert(&mut self, mut archive: SessionArchive) {
        archive
            .messages
            .sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        self.archives.push(archive);
    }

    pub fn len(&self) -> usize {
        self.archives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }

    pub fn get(&self, session_id: &str) -> Option<&SessionArchive> {
        self.archives
            .iter()
            .find(|a| a.session.session_id == session_id)
    }

    /// Catalog listing with optional source filter and limit/offset paging.
    /// Returns the page plus the total match count.
    pub fn list(
        &self,
        source: Option<SessionSource>,
        limit: usize,
        offset: usize,
    ) -> (Vec<Session>, usize) {
        let matching: Vec<&SessionArchive> = self
            .archives
            .iter()
            .filter(|a| source.is_none_or(|s| a.session.source == s))
            .collect();
        let total = matching.len();
        let page = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|a| a.session.clone())
            .collect();
        (page, total)
    }

    /// Time-range query: inclusive on both ends, optional topic filter,
    /// ascending by timestamp, truncated at the request's clamped limit.
    pub fn seek(&self, session_id: &str, req: &SeekRequest) -> Option<Vec<Message>> {
        let archive = self.get(session_id)?;
        let results = archive
            .messages
            .iter()
            .filter(|m| m.timestamp >= req.start_time && m.timestamp <= req.end_time)
            .filter(|m| match &req.topics {
                Some(topics) => topics.iter().any(|t| *t == m.topic),
                None => true,
            })
            .take(req.clamped_limit())
            .cloned()
            .collect();
        Some(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_archive;
    use roboscope_core::protocol::SessionStatus;
    use std::io::Write;

    fn store_with_demo() -> SessionStore {
        let mut store = SessionStore::new();
        store.insert(demo_archive(20.0));
        store
    }

    #[test]
    fn seek_filters_range_inclusively() {
        let store = store_with_demo();
        let id = store.archives[0].session.session_id.clone();

        let mut req = SeekRequest::new(5.0, 6.0);
        req.limit = 10_000;
        let messages = store.seek(&id, &req).unwrap();
        assert!(!messages.is_empty());
        for m in &messages {
            assert!(m.timestamp >= 5.0 && m.timestamp <= 6.0);
        }
    }

    #[test]
    fn seek_honors_topic_filter() {
        let store = store_with_demo();
        let id = store.archives[0].session.session_id.clone();

        let mut req = SeekRequest::new(0.0, 20.0);
        req.topics = Some(vec!["/gripper_state".into()]);
        let messages = store.seek(&id, &req).unwrap();
        assert!(!messages.is_empty());
        assert!(messages.iter().all(|m| m.topic == "/gripper_state"));
    }

    #[test]
    fn seek_truncates_at_limit_in_time_order() {
        let store = store_with_demo();
        let id = store.archives[0].session.session_id.clone();

        let mut req = SeekRequest::new(0.0, 20.0);
        req.limit = 7;
        let messages = store.seek(&id, &req).unwrap();
        assert_eq!(messages.len(), 7);
        for pair in messages.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn seek_unknown_session_is_none() {
        let store = store_with_demo();
        assert!(store.seek("nope", &SeekRequest::new(0.0, 1.0)).is_none());
    }

    #[test]
    fn list_pages_and_counts() {
        let mut store = SessionStore::new();
        for _ in 0..5 {
            store.insert(demo_archive(1.0));
        }
        let (page, total) = store.list(None, 2, 2);
        assert_eq!(total, 5);
        assert_eq!(page.len(), 2);

        let (live, total_live) = store.list(Some(SessionSource::Live), 100, 0);
        assert_eq!(total_live, 5, "demo sessions are live-sourced");
        assert_eq!(live.len(), 5);

        let (imported, total_imported) = store.list(Some(SessionSource::Import), 100, 0);
        assert!(imported.is_empty());
        assert_eq!(total_imported, 0);
    }

    #[test]
    fn load_dir_reads_archives_and_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();

        let archive = demo_archive(2.0);
        let good = dir.path().join("good.json");
        std::fs::write(&good, serde_json::to_string(&archive).unwrap()).unwrap();

        let mut bad = std::fs::File::create(dir.path().join("bad.json")).unwrap();
        writeln!(bad, "{{ not an archive").unwrap();

        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = SessionStore::load_dir(dir.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.archives[0].session.status,
            SessionStatus::Completed
        );
    }

    #[test]
    fn insert_sorts_messages_for_seeking() {
        let mut archive = demo_archive(3.0);
        archive.messages.reverse();
        let mut store = SessionStore::new();
        store.insert(archive);
        let messages = &store.archives[0].messages;
        for pair in messages.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }
}
