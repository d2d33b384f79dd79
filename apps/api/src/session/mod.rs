//! Per-user session state.
//!
//! A session owns the uploaded resume and the user's API key. Nothing is
//! persisted: ending a session (or letting it idle past the TTL) drops both.
//! Pipeline runs on one session are serialised through `begin_run`.

pub mod handlers;

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::extraction::Document;
use crate::llm_client::ApiKey;

/// Snapshot of what a pipeline run needs. Both parts are optional until the
/// user supplies them.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub document: Option<Document>,
    pub api_key: Option<ApiKey>,
}

#[derive(Debug)]
pub struct SessionHandle {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    context: Mutex<SessionContext>,
    run_guard: Mutex<()>,
    last_seen_ms: AtomicI64,
}

impl SessionHandle {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            context: Mutex::new(SessionContext::default()),
            run_guard: Mutex::new(()),
            last_seen_ms: AtomicI64::new(now.timestamp_millis()),
        }
    }

    /// Replaces any previously uploaded document.
    pub async fn set_document(&self, document: Document) {
        self.context.lock().await.document = Some(document);
    }

    /// Replaces any previously supplied key.
    pub async fn set_api_key(&self, api_key: ApiKey) {
        self.context.lock().await.api_key = Some(api_key);
    }

    pub async fn context(&self) -> SessionContext {
        self.context.lock().await.clone()
    }

    /// Held for the duration of one pipeline run.
    pub async fn begin_run(&self) -> MutexGuard<'_, ()> {
        self.run_guard.lock().await
    }

    fn touch(&self, now: DateTime<Utc>) {
        self.last_seen_ms.store(now.timestamp_millis(), Ordering::Relaxed);
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>, idle_ttl_secs: i64) -> bool {
        if idle_ttl_secs <= 0 {
            return false;
        }
        let idle_ms = now.timestamp_millis() - self.last_seen_ms.load(Ordering::Relaxed);
        idle_ms > idle_ttl_secs.saturating_mul(1000)
    }
}

/// In-memory session registry. Cloning shares the same map.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<SessionHandle>>>>,
    /// Non-positive disables expiry.
    idle_ttl_secs: i64,
}

impl SessionStore {
    pub fn new(idle_ttl_secs: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl_secs,
        }
    }

    pub async fn create(&self) -> Arc<SessionHandle> {
        self.create_at(Utc::now()).await
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<SessionHandle>> {
        self.get_at(id, Utc::now()).await
    }

    /// Returns `true` if a live session was removed. An expired entry is
    /// dropped too but reported as absent.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.remove_at(id, Utc::now()).await
    }

    /// Sessions that have not idled past the TTL.
    pub async fn active_count(&self) -> usize {
        self.active_count_at(Utc::now()).await
    }

    async fn create_at(&self, now: DateTime<Utc>) -> Arc<SessionHandle> {
        let handle = Arc::new(SessionHandle::new(now));
        let mut sessions = self.sessions.write().await;
        // Expired sessions are purged lazily, here.
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now, self.idle_ttl_secs));
        if sessions.len() < before {
            debug!(purged = before - sessions.len(), "Purged idle sessions");
        }
        sessions.insert(handle.id, Arc::clone(&handle));
        handle
    }

    async fn remove_at(&self, id: Uuid, now: DateTime<Utc>) -> bool {
        match self.sessions.write().await.remove(&id) {
            Some(handle) => !handle.is_expired_at(now, self.idle_ttl_secs),
            None => false,
        }
    }

    async fn active_count_at(&self, now: DateTime<Utc>) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| !s.is_expired_at(now, self.idle_ttl_secs))
            .count()
    }

    async fn get_at(&self, id: Uuid, now: DateTime<Utc>) -> Option<Arc<SessionHandle>> {
        let handle = self.sessions.read().await.get(&id).cloned()?;
        if handle.is_expired_at(now, self.idle_ttl_secs) {
            return None;
        }
        handle.touch(now);
        Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_document, sample_key};
    use chrono::Duration;

    #[tokio::test]
    async fn test_new_session_is_empty() {
        let store = SessionStore::new(3600);
        let session = store.create().await;
        let ctx = session.context().await;
        assert!(ctx.document.is_none());
        assert!(ctx.api_key.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new(3600);
        let a = store.create().await;
        let b = store.create().await;
        assert_ne!(a.id, b.id);

        a.set_document(sample_document()).await;
        a.set_api_key(sample_key()).await;

        let b_ctx = store.get(b.id).await.unwrap().context().await;
        assert!(b_ctx.document.is_none());
        assert!(b_ctx.api_key.is_none());
    }

    #[tokio::test]
    async fn test_context_snapshot_sees_latest_values() {
        let store = SessionStore::new(3600);
        let session = store.create().await;
        session.set_document(sample_document()).await;
        session
            .set_document(Document::new("second.pdf", bytes::Bytes::from_static(b"%PDF-1.7")))
            .await;

        let ctx = session.context().await;
        assert_eq!(ctx.document.unwrap().filename, "second.pdf");
    }

    #[tokio::test]
    async fn test_remove_drops_session() {
        let store = SessionStore::new(3600);
        let session = store.create().await;
        assert!(store.remove(session.id).await);
        assert!(store.get(session.id).await.is_none());
        assert!(!store.remove(session.id).await);
    }

    #[tokio::test]
    async fn test_idle_session_expires() {
        let store = SessionStore::new(60);
        let now = Utc::now();
        let session = store.create_at(now).await;

        assert!(store.get_at(session.id, now + Duration::seconds(30)).await.is_some());
        // Access at +30s reset the idle clock.
        assert!(store.get_at(session.id, now + Duration::seconds(80)).await.is_some());
        assert!(store.get_at(session.id, now + Duration::seconds(200)).await.is_none());
    }

    #[tokio::test]
    async fn test_create_purges_expired_sessions() {
        let store = SessionStore::new(60);
        let now = Utc::now();
        store.create_at(now).await;
        store.create_at(now).await;
        assert_eq!(store.sessions.read().await.len(), 2);

        store.create_at(now + Duration::seconds(120)).await;
        assert_eq!(store.sessions.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_removing_expired_session_reports_absent() {
        let store = SessionStore::new(60);
        let now = Utc::now();
        let session = store.create_at(now).await;

        assert!(!store.remove_at(session.id, now + Duration::seconds(120)).await);
        assert!(store.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_removing_live_session_reports_present() {
        let store = SessionStore::new(60);
        let now = Utc::now();
        let session = store.create_at(now).await;
        assert!(store.remove_at(session.id, now + Duration::seconds(30)).await);
    }

    #[tokio::test]
    async fn test_active_count_skips_expired_sessions() {
        let store = SessionStore::new(60);
        let now = Utc::now();
        store.create_at(now).await;
        store.create_at(now + Duration::seconds(50)).await;

        assert_eq!(store.active_count_at(now + Duration::seconds(55)).await, 2);
        // First session idle for 100s, second for 50s.
        assert_eq!(store.active_count_at(now + Duration::seconds(100)).await, 1);
    }

    #[tokio::test]
    async fn test_non_positive_ttl_never_expires() {
        let store = SessionStore::new(0);
        let now = Utc::now();
        let session = store.create_at(now).await;
        assert!(store.get_at(session.id, now + Duration::days(30)).await.is_some());
    }

    #[tokio::test]
    async fn test_runs_are_serialised() {
        let store = SessionStore::new(3600);
        let session = store.create().await;
        let guard = session.begin_run().await;
        assert!(session.run_guard.try_lock().is_err());
        drop(guard);
        assert!(session.run_guard.try_lock().is_ok());
    }
}
