//! Typed façade over the raw key/value store.
//!
//! Every read falls back to a documented default when the stored text is
//! missing or does not parse, and every write swallows backend failures after
//! logging them. Callers never see a storage error from this type.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use electro_core::model::{
    CourseId, CourseProgress, LessonId, LessonProgress, Preferences, Progress, Theme, UserSession,
};
use storage::repository::{KeyValueStore, StorageKey};

use crate::observer::{NoopObserver, StoreObserver};

const ADMIN_FLAG: &str = "true";

pub struct LocalStore {
    store: Arc<dyn KeyValueStore>,
    observer: Arc<dyn StoreObserver>,
    // Serializes read-modify-write cycles on the merged maps.
    write_gate: Mutex<()>,
}

impl LocalStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, observer: Arc<dyn StoreObserver>) -> Self {
        Self {
            store,
            observer,
            write_gate: Mutex::new(()),
        }
    }

    /// Store without UI hooks, for tests and headless tools.
    #[must_use]
    pub fn detached(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, Arc::new(NoopObserver))
    }

    #[must_use]
    pub fn observer(&self) -> &Arc<dyn StoreObserver> {
        &self.observer
    }

    // ─── Session ───────────────────────────────────────────────────────────

    pub async fn get_session(&self) -> Option<UserSession> {
        self.read_json(StorageKey::User).await
    }

    /// Persist the session and refresh the UI with it.
    pub async fn set_session(&self, session: &UserSession) {
        self.write_json(StorageKey::User, session).await;
        self.observer.session_changed(Some(session));
    }

    /// Drop the session and ask the page to reload.
    pub async fn clear_session(&self) {
        self.remove(StorageKey::User).await;
        self.observer.reload_requested();
    }

    // ─── Theme ─────────────────────────────────────────────────────────────

    pub async fn get_theme(&self) -> Theme {
        let Some(raw) = self.read_raw(StorageKey::Theme).await else {
            return Theme::default();
        };
        raw.parse().unwrap_or_else(|err| {
            tracing::warn!(key = %StorageKey::Theme, %err, "ignoring stored theme");
            Theme::default()
        })
    }

    pub async fn set_theme(&self, theme: Theme) {
        self.write_raw(StorageKey::Theme, theme.as_str()).await;
        self.observer.theme_changed(theme);
    }

    // ─── Preferences ───────────────────────────────────────────────────────

    pub async fn preferences(&self) -> Preferences {
        self.read_json(StorageKey::Preferences)
            .await
            .unwrap_or_default()
    }

    /// Value stored under `key`, or `default` when the key was never set.
    pub async fn get_preference(&self, key: &str, default: Value) -> Value {
        self.preferences()
            .await
            .get(key)
            .cloned()
            .unwrap_or(default)
    }

    /// Like `get_preference`, but decoded into `T`. A value that does not
    /// decode counts as absent.
    pub async fn get_preference_as<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(value) = self.preferences().await.get(key).cloned() else {
            return default;
        };
        serde_json::from_value(value).unwrap_or_else(|err| {
            tracing::warn!(key, %err, "preference has unexpected shape");
            default
        })
    }

    pub async fn set_preference(&self, key: &str, value: Value) {
        let _guard = self.write_gate.lock().await;
        let mut prefs = self.preferences().await;
        prefs.set(key, value);
        self.write_json(StorageKey::Preferences, &prefs).await;
    }

    // ─── Course progress ───────────────────────────────────────────────────

    pub async fn course_progress(&self) -> CourseProgress {
        self.read_json(StorageKey::CourseProgress)
            .await
            .unwrap_or_default()
    }

    /// Progress for one lesson, `0.0` when never recorded.
    pub async fn get_progress(&self, course: &CourseId, lesson: &LessonId) -> f64 {
        self.course_progress().await.lesson(course, lesson)
    }

    /// Every recorded lesson of `course`, empty when none.
    pub async fn get_course_progress(&self, course: &CourseId) -> LessonProgress {
        self.course_progress()
            .await
            .course(course)
            .cloned()
            .unwrap_or_default()
    }

    /// One lesson when `lesson` is given, otherwise the whole course.
    pub async fn progress(&self, course: &CourseId, lesson: Option<&LessonId>) -> Progress {
        Progress::lookup(&self.course_progress().await, course, lesson)
    }

    /// Non-finite values are dropped: JSON has no encoding for them.
    pub async fn set_progress(&self, course: &CourseId, lesson: &LessonId, value: f64) {
        if !value.is_finite() {
            tracing::warn!(%course, %lesson, value, "ignoring non-finite progress");
            return;
        }
        let _guard = self.write_gate.lock().await;
        let mut all = self.course_progress().await;
        all.record(course.clone(), lesson.clone(), value);
        self.write_json(StorageKey::CourseProgress, &all).await;
    }

    // ─── Admin flag ────────────────────────────────────────────────────────

    pub async fn is_admin(&self) -> bool {
        self.read_raw(StorageKey::Admin).await.as_deref() == Some(ADMIN_FLAG)
    }

    pub async fn set_admin(&self, admin: bool) {
        if admin {
            self.write_raw(StorageKey::Admin, ADMIN_FLAG).await;
        } else {
            self.remove(StorageKey::Admin).await;
        }
    }

    // ─── Raw access ────────────────────────────────────────────────────────

    async fn read_raw(&self, key: StorageKey) -> Option<String> {
        match self.store.get_item(key.as_str()).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%key, %err, "local storage read failed");
                None
            }
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        let raw = self.read_raw(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(%key, %err, "ignoring malformed stored value");
                None
            }
        }
    }

    async fn write_raw(&self, key: StorageKey, value: &str) {
        match self.store.set_item(key.as_str(), value).await {
            Ok(()) => tracing::debug!(%key, "local storage updated"),
            Err(err) => tracing::warn!(%key, %err, "local storage write dropped"),
        }
    }

    async fn write_json<T: Serialize>(&self, key: StorageKey, value: &T) {
        match serde_json::to_string(value) {
            Ok(text) => self.write_raw(key, &text).await,
            Err(err) => tracing::warn!(%key, %err, "value could not be serialized"),
        }
    }

    async fn remove(&self, key: StorageKey) {
        if let Err(err) = self.store.remove_item(key.as_str()).await {
            tracing::warn!(%key, %err, "local storage remove failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storage::repository::InMemoryStore;

    fn store_with(items: &[(&str, &str)]) -> LocalStore {
        LocalStore::detached(Arc::new(InMemoryStore::with_items(
            items.iter().map(|(k, v)| (*k, *v)),
        )))
    }

    #[tokio::test]
    async fn session_is_absent_when_empty_or_corrupt() {
        assert_eq!(store_with(&[]).get_session().await, None);
        assert_eq!(
            store_with(&[("electrolearn_user", "{not json")])
                .get_session()
                .await,
            None
        );
        assert_eq!(
            store_with(&[("electrolearn_user", "null")]).get_session().await,
            None
        );
    }

    #[tokio::test]
    async fn session_round_trips() {
        let store = store_with(&[]);
        let session = UserSession::new("Ada", "ada@example.fr")
            .unwrap()
            .with_field("avatar", json!("ada.png"));
        store.set_session(&session).await;
        assert_eq!(store.get_session().await, Some(session));

        store.clear_session().await;
        assert_eq!(store.get_session().await, None);
    }

    #[tokio::test]
    async fn theme_defaults_to_light() {
        let store = store_with(&[]);
        assert_eq!(store.get_theme().await, Theme::Light);
        store.set_theme(Theme::Dark).await;
        assert_eq!(store.get_theme().await, Theme::Dark);

        let corrupt = store_with(&[("electrolearn_theme", "purple")]);
        assert_eq!(corrupt.get_theme().await, Theme::Light);
    }

    #[tokio::test]
    async fn theme_is_stored_as_bare_string() {
        let backing = Arc::new(InMemoryStore::new());
        let store = LocalStore::detached(backing.clone());
        store.set_theme(Theme::Dark).await;
        assert_eq!(
            backing.get_item("electrolearn_theme").await.unwrap().as_deref(),
            Some("dark")
        );
    }

    #[tokio::test]
    async fn preferences_merge_and_default() {
        let store = store_with(&[]);
        assert_eq!(store.get_preference("lang", json!("fr")).await, json!("fr"));

        store.set_preference("lang", json!("en")).await;
        store.set_preference("volume", json!(0.5)).await;
        assert_eq!(store.get_preference("lang", json!("fr")).await, json!("en"));
        assert_eq!(store.get_preference("volume", json!(1)).await, json!(0.5));
        assert_eq!(store.get_preference_as::<f64>("volume", 1.0).await, 0.5);
        assert_eq!(store.get_preference_as::<u8>("lang", 7).await, 7);
    }

    #[tokio::test]
    async fn falsy_preference_values_are_returned() {
        let store = store_with(&[]);
        store.set_preference("autoplay", json!(false)).await;
        assert_eq!(
            store.get_preference("autoplay", json!(true)).await,
            json!(false)
        );
    }

    #[tokio::test]
    async fn corrupt_preferences_are_replaced_on_write() {
        let store = store_with(&[("electrolearn_preferences", "[1,2,3]")]);
        assert_eq!(store.get_preference("k", Value::Null).await, Value::Null);
        store.set_preference("k", json!(1)).await;
        assert_eq!(store.get_preference("k", Value::Null).await, json!(1));
    }

    #[tokio::test]
    async fn progress_defaults_and_merges() {
        let store = store_with(&[]);
        let c1 = CourseId::new("c1");
        let (l1, l2) = (LessonId::new("l1"), LessonId::new("l2"));

        assert_eq!(store.get_progress(&c1, &l1).await, 0.0);
        assert!(store.get_course_progress(&c1).await.is_empty());

        store.set_progress(&c1, &l1, 50.0).await;
        store.set_progress(&c1, &l2, 10.0).await;

        let expected: LessonProgress = [(l1.clone(), 50.0), (l2.clone(), 10.0)]
            .into_iter()
            .collect();
        assert_eq!(store.get_course_progress(&c1).await, expected);
        assert_eq!(
            store.progress(&c1, Some(&l2)).await,
            Progress::Lesson(10.0)
        );
        assert_eq!(
            store.progress(&CourseId::new("c2"), None).await,
            Progress::Course(LessonProgress::new())
        );
    }

    #[tokio::test]
    async fn non_finite_progress_is_not_written() {
        let backing = Arc::new(InMemoryStore::new());
        let store = LocalStore::detached(backing.clone());
        let (c1, c2, c3) = (CourseId::new("c1"), CourseId::new("c2"), CourseId::new("c3"));
        let l1 = LessonId::new("l1");

        store.set_progress(&c1, &l1, 50.0).await;
        store.set_progress(&c2, &l1, f64::NAN).await;
        store.set_progress(&c2, &l1, f64::INFINITY).await;
        store.set_progress(&c3, &l1, 10.0).await;

        assert_eq!(store.get_progress(&c1, &l1).await, 50.0);
        assert_eq!(store.get_progress(&c3, &l1).await, 10.0);
        assert!(store.get_course_progress(&c2).await.is_empty());
        let raw = backing
            .get_item("electrolearn_course_progress")
            .await
            .unwrap()
            .unwrap();
        assert!(!raw.contains("null"));
    }

    #[tokio::test]
    async fn null_lesson_from_page_does_not_wipe_other_courses() {
        let store = store_with(&[(
            "electrolearn_course_progress",
            r#"{"c1":{"l1":50},"c2":{"l1":null}}"#,
        )]);
        let (c1, c3) = (CourseId::new("c1"), CourseId::new("c3"));
        let l1 = LessonId::new("l1");

        assert_eq!(store.get_progress(&c1, &l1).await, 50.0);
        store.set_progress(&c3, &l1, 10.0).await;
        assert_eq!(store.get_progress(&c1, &l1).await, 50.0);
        assert_eq!(store.get_progress(&c3, &l1).await, 10.0);
    }

    #[tokio::test]
    async fn admin_flag_requires_exact_text() {
        let store = store_with(&[("electrolearn_admin", "yes")]);
        assert!(!store.is_admin().await);
        store.set_admin(true).await;
        assert!(store.is_admin().await);
        store.set_admin(false).await;
        assert!(!store.is_admin().await);
    }
}
