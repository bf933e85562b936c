use std::sync::Arc;

use electro_core::model::{AdminCredentials, CourseId, LessonId, SiteConfigDraft, Theme};
use electro_core::time::fixed_now;
use services::{AppServices, Clock, NoopObserver};
use storage::repository::Storage;

fn config() -> electro_core::model::SiteConfig {
    SiteConfigDraft::new().validate().unwrap()
}

#[tokio::test]
async fn sqlite_backed_services_persist_across_instances() {
    let url = "sqlite:file:memdb_app_flow?mode=memory&cache=shared";
    let storage = Storage::sqlite(url).await.expect("storage");

    let first = AppServices::new(
        &storage,
        Clock::fixed(fixed_now()),
        config(),
        Arc::new(NoopObserver),
    );
    first.initialize().await;
    first.auth().login("Ada", "ada@example.fr").await.unwrap();
    first.theme().toggle_theme().await;
    first
        .store()
        .set_progress(&CourseId::new("arduino"), &LessonId::new("intro"), 100.0)
        .await;

    let second = AppServices::new(
        &storage,
        Clock::fixed(fixed_now()),
        config(),
        Arc::new(NoopObserver),
    );
    assert_eq!(
        second.auth().current_user().await.unwrap().email(),
        "ada@example.fr"
    );
    assert_eq!(second.store().get_theme().await, Theme::Dark);
    assert_eq!(
        second
            .store()
            .get_progress(&CourseId::new("arduino"), &LessonId::new("intro"))
            .await,
        100.0
    );
}

#[tokio::test]
async fn admin_login_uses_configured_credentials() {
    let cfg = SiteConfigDraft {
        admin_email: Some("ops@electrolearn.fr".into()),
        admin_password: Some("s3cret".into()),
        ..SiteConfigDraft::default()
    }
    .validate()
    .unwrap();
    let services = AppServices::new(
        &Storage::in_memory(),
        Clock::fixed(fixed_now()),
        cfg,
        Arc::new(NoopObserver),
    );

    let default_pair = AdminCredentials::new("admin@electrolearn.fr", "admin123");
    assert!(services.auth().admin_login(&default_pair).await.is_err());

    let configured = AdminCredentials::new("ops@electrolearn.fr", "s3cret");
    services.auth().admin_login(&configured).await.unwrap();
    assert!(services.auth().is_admin().await);
}

#[tokio::test]
async fn toggle_theme_raises_info_toast() {
    let services = AppServices::new(
        &Storage::in_memory(),
        Clock::fixed(fixed_now()),
        config(),
        Arc::new(NoopObserver),
    );
    services.theme().toggle_theme().await;
    let toast = services.notifications().current().unwrap();
    assert_eq!(toast.message(), "Thème sombre activé");
    assert_eq!(toast.kind().color(), "#4299E1");
}
