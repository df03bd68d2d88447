use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Startup, StartupStatus};
use crate::store::Store;

use super::{limit_patch, limit_text, require_text};

#[derive(Debug, Clone, Deserialize)]
pub struct NewStartup {
    pub name: String,
    pub site: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default)]
    pub status: StartupStatus,
    pub sector: String,
    pub investment_date: NaiveDate,
    pub notes: Option<String>,
}

impl NewStartup {
    fn validate(&self) -> AppResult<()> {
        require_text("name", &self.name, 255)?;
        require_text("sector", &self.sector, 255)?;
        limit_text("site", self.site.as_deref(), 512)?;
        limit_text("logo_url", self.logo_url.as_deref(), 512)
    }
}

/// Partial update; nullable fields distinguish "absent" from explicit `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartupPatch {
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub site: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub logo_url: Option<Option<String>>,
    pub status: Option<StartupStatus>,
    pub sector: Option<String>,
    pub investment_date: Option<NaiveDate>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,
}

impl StartupPatch {
    fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            require_text("name", name, 255)?;
        }
        if let Some(sector) = &self.sector {
            require_text("sector", sector, 255)?;
        }
        limit_patch("site", &self.site, 512)?;
        limit_patch("logo_url", &self.logo_url, 512)
    }

    fn apply(self, startup: &mut Startup) {
        if let Some(name) = self.name {
            startup.name = name;
        }
        if let Some(site) = self.site {
            startup.site = site;
        }
        if let Some(logo_url) = self.logo_url {
            startup.logo_url = logo_url;
        }
        if let Some(status) = self.status {
            startup.status = status;
        }
        if let Some(sector) = self.sector {
            startup.sector = sector;
        }
        if let Some(investment_date) = self.investment_date {
            startup.investment_date = investment_date;
        }
        if let Some(notes) = self.notes {
            startup.notes = notes;
        }
    }
}

/// Admin listing, most recently registered first.
pub async fn list(store: &dyn Store) -> AppResult<Vec<Startup>> {
    let mut startups = store.list_startups().await?;
    startups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(startups)
}

pub async fn get(store: &dyn Store, id: Uuid) -> AppResult<Startup> {
    store
        .startup(id)
        .await?
        .ok_or_else(|| AppError::not_found("startup", id))
}

/// Fails with NotFound unless the startup exists; used to guard nested routes.
pub async fn ensure_exists(store: &dyn Store, id: Uuid) -> AppResult<()> {
    get(store, id).await.map(|_| ())
}

pub async fn create(store: &dyn Store, input: NewStartup) -> AppResult<Startup> {
    input.validate()?;
    let now = Utc::now();
    let startup = Startup {
        id: Uuid::new_v4(),
        name: input.name,
        site: input.site,
        logo_url: input.logo_url,
        status: input.status,
        sector: input.sector,
        investment_date: input.investment_date,
        notes: input.notes,
        created_at: now,
        updated_at: now,
    };
    store.insert_startup(&startup).await?;
    info!(startup_id = %startup.id, name = %startup.name, "startup created");
    Ok(startup)
}

pub async fn update(store: &dyn Store, id: Uuid, patch: StartupPatch) -> AppResult<Startup> {
    patch.validate()?;
    let mut startup = get(store, id).await?;
    patch.apply(&mut startup);
    startup.updated_at = Utc::now();
    store.update_startup(&startup).await?;
    Ok(startup)
}

pub async fn delete(store: &dyn Store, id: Uuid) -> AppResult<()> {
    if !store.delete_startup(id).await? {
        return Err(AppError::not_found("startup", id));
    }
    info!(startup_id = %id, "startup deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StartupStore};
    use crate::testing::startup;
    use chrono::Duration;

    fn acme() -> NewStartup {
        NewStartup {
            name: "Acme".into(),
            site: Some("https://acme.example".into()),
            logo_url: None,
            status: StartupStatus::Healthy,
            sector: "Logistics".into(),
            investment_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            notes: Some("seed round".into()),
        }
    }

    #[tokio::test]
    async fn create_then_patch_keeps_unset_fields() {
        let store = MemoryStore::new();
        let created = create(&store, acme()).await.unwrap();

        let patch: StartupPatch =
            serde_json::from_str(r#"{"status": "critical", "notes": null}"#).unwrap();
        let updated = update(&store, created.id, patch).await.unwrap();

        assert_eq!(updated.status, StartupStatus::Critical);
        assert_eq!(updated.notes, None);
        assert_eq!(updated.site.as_deref(), Some("https://acme.example"));
        assert_eq!(get(&store, created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let store = MemoryStore::new();
        let input = NewStartup {
            name: String::new(),
            ..acme()
        };
        assert!(matches!(
            create(&store, input).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn missing_startup_is_not_found() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(get(&store, id).await, Err(AppError::NotFound(_))));
        assert!(matches!(delete(&store, id).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            update(&store, id, StartupPatch::default()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_puts_newest_first() {
        let store = MemoryStore::new();
        let mut older = startup("Alpha", StartupStatus::Healthy);
        older.created_at = Utc::now() - Duration::days(30);
        let newer = startup("Zeta", StartupStatus::Healthy);
        store.insert_startup(&older).await.unwrap();
        store.insert_startup(&newer).await.unwrap();

        let names: Vec<String> = list(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["Zeta", "Alpha"]);
    }
}
