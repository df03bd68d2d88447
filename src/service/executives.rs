use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Executive;
use crate::store::Store;

use super::{limit_patch, limit_text, require_text, startups};

#[derive(Debug, Clone, Deserialize)]
pub struct NewExecutive {
    pub name: String,
    pub role: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
}

impl NewExecutive {
    fn validate(&self) -> AppResult<()> {
        require_text("name", &self.name, 255)?;
        limit_text("role", self.role.as_deref(), 255)?;
        limit_text("email", self.email.as_deref(), 255)?;
        limit_text("phone", self.phone.as_deref(), 50)?;
        limit_text("linkedin", self.linkedin.as_deref(), 512)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutivePatch {
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub role: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub linkedin: Option<Option<String>>,
}

impl ExecutivePatch {
    fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            require_text("name", name, 255)?;
        }
        limit_patch("role", &self.role, 255)?;
        limit_patch("email", &self.email, 255)?;
        limit_patch("phone", &self.phone, 50)?;
        limit_patch("linkedin", &self.linkedin, 512)
    }

    fn apply(self, executive: &mut Executive) {
        if let Some(name) = self.name {
            executive.name = name;
        }
        if let Some(role) = self.role {
            executive.role = role;
        }
        if let Some(email) = self.email {
            executive.email = email;
        }
        if let Some(phone) = self.phone {
            executive.phone = phone;
        }
        if let Some(linkedin) = self.linkedin {
            executive.linkedin = linkedin;
        }
    }
}

pub async fn list(store: &dyn Store, startup_id: Uuid) -> AppResult<Vec<Executive>> {
    startups::ensure_exists(store, startup_id).await?;
    Ok(store.executives_for_startup(startup_id).await?)
}

pub async fn get(store: &dyn Store, startup_id: Uuid, id: Uuid) -> AppResult<Executive> {
    startups::ensure_exists(store, startup_id).await?;
    store
        .executive(id)
        .await?
        .filter(|executive| executive.startup_id == startup_id)
        .ok_or_else(|| AppError::not_found("executive", id))
}

pub async fn create(
    store: &dyn Store,
    startup_id: Uuid,
    input: NewExecutive,
) -> AppResult<Executive> {
    input.validate()?;
    startups::ensure_exists(store, startup_id).await?;
    let now = Utc::now();
    let executive = Executive {
        id: Uuid::new_v4(),
        startup_id,
        name: input.name,
        role: input.role,
        email: input.email,
        phone: input.phone,
        linkedin: input.linkedin,
        created_at: now,
        updated_at: now,
    };
    store.insert_executive(&executive).await?;
    Ok(executive)
}

pub async fn update(
    store: &dyn Store,
    startup_id: Uuid,
    id: Uuid,
    patch: ExecutivePatch,
) -> AppResult<Executive> {
    patch.validate()?;
    let mut executive = get(store, startup_id, id).await?;
    patch.apply(&mut executive);
    executive.updated_at = Utc::now();
    store.update_executive(&executive).await?;
    Ok(executive)
}

pub async fn delete(store: &dyn Store, startup_id: Uuid, id: Uuid) -> AppResult<()> {
    let executive = get(store, startup_id, id).await?;
    store.delete_executive(executive.id).await?;
    Ok(())
}
