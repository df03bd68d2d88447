use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Deal, DealColumn};
use crate::store::Store;

use super::{limit_patch, limit_text, require_text};

#[derive(Debug, Clone, Deserialize)]
pub struct NewDeal {
    pub company: String,
    pub sector: Option<String>,
    pub stage: Option<String>,
    pub founders: Option<String>,
    #[serde(default)]
    pub column: DealColumn,
    pub notes: Option<String>,
    pub next_step: Option<String>,
    pub internal_owner: Option<String>,
}

impl NewDeal {
    fn validate(&self) -> AppResult<()> {
        require_text("company", &self.company, 255)?;
        limit_text("sector", self.sector.as_deref(), 255)?;
        limit_text("stage", self.stage.as_deref(), 100)?;
        limit_text("internal_owner", self.internal_owner.as_deref(), 255)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealPatch {
    pub company: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub sector: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub stage: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub founders: Option<Option<String>>,
    pub column: Option<DealColumn>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub next_step: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub internal_owner: Option<Option<String>>,
}

impl DealPatch {
    fn validate(&self) -> AppResult<()> {
        if let Some(company) = &self.company {
            require_text("company", company, 255)?;
        }
        limit_patch("sector", &self.sector, 255)?;
        limit_patch("stage", &self.stage, 100)?;
        limit_patch("internal_owner", &self.internal_owner, 255)
    }

    fn apply(self, deal: &mut Deal) {
        if let Some(company) = self.company {
            deal.company = company;
        }
        if let Some(sector) = self.sector {
            deal.sector = sector;
        }
        if let Some(stage) = self.stage {
            deal.stage = stage;
        }
        if let Some(founders) = self.founders {
            deal.founders = founders;
        }
        if let Some(column) = self.column {
            deal.column = column;
        }
        if let Some(notes) = self.notes {
            deal.notes = notes;
        }
        if let Some(next_step) = self.next_step {
            deal.next_step = next_step;
        }
        if let Some(owner) = self.internal_owner {
            deal.internal_owner = owner;
        }
    }
}

/// Target slot of a Kanban drag.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DealMove {
    pub column: DealColumn,
    #[serde(default)]
    pub position: i32,
}

pub async fn list(store: &dyn Store) -> AppResult<Vec<Deal>> {
    Ok(store.list_deals().await?)
}

pub async fn get(store: &dyn Store, id: Uuid) -> AppResult<Deal> {
    store
        .deal(id)
        .await?
        .ok_or_else(|| AppError::not_found("deal", id))
}

pub async fn create(store: &dyn Store, input: NewDeal) -> AppResult<Deal> {
    input.validate()?;
    let now = Utc::now();
    let deal = Deal {
        id: Uuid::new_v4(),
        company: input.company,
        sector: input.sector,
        stage: input.stage,
        founders: input.founders,
        column: input.column,
        notes: input.notes,
        next_step: input.next_step,
        internal_owner: input.internal_owner,
        position: 0,
        created_at: now,
        updated_at: now,
    };
    store.insert_deal(&deal).await?;
    Ok(deal)
}

pub async fn update(store: &dyn Store, id: Uuid, patch: DealPatch) -> AppResult<Deal> {
    patch.validate()?;
    let mut deal = get(store, id).await?;
    patch.apply(&mut deal);
    deal.updated_at = Utc::now();
    store.update_deal(&deal).await?;
    Ok(deal)
}

pub async fn move_to(store: &dyn Store, id: Uuid, target: DealMove) -> AppResult<Deal> {
    let mut deal = get(store, id).await?;
    let from = deal.column;
    deal.column = target.column;
    deal.position = target.position;
    deal.updated_at = Utc::now();
    store.update_deal(&deal).await?;
    info!(
        deal_id = %id,
        from = from.as_str(),
        to = deal.column.as_str(),
        position = deal.position,
        "deal moved"
    );
    Ok(deal)
}

pub async fn delete(store: &dyn Store, id: Uuid) -> AppResult<()> {
    if !store.delete_deal(id).await? {
        return Err(AppError::not_found("deal", id));
    }
    Ok(())
}
