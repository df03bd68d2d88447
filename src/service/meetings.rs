use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::BoardMeeting;
use crate::store::Store;

use super::startups;

#[derive(Debug, Clone, Deserialize)]
pub struct NewMeeting {
    pub meeting_date: NaiveDate,
    pub participants: Option<String>,
    pub summary: Option<String>,
    pub attention_points: Option<String>,
    pub next_steps: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeetingPatch {
    pub meeting_date: Option<NaiveDate>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub participants: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub summary: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub attention_points: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub next_steps: Option<Option<String>>,
}

impl MeetingPatch {
    fn apply(self, meeting: &mut BoardMeeting) {
        if let Some(date) = self.meeting_date {
            meeting.meeting_date = date;
        }
        if let Some(value) = self.participants {
            meeting.participants = value;
        }
        if let Some(value) = self.summary {
            meeting.summary = value;
        }
        if let Some(value) = self.attention_points {
            meeting.attention_points = value;
        }
        if let Some(value) = self.next_steps {
            meeting.next_steps = value;
        }
    }
}

pub async fn list(store: &dyn Store, startup_id: Uuid) -> AppResult<Vec<BoardMeeting>> {
    startups::ensure_exists(store, startup_id).await?;
    Ok(store.meetings_for_startup(startup_id).await?)
}

pub async fn get(store: &dyn Store, startup_id: Uuid, id: Uuid) -> AppResult<BoardMeeting> {
    startups::ensure_exists(store, startup_id).await?;
    store
        .meeting(id)
        .await?
        .filter(|meeting| meeting.startup_id == startup_id)
        .ok_or_else(|| AppError::not_found("board meeting", id))
}

pub async fn create(
    store: &dyn Store,
    startup_id: Uuid,
    input: NewMeeting,
) -> AppResult<BoardMeeting> {
    startups::ensure_exists(store, startup_id).await?;
    let now = Utc::now();
    let meeting = BoardMeeting {
        id: Uuid::new_v4(),
        startup_id,
        meeting_date: input.meeting_date,
        participants: input.participants,
        summary: input.summary,
        attention_points: input.attention_points,
        next_steps: input.next_steps,
        created_at: now,
        updated_at: now,
    };
    store.insert_meeting(&meeting).await?;
    Ok(meeting)
}

pub async fn update(
    store: &dyn Store,
    startup_id: Uuid,
    id: Uuid,
    patch: MeetingPatch,
) -> AppResult<BoardMeeting> {
    let mut meeting = get(store, startup_id, id).await?;
    patch.apply(&mut meeting);
    meeting.updated_at = Utc::now();
    store.update_meeting(&meeting).await?;
    Ok(meeting)
}

pub async fn delete(store: &dyn Store, startup_id: Uuid, id: Uuid) -> AppResult<()> {
    let meeting = get(store, startup_id, id).await?;
    store.delete_meeting(meeting.id).await?;
    Ok(())
}
