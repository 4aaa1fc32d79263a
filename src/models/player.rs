//! Player profile models

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Player profile from players
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub default_tension_mains: Option<i32>,
    pub default_tension_crosses: Option<i32>,
    pub preferred_string_product_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
