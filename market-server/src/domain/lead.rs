use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

pub const DEFAULT_UTM_SOURCE: &str = "site_vendas";
pub const DEFAULT_UTM_MEDIUM: &str = "whatsapp_cta";
pub const DEFAULT_UTM_CAMPAIGN: &str = "default";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub client_name: Option<String>,
    pub referrer: Option<String>,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub ip_hashed: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied part of a lead.
#[derive(Debug, Clone, Default)]
pub struct NewLead {
    pub vehicle_id: Uuid,
    pub client_name: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
}

/// What the storefront gets back after a contact click.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSummary {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub vehicle_title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub vehicle_id: Option<Uuid>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadVehicle {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub year: i32,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadWithVehicle {
    #[serde(flatten)]
    pub lead: Lead,
    pub vehicle: LeadVehicle,
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleRef {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopVehicle {
    pub vehicle: VehicleRef,
    pub lead_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceCount {
    pub source: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub total_leads: i64,
    pub leads_last_30_days: i64,
    pub top_vehicles: Vec<TopVehicle>,
    pub leads_by_source: Vec<SourceCount>,
}
