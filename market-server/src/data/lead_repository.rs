use crate::domain::error::DomainError;
use crate::domain::lead::{
    Lead, LeadFilter, LeadStats, LeadVehicle, LeadWithVehicle, SourceCount, TopVehicle,
    VehicleRef,
};
use crate::domain::pagination::{PageRequest, Paginated};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn create(&self, lead: &Lead) -> Result<(), DomainError>;
    async fn list_for_owner(
        &self,
        owner: Uuid,
        filter: &LeadFilter,
        page: PageRequest,
    ) -> Result<Paginated<LeadWithVehicle>, DomainError>;
    async fn stats_for_owner(
        &self,
        owner: Uuid,
        since: DateTime<Utc>,
    ) -> Result<LeadStats, DomainError>;
}

#[derive(Clone)]
pub struct PostgresLeadRepository {
    pool: PgPool,
}

impl PostgresLeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LeadRow {
    #[sqlx(flatten)]
    lead: Lead,
    vehicle_title: String,
    vehicle_slug: String,
    vehicle_price: rust_decimal::Decimal,
    vehicle_year: i32,
    vehicle_color: String,
}

impl From<LeadRow> for LeadWithVehicle {
    fn from(row: LeadRow) -> Self {
        let vehicle = LeadVehicle {
            id: row.lead.vehicle_id,
            title: row.vehicle_title,
            slug: row.vehicle_slug,
            price: row.vehicle_price,
            year: row.vehicle_year,
            color: row.vehicle_color,
        };
        Self {
            lead: row.lead,
            vehicle,
        }
    }
}

fn push_owner_conditions(
    qb: &mut QueryBuilder<'static, Postgres>,
    owner: Uuid,
    filter: &LeadFilter,
) {
    qb.push(" WHERE v.user_id = ").push_bind(owner);
    if let Some(vehicle_id) = filter.vehicle_id {
        qb.push(" AND l.vehicle_id = ").push_bind(vehicle_id);
    }
    if let Some(start) = filter.start {
        qb.push(" AND l.created_at >= ").push_bind(start);
    }
    if let Some(end) = filter.end {
        qb.push(" AND l.created_at <= ").push_bind(end);
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("{}: {}", context, e);
    DomainError::Internal(format!("database error: {}", e))
}

#[async_trait]
impl LeadRepository for PostgresLeadRepository {
    async fn create(&self, lead: &Lead) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO leads (id, vehicle_id, client_name, referrer, utm_source, utm_medium,
                               utm_campaign, ip_hashed, user_agent, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(lead.id)
        .bind(lead.vehicle_id)
        .bind(&lead.client_name)
        .bind(&lead.referrer)
        .bind(&lead.utm_source)
        .bind(&lead.utm_medium)
        .bind(&lead.utm_campaign)
        .bind(&lead.ip_hashed)
        .bind(&lead.user_agent)
        .bind(lead.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("failed to create lead", e))?;

        info!(lead_id = %lead.id, vehicle_id = %lead.vehicle_id, utm_source = %lead.utm_source, "lead recorded");
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner: Uuid,
        filter: &LeadFilter,
        page: PageRequest,
    ) -> Result<Paginated<LeadWithVehicle>, DomainError> {
        let mut select = QueryBuilder::new(
            "SELECT l.id, l.vehicle_id, l.client_name, l.referrer, l.utm_source, l.utm_medium, \
             l.utm_campaign, l.ip_hashed, l.user_agent, l.created_at, \
             v.title AS vehicle_title, v.slug AS vehicle_slug, v.price AS vehicle_price, \
             v.year AS vehicle_year, v.color AS vehicle_color \
             FROM leads l JOIN vehicles v ON v.id = l.vehicle_id",
        );
        push_owner_conditions(&mut select, owner, filter);
        select
            .push(" ORDER BY l.created_at DESC, l.id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = select
            .build_query_as::<LeadRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("failed to list leads", e))?;

        let mut count =
            QueryBuilder::new("SELECT COUNT(*) FROM leads l JOIN vehicles v ON v.id = l.vehicle_id");
        push_owner_conditions(&mut count, owner, filter);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("failed to count leads", e))?;

        Ok(Paginated::new(
            rows.into_iter().map(LeadWithVehicle::from).collect(),
            page,
            total,
        ))
    }

    async fn stats_for_owner(
        &self,
        owner: Uuid,
        since: DateTime<Utc>,
    ) -> Result<LeadStats, DomainError> {
        let (total_leads, leads_last_30_days): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE l.created_at >= $2)
            FROM leads l JOIN vehicles v ON v.id = l.vehicle_id
            WHERE v.user_id = $1
            "#,
        )
        .bind(owner)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("failed to count leads", e))?;

        let top: Vec<(Uuid, String, String, i64)> = sqlx::query_as(
            r#"
            SELECT v.id, v.title, v.slug, COUNT(l.id) AS lead_count
            FROM leads l JOIN vehicles v ON v.id = l.vehicle_id
            WHERE v.user_id = $1
            GROUP BY v.id, v.title, v.slug
            ORDER BY lead_count DESC, v.id
            LIMIT 5
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("failed to rank vehicles by leads", e))?;

        let by_source: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT l.utm_source, COUNT(*) AS lead_count
            FROM leads l JOIN vehicles v ON v.id = l.vehicle_id
            WHERE v.user_id = $1
            GROUP BY l.utm_source
            ORDER BY lead_count DESC, l.utm_source
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("failed to group leads by source", e))?;

        Ok(LeadStats {
            total_leads,
            leads_last_30_days,
            top_vehicles: top
                .into_iter()
                .map(|(id, title, slug, lead_count)| TopVehicle {
                    vehicle: VehicleRef { id, title, slug },
                    lead_count,
                })
                .collect(),
            leads_by_source: by_source
                .into_iter()
                .map(|(source, count)| SourceCount { source, count })
                .collect(),
        })
    }
}
