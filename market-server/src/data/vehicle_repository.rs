use std::collections::HashMap;

use crate::data::listing::{OwnerListing, OwnerVehicleRow, PublicListing, PublicVehicleRow};
use crate::domain::error::DomainError;
use crate::domain::pagination::{PageRequest, Paginated};
use crate::domain::vehicle::{
    OwnerFilter, OwnerVehicle, PublicVehicle, Seller, Vehicle, VehicleDetail, VehicleFilter,
    VehicleImage,
};
use crate::infrastructure::database::violates_constraint;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{error, info};
use uuid::Uuid;

pub const SLUG_CONSTRAINT: &str = "vehicles_slug_key";

const VEHICLE_COLUMNS: &str = "id, user_id, title, slug, price, year, mileage_km, fuel, \
     transmission, color, location, description, plate, status, created_at, updated_at";

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn list_public(
        &self,
        filter: &VehicleFilter,
        page: PageRequest,
    ) -> Result<Paginated<PublicVehicle>, DomainError>;
    async fn list_owned(
        &self,
        owner: Uuid,
        filter: &OwnerFilter,
        page: PageRequest,
    ) -> Result<Paginated<OwnerVehicle>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, DomainError>;
    async fn find_detail(&self, id: Uuid) -> Result<Option<VehicleDetail>, DomainError>;
    async fn slug_exists(&self, slug: &str) -> Result<bool, DomainError>;
    /// Fails with [`DomainError::SlugTaken`] when the slug constraint rejects the row.
    async fn create(&self, vehicle: &Vehicle, images: &[String]) -> Result<(), DomainError>;
    /// Full-row overwrite scoped to the owner; `images`, when given, replaces the gallery.
    async fn update(&self, vehicle: &Vehicle, images: Option<&[String]>)
    -> Result<(), DomainError>;
    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresVehicleRepository {
    pool: PgPool,
}

impl PostgresVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn images_for(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<VehicleImage>>, DomainError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let images = sqlx::query_as::<_, VehicleImage>(
            r#"
            SELECT id, vehicle_id, url, position, created_at
            FROM vehicle_images
            WHERE vehicle_id = ANY($1)
            ORDER BY vehicle_id, position
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("failed to load vehicle images", e))?;

        let mut grouped: HashMap<Uuid, Vec<VehicleImage>> = HashMap::new();
        for image in images {
            grouped.entry(image.vehicle_id).or_default().push(image);
        }
        Ok(grouped)
    }

    async fn insert_images(
        tx: &mut Transaction<'_, Postgres>,
        vehicle_id: Uuid,
        urls: &[String],
    ) -> Result<(), sqlx::Error> {
        for image in VehicleImage::gallery(vehicle_id, urls) {
            sqlx::query(
                r#"
                INSERT INTO vehicle_images (id, vehicle_id, url, position, created_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(image.id)
            .bind(image.vehicle_id)
            .bind(&image.url)
            .bind(image.position)
            .bind(image.created_at)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("{}: {}", context, e);
    DomainError::Internal(format!("database error: {}", e))
}

fn write_error(vehicle: &Vehicle, context: &str, e: sqlx::Error) -> DomainError {
    if violates_constraint(&e, SLUG_CONSTRAINT) {
        DomainError::SlugTaken(vehicle.slug.clone())
    } else {
        db_error(context, e)
    }
}

#[async_trait]
impl VehicleRepository for PostgresVehicleRepository {
    async fn list_public(
        &self,
        filter: &VehicleFilter,
        page: PageRequest,
    ) -> Result<Paginated<PublicVehicle>, DomainError> {
        let listing = PublicListing::new(filter.clone());

        let rows = listing
            .select(page)
            .build_query_as::<PublicVehicleRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("failed to list public vehicles", e))?;
        let total = listing
            .count()
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("failed to count public vehicles", e))?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut images = self.images_for(&ids).await?;
        let vehicles = rows
            .into_iter()
            .map(|row| {
                let gallery = images.remove(&row.id).unwrap_or_default();
                row.into_vehicle(gallery)
            })
            .collect();

        Ok(Paginated::new(vehicles, page, total))
    }

    async fn list_owned(
        &self,
        owner: Uuid,
        filter: &OwnerFilter,
        page: PageRequest,
    ) -> Result<Paginated<OwnerVehicle>, DomainError> {
        let listing = OwnerListing::new(owner, filter.clone());

        let rows = listing
            .select(page)
            .build_query_as::<OwnerVehicleRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("failed to list owner vehicles", e))?;
        let total = listing
            .count()
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("failed to count owner vehicles", e))?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.vehicle.id).collect();
        let mut images = self.images_for(&ids).await?;
        let vehicles = rows
            .into_iter()
            .map(|row| {
                let gallery = images.remove(&row.vehicle.id).unwrap_or_default();
                row.into_vehicle(gallery)
            })
            .collect();

        Ok(Paginated::new(vehicles, page, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, DomainError> {
        sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {} FROM vehicles WHERE id = $1",
            VEHICLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("failed to find vehicle", e))
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<VehicleDetail>, DomainError> {
        let Some(vehicle) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let seller = sqlx::query_as::<_, (Uuid, String)>("SELECT id, name FROM users WHERE id = $1")
            .bind(vehicle.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("failed to load vehicle seller", e))?;
        let lead_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM leads WHERE vehicle_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("failed to count vehicle leads", e))?;
        let images = self.images_for(&[id]).await?.remove(&id).unwrap_or_default();

        Ok(Some(VehicleDetail {
            vehicle,
            seller: Seller {
                id: seller.0,
                name: seller.1,
            },
            images,
            lead_count,
        }))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM vehicles WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("failed to probe slug", e))
    }

    async fn create(&self, vehicle: &Vehicle, images: &[String]) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("failed to open transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO vehicles (id, user_id, title, slug, price, year, mileage_km, fuel,
                                  transmission, color, location, description, plate, status,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(vehicle.id)
        .bind(vehicle.user_id)
        .bind(&vehicle.title)
        .bind(&vehicle.slug)
        .bind(vehicle.price)
        .bind(vehicle.year)
        .bind(vehicle.mileage_km)
        .bind(&vehicle.fuel)
        .bind(&vehicle.transmission)
        .bind(&vehicle.color)
        .bind(&vehicle.location)
        .bind(&vehicle.description)
        .bind(&vehicle.plate)
        .bind(vehicle.status)
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(vehicle, "failed to create vehicle", e))?;

        Self::insert_images(&mut tx, vehicle.id, images)
            .await
            .map_err(|e| db_error("failed to store vehicle images", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("failed to commit vehicle", e))?;

        info!(vehicle_id = %vehicle.id, owner_id = %vehicle.user_id, slug = %vehicle.slug, "vehicle created");
        Ok(())
    }

    async fn update(
        &self,
        vehicle: &Vehicle,
        images: Option<&[String]>,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("failed to open transaction", e))?;

        let updated = sqlx::query(
            r#"
            UPDATE vehicles
            SET
                title = $1, slug = $2, price = $3, year = $4, mileage_km = $5, fuel = $6,
                transmission = $7, color = $8, location = $9, description = $10, plate = $11,
                status = $12, updated_at = $13
            WHERE id = $14 AND user_id = $15
            "#,
        )
        .bind(&vehicle.title)
        .bind(&vehicle.slug)
        .bind(vehicle.price)
        .bind(vehicle.year)
        .bind(vehicle.mileage_km)
        .bind(&vehicle.fuel)
        .bind(&vehicle.transmission)
        .bind(&vehicle.color)
        .bind(&vehicle.location)
        .bind(&vehicle.description)
        .bind(&vehicle.plate)
        .bind(vehicle.status)
        .bind(vehicle.updated_at)
        .bind(vehicle.id)
        .bind(vehicle.user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(vehicle, "failed to update vehicle", e))?;

        if updated.rows_affected() == 0 {
            return Err(DomainError::VehicleNotFound(vehicle.id));
        }

        if let Some(urls) = images {
            sqlx::query("DELETE FROM vehicle_images WHERE vehicle_id = $1")
                .bind(vehicle.id)
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("failed to clear vehicle images", e))?;
            Self::insert_images(&mut tx, vehicle.id, urls)
                .await
                .map_err(|e| db_error("failed to store vehicle images", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("failed to commit vehicle", e))?;

        info!(vehicle_id = %vehicle.id, "vehicle updated");
        Ok(())
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM vehicles WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("failed to delete vehicle", e))?;

        if deleted.rows_affected() > 0 {
            info!(vehicle_id = %id, "vehicle deleted");
        }
        Ok(deleted.rows_affected() > 0)
    }
}
