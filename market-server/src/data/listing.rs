//! Listing queries over the `vehicles` table.
//!
//! The storefront and the dashboard share one filter grammar but are built by
//! two separate types. [`PublicListing`] always pins `status = 'ACTIVE'` and its
//! column list has no `plate`; there is no input that can change either.
//! [`OwnerListing`] always pins `user_id` to the caller.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::pagination::PageRequest;
use crate::domain::vehicle::{
    OwnerFilter, OwnerVehicle, PublicVehicle, Seller, Vehicle, VehicleFilter, VehicleImage,
    VehicleStatus,
};

const PUBLIC_COLUMNS: &str = "v.id, v.title, v.slug, v.price, v.year, v.mileage_km, v.fuel, \
     v.transmission, v.color, v.location, v.description, v.status, v.created_at, v.updated_at, \
     u.id AS seller_id, u.name AS seller_name";

const OWNER_COLUMNS: &str = "v.id, v.user_id, v.title, v.slug, v.price, v.year, v.mileage_km, \
     v.fuel, v.transmission, v.color, v.location, v.description, v.plate, v.status, \
     v.created_at, v.updated_at, \
     (SELECT COUNT(*) FROM leads l WHERE l.vehicle_id = v.id) AS lead_count";

pub struct PublicListing {
    filter: VehicleFilter,
}

impl PublicListing {
    pub fn new(filter: VehicleFilter) -> Self {
        Self { filter }
    }

    pub fn select(&self, page: PageRequest) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(PUBLIC_COLUMNS)
            .push(" FROM vehicles v JOIN users u ON u.id = v.user_id");
        self.push_conditions(&mut qb);
        push_page(&mut qb, page);
        qb
    }

    pub fn count(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM vehicles v");
        self.push_conditions(&mut qb);
        qb
    }

    fn push_conditions(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push(" WHERE v.status = 'ACTIVE'");
        push_shared_filters(qb, &self.filter);
    }
}

pub struct OwnerListing {
    owner: Uuid,
    filter: OwnerFilter,
}

impl OwnerListing {
    pub fn new(owner: Uuid, filter: OwnerFilter) -> Self {
        Self { owner, filter }
    }

    pub fn select(&self, page: PageRequest) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(OWNER_COLUMNS).push(" FROM vehicles v");
        self.push_conditions(&mut qb);
        push_page(&mut qb, page);
        qb
    }

    pub fn count(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM vehicles v");
        self.push_conditions(&mut qb);
        qb
    }

    fn push_conditions(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push(" WHERE v.user_id = ").push_bind(self.owner);
        push_shared_filters(qb, &self.filter.base);
        if let Some(status) = self.filter.status {
            qb.push(" AND v.status = ").push_bind(status);
        }
        if let Some(plate) = &self.filter.plate {
            qb.push(" AND v.plate ILIKE ").push_bind(contains_pattern(plate));
        }
    }
}

fn push_shared_filters(qb: &mut QueryBuilder<'static, Postgres>, filter: &VehicleFilter) {
    if let Some(search) = &filter.search {
        let pattern = contains_pattern(search);
        qb.push(" AND (v.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR v.description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR v.location ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(min_price) = filter.min_price {
        qb.push(" AND v.price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        qb.push(" AND v.price <= ").push_bind(max_price);
    }
    if let Some(min_year) = filter.min_year {
        qb.push(" AND v.year >= ").push_bind(min_year);
    }
    if let Some(max_year) = filter.max_year {
        qb.push(" AND v.year <= ").push_bind(max_year);
    }
    if let Some(fuel) = &filter.fuel {
        qb.push(" AND v.fuel = ").push_bind(fuel.clone());
    }
    if let Some(transmission) = &filter.transmission {
        qb.push(" AND v.transmission = ").push_bind(transmission.clone());
    }
}

fn push_page(qb: &mut QueryBuilder<'static, Postgres>, page: PageRequest) {
    qb.push(" ORDER BY v.created_at DESC, v.id DESC LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
}

/// `%term%` with LIKE metacharacters escaped, for use with `ILIKE`.
pub fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[derive(Debug, sqlx::FromRow)]
pub struct PublicVehicleRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub price: Decimal,
    pub year: i32,
    pub mileage_km: i32,
    pub fuel: String,
    pub transmission: String,
    pub color: String,
    pub location: String,
    pub description: String,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub seller_id: Uuid,
    pub seller_name: String,
}

impl PublicVehicleRow {
    pub fn into_vehicle(self, images: Vec<VehicleImage>) -> PublicVehicle {
        PublicVehicle {
            id: self.id,
            title: self.title,
            slug: self.slug,
            price: self.price,
            year: self.year,
            mileage_km: self.mileage_km,
            fuel: self.fuel,
            transmission: self.transmission,
            color: self.color,
            location: self.location,
            description: self.description,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            seller: Seller {
                id: self.seller_id,
                name: self.seller_name,
            },
            images,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct OwnerVehicleRow {
    #[sqlx(flatten)]
    pub vehicle: Vehicle,
    pub lead_count: i64,
}

impl OwnerVehicleRow {
    pub fn into_vehicle(self, images: Vec<VehicleImage>) -> OwnerVehicle {
        OwnerVehicle::assemble(self.vehicle, images, self.lead_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_filter() -> VehicleFilter {
        VehicleFilter {
            search: Some("civic".into()),
            min_price: Some(Decimal::new(50_000, 0)),
            max_price: Some(Decimal::new(90_000, 0)),
            min_year: Some(2018),
            max_year: Some(2022),
            fuel: Some("Flex".into()),
            transmission: Some("CVT".into()),
        }
    }

    #[test]
    fn public_listing_pins_active_status_and_omits_plate() {
        let listing = PublicListing::new(full_filter());
        let sql = listing.select(PageRequest::new(None, None, 12)).sql().to_owned();
        assert!(sql.contains("WHERE v.status = 'ACTIVE'"));
        assert!(!sql.contains("plate"));
        assert!(sql.contains("ORDER BY v.created_at DESC"));

        let count = listing.count().sql().to_owned();
        assert!(count.contains("WHERE v.status = 'ACTIVE'"));
    }

    #[test]
    fn public_listing_binds_every_shared_filter() {
        let sql = PublicListing::new(full_filter())
            .select(PageRequest::new(None, None, 12))
            .sql()
            .to_owned();
        assert!(sql.contains("v.title ILIKE $1 OR v.description ILIKE $2 OR v.location ILIKE $3"));
        assert!(sql.contains("v.price >= $4"));
        assert!(sql.contains("v.price <= $5"));
        assert!(sql.contains("v.year >= $6"));
        assert!(sql.contains("v.year <= $7"));
        assert!(sql.contains("v.fuel = $8"));
        assert!(sql.contains("v.transmission = $9"));
        assert!(sql.contains("LIMIT $10 OFFSET $11"));
    }

    #[test]
    fn owner_listing_scopes_to_caller_and_accepts_status_and_plate() {
        let filter = OwnerFilter {
            base: VehicleFilter::default(),
            status: Some(VehicleStatus::Sold),
            plate: Some("ABC".into()),
        };
        let sql = OwnerListing::new(Uuid::new_v4(), filter)
            .select(PageRequest::new(None, None, 12))
            .sql()
            .to_owned();
        assert!(sql.contains("WHERE v.user_id = $1"));
        assert!(sql.contains("v.status = $2"));
        assert!(sql.contains("v.plate ILIKE $3"));
        assert!(sql.contains("AS lead_count"));
        assert!(!sql.contains("'ACTIVE'"));
    }

    #[test]
    fn contains_pattern_escapes_like_metacharacters() {
        assert_eq!(contains_pattern("civic"), "%civic%");
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
