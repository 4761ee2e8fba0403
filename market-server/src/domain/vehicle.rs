use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const FUELS: [&str; 7] = [
    "Gasolina", "Álcool", "Flex", "Diesel", "GNV", "Híbrido", "Elétrico",
];

pub const TRANSMISSIONS: [&str; 4] = ["Manual", "Automática", "CVT", "Automatizada"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "vehicle_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleStatus {
    Active,
    Inactive,
    Sold,
}

impl VehicleStatus {
    /// ACTIVE and INACTIVE toggle freely and may both become SOLD.
    /// SOLD is terminal: it can only be re-applied to itself.
    pub fn can_transition_to(self, next: VehicleStatus) -> bool {
        !matches!(
            (self, next),
            (VehicleStatus::Sold, VehicleStatus::Active | VehicleStatus::Inactive)
        )
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub user_id: Uuid,
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
    pub plate: Option<String>,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(owner: Uuid, listing: NewVehicle, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            title: listing.title,
            slug,
            price: listing.price,
            year: listing.year,
            mileage_km: listing.mileage_km,
            fuel: listing.fuel,
            transmission: listing.transmission,
            color: listing.color,
            location: listing.location,
            description: listing.description,
            plate: listing.plate,
            status: VehicleStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Copies every provided field except the title, whose slug bookkeeping
    /// belongs to the caller.
    pub fn apply(&mut self, changes: &VehicleChanges) {
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(year) = changes.year {
            self.year = year;
        }
        if let Some(mileage_km) = changes.mileage_km {
            self.mileage_km = mileage_km;
        }
        if let Some(fuel) = &changes.fuel {
            self.fuel = fuel.clone();
        }
        if let Some(transmission) = &changes.transmission {
            self.transmission = transmission.clone();
        }
        if let Some(color) = &changes.color {
            self.color = color.clone();
        }
        if let Some(location) = &changes.location {
            self.location = location.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(plate) = &changes.plate {
            self.plate = Some(plate.clone());
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub title: String,
    pub price: Decimal,
    pub year: i32,
    pub mileage_km: i32,
    pub fuel: String,
    pub transmission: String,
    pub color: String,
    pub location: String,
    pub description: String,
    pub plate: Option<String>,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct VehicleChanges {
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub year: Option<i32>,
    pub mileage_km: Option<i32>,
    pub fuel: Option<String>,
    pub transmission: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub plate: Option<String>,
    pub status: Option<VehicleStatus>,
    /// When present the whole image set is replaced, in list order.
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VehicleImage {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub url: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl VehicleImage {
    pub fn gallery(vehicle_id: Uuid, urls: &[String]) -> Vec<Self> {
        let now = Utc::now();
        urls.iter()
            .enumerate()
            .map(|(position, url)| Self {
                id: Uuid::new_v4(),
                vehicle_id,
                url: url.clone(),
                position: position as i32,
                created_at: now,
            })
            .collect()
    }
}

/// Filters shared by the storefront and the dashboard listings.
#[derive(Debug, Clone, Default)]
pub struct VehicleFilter {
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub fuel: Option<String>,
    pub transmission: Option<String>,
}

/// Dashboard-only filters on top of [`VehicleFilter`].
#[derive(Debug, Clone, Default)]
pub struct OwnerFilter {
    pub base: VehicleFilter,
    pub status: Option<VehicleStatus>,
    pub plate: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Seller {
    pub id: Uuid,
    pub name: String,
}

/// Storefront projection. Has no plate field, so it cannot leak one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicVehicle {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(with = "rust_decimal::serde::float")]
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
    pub seller: Seller,
    pub images: Vec<VehicleImage>,
}

/// Dashboard projection: the full record plus its lead count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerVehicle {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub year: i32,
    pub mileage_km: i32,
    pub fuel: String,
    pub transmission: String,
    pub color: String,
    pub location: String,
    pub description: String,
    pub plate: Option<String>,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub images: Vec<VehicleImage>,
    pub lead_count: i64,
}

/// A single vehicle with everything either projection needs.
#[derive(Debug, Clone)]
pub struct VehicleDetail {
    pub vehicle: Vehicle,
    pub seller: Seller,
    pub images: Vec<VehicleImage>,
    pub lead_count: i64,
}

impl From<VehicleDetail> for PublicVehicle {
    fn from(detail: VehicleDetail) -> Self {
        let v = detail.vehicle;
        Self {
            id: v.id,
            title: v.title,
            slug: v.slug,
            price: v.price,
            year: v.year,
            mileage_km: v.mileage_km,
            fuel: v.fuel,
            transmission: v.transmission,
            color: v.color,
            location: v.location,
            description: v.description,
            status: v.status,
            created_at: v.created_at,
            updated_at: v.updated_at,
            seller: detail.seller,
            images: detail.images,
        }
    }
}

impl OwnerVehicle {
    pub fn assemble(v: Vehicle, images: Vec<VehicleImage>, lead_count: i64) -> Self {
        Self {
            id: v.id,
            user_id: v.user_id,
            title: v.title,
            slug: v.slug,
            price: v.price,
            year: v.year,
            mileage_km: v.mileage_km,
            fuel: v.fuel,
            transmission: v.transmission,
            color: v.color,
            location: v.location,
            description: v.description,
            plate: v.plate,
            status: v.status,
            created_at: v.created_at,
            updated_at: v.updated_at,
            images,
            lead_count,
        }
    }
}

impl From<VehicleDetail> for OwnerVehicle {
    fn from(detail: VehicleDetail) -> Self {
        OwnerVehicle::assemble(detail.vehicle, detail.images, detail.lead_count)
    }
}

/// Single-record response shape; which variant a caller gets depends on ownership.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum VehicleView {
    Owner(OwnerVehicle),
    Public(PublicVehicle),
}
