//! In-memory repositories used by service and handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::data::lead_repository::LeadRepository;
use crate::data::user_repository::UserRepository;
use crate::data::vehicle_repository::VehicleRepository;
use crate::domain::error::DomainError;
use crate::domain::lead::{
    Lead, LeadFilter, LeadStats, LeadVehicle, LeadWithVehicle, SourceCount, TopVehicle,
    VehicleRef,
};
use crate::domain::pagination::{PageRequest, Paginated};
use crate::domain::user::User;
use crate::domain::vehicle::{
    OwnerFilter, OwnerVehicle, PublicVehicle, Seller, Vehicle, VehicleDetail, VehicleFilter,
    VehicleImage, VehicleStatus,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    vehicles: Vec<Vehicle>,
    images: Vec<VehicleImage>,
    leads: Vec<Lead>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lead_count(&self) -> usize {
        self.tables.lock().unwrap().leads.len()
    }

    pub fn leads(&self) -> Vec<Lead> {
        self.tables.lock().unwrap().leads.clone()
    }

    pub fn insert_lead(&self, lead: Lead) {
        self.tables.lock().unwrap().leads.push(lead);
    }
}

impl Tables {
    fn detail(&self, vehicle: &Vehicle) -> VehicleDetail {
        let seller = self
            .users
            .iter()
            .find(|u| u.id == vehicle.user_id)
            .map(|u| Seller {
                id: u.id,
                name: u.name.clone(),
            })
            .unwrap_or(Seller {
                id: vehicle.user_id,
                name: String::new(),
            });
        let mut images: Vec<VehicleImage> = self
            .images
            .iter()
            .filter(|i| i.vehicle_id == vehicle.id)
            .cloned()
            .collect();
        images.sort_by_key(|i| i.position);
        let lead_count = self
            .leads
            .iter()
            .filter(|l| l.vehicle_id == vehicle.id)
            .count() as i64;

        VehicleDetail {
            vehicle: vehicle.clone(),
            seller,
            images,
            lead_count,
        }
    }

    fn page<T>(
        &self,
        mut matched: Vec<&Vehicle>,
        page: PageRequest,
        project: impl Fn(VehicleDetail) -> T,
    ) -> Paginated<T> {
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total = matched.len() as i64;
        let items = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|v| project(self.detail(v)))
            .collect();
        Paginated::new(items, page, total)
    }

    fn owned_leads(&self, owner: Uuid) -> Vec<(&Lead, &Vehicle)> {
        self.leads
            .iter()
            .filter_map(|l| {
                self.vehicles
                    .iter()
                    .find(|v| v.id == l.vehicle_id && v.user_id == owner)
                    .map(|v| (l, v))
            })
            .collect()
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_shared(v: &Vehicle, f: &VehicleFilter) -> bool {
    if let Some(search) = &f.search {
        if !(contains(&v.title, search)
            || contains(&v.description, search)
            || contains(&v.location, search))
        {
            return false;
        }
    }
    f.min_price.is_none_or(|p| v.price >= p)
        && f.max_price.is_none_or(|p| v.price <= p)
        && f.min_year.is_none_or(|y| v.year >= y)
        && f.max_year.is_none_or(|y| v.year <= y)
        && f.fuel.as_ref().is_none_or(|fuel| &v.fuel == fuel)
        && f.transmission.as_ref().is_none_or(|t| &v.transmission == t)
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::UserAlreadyExists(user.email));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl VehicleRepository for InMemoryStore {
    async fn list_public(
        &self,
        filter: &VehicleFilter,
        page: PageRequest,
    ) -> Result<Paginated<PublicVehicle>, DomainError> {
        let tables = self.tables.lock().unwrap();
        let matched = tables
            .vehicles
            .iter()
            .filter(|v| v.status == VehicleStatus::Active && matches_shared(v, filter))
            .collect();
        Ok(tables.page(matched, page, PublicVehicle::from))
    }

    async fn list_owned(
        &self,
        owner: Uuid,
        filter: &OwnerFilter,
        page: PageRequest,
    ) -> Result<Paginated<OwnerVehicle>, DomainError> {
        let tables = self.tables.lock().unwrap();
        let matched = tables
            .vehicles
            .iter()
            .filter(|v| {
                v.user_id == owner
                    && matches_shared(v, &filter.base)
                    && filter.status.is_none_or(|s| v.status == s)
                    && filter.plate.as_ref().is_none_or(|p| {
                        v.plate.as_deref().is_some_and(|plate| contains(plate, p))
                    })
            })
            .collect();
        Ok(tables.page(matched, page, OwnerVehicle::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, DomainError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.vehicles.iter().find(|v| v.id == id).cloned())
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<VehicleDetail>, DomainError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .vehicles
            .iter()
            .find(|v| v.id == id)
            .map(|v| tables.detail(v)))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, DomainError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.vehicles.iter().any(|v| v.slug == slug))
    }

    async fn create(&self, vehicle: &Vehicle, images: &[String]) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.vehicles.iter().any(|v| v.slug == vehicle.slug) {
            return Err(DomainError::SlugTaken(vehicle.slug.clone()));
        }
        tables.vehicles.push(vehicle.clone());
        tables
            .images
            .extend(VehicleImage::gallery(vehicle.id, images));
        Ok(())
    }

    async fn update(
        &self,
        vehicle: &Vehicle,
        images: Option<&[String]>,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .vehicles
            .iter()
            .any(|v| v.slug == vehicle.slug && v.id != vehicle.id)
        {
            return Err(DomainError::SlugTaken(vehicle.slug.clone()));
        }
        let Some(slot) = tables
            .vehicles
            .iter_mut()
            .find(|v| v.id == vehicle.id && v.user_id == vehicle.user_id)
        else {
            return Err(DomainError::VehicleNotFound(vehicle.id));
        };
        *slot = vehicle.clone();
        if let Some(urls) = images {
            tables.images.retain(|i| i.vehicle_id != vehicle.id);
            tables.images.extend(VehicleImage::gallery(vehicle.id, urls));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.vehicles.len();
        tables
            .vehicles
            .retain(|v| !(v.id == id && v.user_id == owner));
        let deleted = tables.vehicles.len() < before;
        if deleted {
            tables.images.retain(|i| i.vehicle_id != id);
            tables.leads.retain(|l| l.vehicle_id != id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl LeadRepository for InMemoryStore {
    async fn create(&self, lead: &Lead) -> Result<(), DomainError> {
        self.tables.lock().unwrap().leads.push(lead.clone());
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner: Uuid,
        filter: &LeadFilter,
        page: PageRequest,
    ) -> Result<Paginated<LeadWithVehicle>, DomainError> {
        let tables = self.tables.lock().unwrap();
        let mut matched: Vec<(&Lead, &Vehicle)> = tables
            .owned_leads(owner)
            .into_iter()
            .filter(|(l, _)| {
                filter.vehicle_id.is_none_or(|id| l.vehicle_id == id)
                    && filter.start.is_none_or(|s| l.created_at >= s)
                    && filter.end.is_none_or(|e| l.created_at <= e)
            })
            .collect();
        matched.sort_by(|(a, _), (b, _)| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matched.len() as i64;
        let items = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|(l, v)| LeadWithVehicle {
                lead: l.clone(),
                vehicle: LeadVehicle {
                    id: v.id,
                    title: v.title.clone(),
                    slug: v.slug.clone(),
                    price: v.price,
                    year: v.year,
                    color: v.color.clone(),
                },
            })
            .collect();
        Ok(Paginated::new(items, page, total))
    }

    async fn stats_for_owner(
        &self,
        owner: Uuid,
        since: DateTime<Utc>,
    ) -> Result<LeadStats, DomainError> {
        let tables = self.tables.lock().unwrap();
        let owned = tables.owned_leads(owner);

        let mut per_vehicle: Vec<(VehicleRef, i64)> = Vec::new();
        let mut per_source: Vec<(String, i64)> = Vec::new();
        for (lead, vehicle) in &owned {
            match per_vehicle.iter_mut().find(|(r, _)| r.id == vehicle.id) {
                Some((_, n)) => *n += 1,
                None => per_vehicle.push((
                    VehicleRef {
                        id: vehicle.id,
                        title: vehicle.title.clone(),
                        slug: vehicle.slug.clone(),
                    },
                    1,
                )),
            }
            match per_source.iter_mut().find(|(s, _)| *s == lead.utm_source) {
                Some((_, n)) => *n += 1,
                None => per_source.push((lead.utm_source.clone(), 1)),
            }
        }
        per_vehicle.sort_by(|(a, x), (b, y)| y.cmp(x).then(a.id.cmp(&b.id)));
        per_source.sort_by(|(a, x), (b, y)| y.cmp(x).then(a.cmp(b)));

        Ok(LeadStats {
            total_leads: owned.len() as i64,
            leads_last_30_days: owned.iter().filter(|(l, _)| l.created_at >= since).count() as i64,
            top_vehicles: per_vehicle
                .into_iter()
                .take(5)
                .map(|(vehicle, lead_count)| TopVehicle { vehicle, lead_count })
                .collect(),
            leads_by_source: per_source
                .into_iter()
                .map(|(source, count)| SourceCount { source, count })
                .collect(),
        })
    }
}
