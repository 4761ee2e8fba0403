use std::sync::Arc;

use tracing::{instrument, warn};
use uuid::Uuid;

use crate::data::vehicle_repository::VehicleRepository;
use crate::domain::error::DomainError;
use crate::domain::pagination::{PageRequest, Paginated};
use crate::domain::vehicle::{
    NewVehicle, OwnerFilter, OwnerVehicle, PublicVehicle, Vehicle, VehicleChanges, VehicleFilter,
    VehicleStatus, VehicleView,
};
use crate::infrastructure::slug::unique_slug;

/// Insert/update attempts before a lost slug race is reported as a conflict.
const SLUG_ATTEMPTS: u32 = 3;

#[derive(Clone)]
pub struct VehicleService {
    repo: Arc<dyn VehicleRepository>,
}

impl VehicleService {
    pub fn new(repo: Arc<dyn VehicleRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_public(
        &self,
        filter: VehicleFilter,
        page: PageRequest,
    ) -> Result<Paginated<PublicVehicle>, DomainError> {
        self.repo.list_public(&filter, page).await
    }

    pub async fn list_owned(
        &self,
        owner: Uuid,
        filter: OwnerFilter,
        page: PageRequest,
    ) -> Result<Paginated<OwnerVehicle>, DomainError> {
        self.repo.list_owned(owner, &filter, page).await
    }

    /// Storefront lookup: anything but an ACTIVE vehicle is reported as missing.
    pub async fn get_public(&self, id: Uuid) -> Result<PublicVehicle, DomainError> {
        match self.repo.find_detail(id).await? {
            Some(detail) if detail.vehicle.status == VehicleStatus::Active => Ok(detail.into()),
            _ => Err(DomainError::VehicleNotFound(id)),
        }
    }

    pub async fn get_for_viewer(&self, id: Uuid, viewer: Uuid) -> Result<VehicleView, DomainError> {
        let detail = self
            .repo
            .find_detail(id)
            .await?
            .ok_or(DomainError::VehicleNotFound(id))?;

        if detail.vehicle.is_owned_by(viewer) {
            Ok(VehicleView::Owner(detail.into()))
        } else if detail.vehicle.status == VehicleStatus::Active {
            Ok(VehicleView::Public(detail.into()))
        } else {
            Err(DomainError::VehicleNotFound(id))
        }
    }

    #[instrument(skip(self, listing), fields(title = %listing.title))]
    pub async fn create(
        &self,
        owner: Uuid,
        listing: NewVehicle,
    ) -> Result<OwnerVehicle, DomainError> {
        for attempt in 1..=SLUG_ATTEMPTS {
            let slug = self.fresh_slug(&listing.title, None).await?;
            let vehicle = Vehicle::new(owner, listing.clone(), slug);

            match self.repo.create(&vehicle, &listing.images).await {
                Ok(()) => return self.owner_view(vehicle.id).await,
                Err(DomainError::SlugTaken(slug)) => {
                    warn!(%slug, attempt, "slug claimed concurrently, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(slug_conflict())
    }

    #[instrument(skip(self, changes))]
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: VehicleChanges,
    ) -> Result<OwnerVehicle, DomainError> {
        let current = self.owned(owner, id).await?;

        if let Some(next) = changes.status {
            if !current.status.can_transition_to(next) {
                return Err(DomainError::Conflict(
                    "a sold vehicle cannot be set back to active or inactive".into(),
                ));
            }
        }

        let mut updated = current.clone();
        updated.apply(&changes);
        let new_title = changes.title.as_ref().filter(|t| **t != current.title);

        for attempt in 1..=SLUG_ATTEMPTS {
            if let Some(title) = new_title {
                updated.title = title.clone();
                updated.slug = self.fresh_slug(title, Some(&current.slug)).await?;
            }

            match self.repo.update(&updated, changes.images.as_deref()).await {
                Ok(()) => return self.owner_view(id).await,
                Err(DomainError::SlugTaken(slug)) if new_title.is_some() => {
                    warn!(%slug, attempt, "slug claimed concurrently, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(slug_conflict())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), DomainError> {
        self.owned(owner, id).await?;
        if self.repo.delete(id, owner).await? {
            Ok(())
        } else {
            Err(DomainError::VehicleNotFound(id))
        }
    }

    async fn owned(&self, owner: Uuid, id: Uuid) -> Result<Vehicle, DomainError> {
        let vehicle = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::VehicleNotFound(id))?;
        if !vehicle.is_owned_by(owner) {
            return Err(DomainError::Forbidden);
        }
        Ok(vehicle)
    }

    async fn owner_view(&self, id: Uuid) -> Result<OwnerVehicle, DomainError> {
        self.repo
            .find_detail(id)
            .await?
            .map(OwnerVehicle::from)
            .ok_or(DomainError::VehicleNotFound(id))
    }

    /// `own` is the record's current slug, which never counts as taken.
    async fn fresh_slug(&self, title: &str, own: Option<&str>) -> Result<String, DomainError> {
        let repo = &self.repo;
        unique_slug(title, |candidate| async move {
            if own == Some(candidate.as_str()) {
                return Ok(false);
            }
            repo.slug_exists(&candidate).await
        })
        .await
    }
}

fn slug_conflict() -> DomainError {
    DomainError::Conflict("could not allocate a unique slug, try again".into())
}
