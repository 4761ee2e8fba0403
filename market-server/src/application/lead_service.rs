use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::instrument;
use uuid::Uuid;

use crate::data::lead_repository::LeadRepository;
use crate::data::vehicle_repository::VehicleRepository;
use crate::domain::error::DomainError;
use crate::domain::lead::{
    DEFAULT_UTM_CAMPAIGN, DEFAULT_UTM_MEDIUM, DEFAULT_UTM_SOURCE, Lead, LeadFilter, LeadStats,
    LeadSummary, LeadWithVehicle, NewLead,
};
use crate::domain::pagination::{PageRequest, Paginated};
use crate::domain::vehicle::VehicleStatus;
use crate::infrastructure::security::hash_ip;

const STATS_WINDOW_DAYS: i64 = 30;

/// Request metadata captured alongside a lead.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub ip: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Clone)]
pub struct LeadService {
    leads: Arc<dyn LeadRepository>,
    vehicles: Arc<dyn VehicleRepository>,
}

impl LeadService {
    pub fn new(leads: Arc<dyn LeadRepository>, vehicles: Arc<dyn VehicleRepository>) -> Self {
        Self { leads, vehicles }
    }

    #[instrument(skip(self, lead, ctx), fields(vehicle_id = %lead.vehicle_id))]
    pub async fn create_lead(
        &self,
        lead: NewLead,
        ctx: RequestContext,
    ) -> Result<LeadSummary, DomainError> {
        let vehicle = self
            .vehicles
            .find_by_id(lead.vehicle_id)
            .await?
            .ok_or(DomainError::VehicleNotFound(lead.vehicle_id))?;
        if vehicle.status != VehicleStatus::Active {
            return Err(DomainError::VehicleUnavailable(vehicle.id));
        }

        let record = Lead {
            id: Uuid::new_v4(),
            vehicle_id: vehicle.id,
            client_name: present(lead.client_name),
            referrer: present(ctx.referrer),
            utm_source: present(lead.utm_source).unwrap_or_else(|| DEFAULT_UTM_SOURCE.into()),
            utm_medium: present(lead.utm_medium).unwrap_or_else(|| DEFAULT_UTM_MEDIUM.into()),
            utm_campaign: present(lead.utm_campaign)
                .unwrap_or_else(|| DEFAULT_UTM_CAMPAIGN.into()),
            ip_hashed: present(ctx.ip).map(|ip| hash_ip(&ip)),
            user_agent: present(ctx.user_agent),
            created_at: Utc::now(),
        };
        self.leads.create(&record).await?;

        Ok(LeadSummary {
            id: record.id,
            vehicle_id: vehicle.id,
            vehicle_title: vehicle.title,
            created_at: record.created_at,
        })
    }

    pub async fn list_leads(
        &self,
        owner: Uuid,
        filter: LeadFilter,
        page: PageRequest,
    ) -> Result<Paginated<LeadWithVehicle>, DomainError> {
        self.leads.list_for_owner(owner, &filter, page).await
    }

    pub async fn stats(&self, owner: Uuid) -> Result<LeadStats, DomainError> {
        let since = Utc::now() - Duration::days(STATS_WINDOW_DAYS);
        self.leads.stats_for_owner(owner, since).await
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::vehicle_service::VehicleService;
    use crate::data::memory::InMemoryStore;
    use crate::domain::vehicle::{NewVehicle, VehicleChanges};
    use rust_decimal::Decimal;

    struct Fixture {
        store: Arc<InMemoryStore>,
        vehicles: VehicleService,
        leads: LeadService,
        owner: Uuid,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        Fixture {
            vehicles: VehicleService::new(store.clone()),
            leads: LeadService::new(store.clone(), store.clone()),
            store,
            owner: Uuid::new_v4(),
        }
    }

    fn listing(title: &str) -> NewVehicle {
        NewVehicle {
            title: title.into(),
            price: Decimal::new(62_500, 0),
            year: 2019,
            mileage_km: 54_000,
            fuel: "Flex".into(),
            transmission: "Manual".into(),
            color: "Vermelho".into(),
            location: "Anápolis, GO".into(),
            description: "Pneus novos, revisões em dia.".into(),
            plate: None,
            images: vec![],
        }
    }

    fn visitor() -> RequestContext {
        RequestContext {
            ip: Some("203.0.113.7".into()),
            referrer: Some("https://www.google.com/".into()),
            user_agent: Some("Mozilla/5.0".into()),
        }
    }

    #[tokio::test]
    async fn lead_defaults_utm_fields_and_hashes_the_address() {
        let f = fixture();
        let vehicle = f.vehicles.create(f.owner, listing("VW Gol 1.6")).await.unwrap();

        let summary = f
            .leads
            .create_lead(
                NewLead {
                    vehicle_id: vehicle.id,
                    client_name: Some("João".into()),
                    utm_source: Some("   ".into()),
                    ..Default::default()
                },
                visitor(),
            )
            .await
            .unwrap();
        assert_eq!(summary.vehicle_title, "VW Gol 1.6");

        let stored = f.store.leads();
        assert_eq!(stored.len(), 1);
        let lead = &stored[0];
        assert_eq!(lead.utm_source, DEFAULT_UTM_SOURCE);
        assert_eq!(lead.utm_medium, DEFAULT_UTM_MEDIUM);
        assert_eq!(lead.utm_campaign, DEFAULT_UTM_CAMPAIGN);
        assert_eq!(lead.client_name.as_deref(), Some("João"));
        assert_eq!(lead.referrer.as_deref(), Some("https://www.google.com/"));
        assert_eq!(lead.ip_hashed.as_deref(), Some(hash_ip("203.0.113.7").as_str()));
        assert_ne!(lead.ip_hashed.as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn unknown_address_leaves_hash_empty() {
        let f = fixture();
        let vehicle = f.vehicles.create(f.owner, listing("VW Gol 1.6")).await.unwrap();
        f.leads
            .create_lead(
                NewLead {
                    vehicle_id: vehicle.id,
                    ..Default::default()
                },
                RequestContext::default(),
            )
            .await
            .unwrap();
        assert!(f.store.leads()[0].ip_hashed.is_none());
    }

    #[tokio::test]
    async fn lead_for_inactive_vehicle_fails_and_persists_nothing() {
        let f = fixture();
        let vehicle = f.vehicles.create(f.owner, listing("VW Gol 1.6")).await.unwrap();
        f.vehicles
            .update(
                f.owner,
                vehicle.id,
                VehicleChanges {
                    status: Some(VehicleStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = f
            .leads
            .create_lead(
                NewLead {
                    vehicle_id: vehicle.id,
                    ..Default::default()
                },
                visitor(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::VehicleUnavailable(_)));
        assert_eq!(f.store.lead_count(), 0);
    }

    #[tokio::test]
    async fn lead_for_missing_vehicle_is_not_found() {
        let f = fixture();
        let err = f
            .leads
            .create_lead(
                NewLead {
                    vehicle_id: Uuid::new_v4(),
                    ..Default::default()
                },
                visitor(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::VehicleNotFound(_)));
    }

    #[tokio::test]
    async fn listing_and_stats_are_scoped_to_the_owner() {
        let f = fixture();
        let civic = f.vehicles.create(f.owner, listing("Honda Civic")).await.unwrap();
        let gol = f.vehicles.create(f.owner, listing("VW Gol 1.6")).await.unwrap();
        let foreign = f
            .vehicles
            .create(Uuid::new_v4(), listing("Fiat Uno"))
            .await
            .unwrap();

        for (vehicle_id, source) in [
            (civic.id, Some("instagram")),
            (civic.id, Some("instagram")),
            (civic.id, None),
            (gol.id, None),
            (foreign.id, None),
        ] {
            f.leads
                .create_lead(
                    NewLead {
                        vehicle_id,
                        utm_source: source.map(String::from),
                        ..Default::default()
                    },
                    visitor(),
                )
                .await
                .unwrap();
        }
        let mut old = f.store.leads()[0].clone();
        old.id = Uuid::new_v4();
        old.created_at = Utc::now() - Duration::days(45);
        f.store.insert_lead(old);

        let page = f
            .leads
            .list_leads(f.owner, LeadFilter::default(), PageRequest::new(None, None, 20))
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert!(page.items.iter().all(|l| l.vehicle.id != foreign.id));
        assert!(page.items.windows(2).all(|w| w[0].lead.created_at >= w[1].lead.created_at));

        let only_gol = f
            .leads
            .list_leads(
                f.owner,
                LeadFilter {
                    vehicle_id: Some(gol.id),
                    ..Default::default()
                },
                PageRequest::new(None, None, 20),
            )
            .await
            .unwrap();
        assert_eq!(only_gol.total, 1);
        assert_eq!(only_gol.items[0].vehicle.title, "VW Gol 1.6");

        let stats = f.leads.stats(f.owner).await.unwrap();
        assert_eq!(stats.total_leads, 5);
        assert_eq!(stats.leads_last_30_days, 4);
        assert_eq!(stats.top_vehicles[0].vehicle.id, civic.id);
        assert_eq!(stats.top_vehicles[0].lead_count, 4);
        assert_eq!(stats.leads_by_source[0].source, "instagram");
        assert_eq!(stats.leads_by_source[0].count, 3);
        assert_eq!(stats.leads_by_source[1].source, DEFAULT_UTM_SOURCE);
        assert_eq!(stats.leads_by_source[1].count, 2);
    }
}
