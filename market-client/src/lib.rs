use async_trait::async_trait;
use uuid::Uuid;

mod error;
mod http_client;
pub mod models;
mod token;

pub use error::MarketClientError;
pub use http_client::MarketClientHttp;
pub use token::{DEFAULT_TOKEN_FILE, TokenStore};

use models::{
    LeadInput, LeadPage, LeadReceipt, LeadSearch, LeadStats, User, Vehicle, VehicleInput,
    VehiclePage, VehicleSearch,
};

#[async_trait(?Send)]
pub trait MarketClient {
    async fn register(
        &mut self,
        name: String,
        email: String,
        password: String,
    ) -> Result<User, MarketClientError>;
    async fn login(&mut self, email: String, password: String) -> Result<User, MarketClientError>;
    async fn me(&self) -> Result<User, MarketClientError>;

    async fn list_public(&self, search: &VehicleSearch) -> Result<VehiclePage, MarketClientError>;
    async fn get_public(&self, id: Uuid) -> Result<Vehicle, MarketClientError>;
    async fn list_owned(&self, search: &VehicleSearch) -> Result<VehiclePage, MarketClientError>;
    async fn get_vehicle(&self, id: Uuid) -> Result<Vehicle, MarketClientError>;
    async fn create_vehicle(&self, input: &VehicleInput) -> Result<Vehicle, MarketClientError>;
    async fn update_vehicle(
        &self,
        id: Uuid,
        changes: &VehicleInput,
    ) -> Result<Vehicle, MarketClientError>;
    async fn delete_vehicle(&self, id: Uuid) -> Result<(), MarketClientError>;

    async fn create_lead(&self, lead: &LeadInput) -> Result<LeadReceipt, MarketClientError>;
    async fn list_leads(&self, search: &LeadSearch) -> Result<LeadPage, MarketClientError>;
    async fn lead_stats(&self) -> Result<LeadStats, MarketClientError>;
}
