use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::MarketClient;
use crate::error::MarketClientError;
use crate::models::{
    LeadInput, LeadPage, LeadReceipt, LeadSearch, LeadStats, User, Vehicle, VehicleInput,
    VehiclePage, VehicleSearch,
};
use crate::token::TokenStore;

#[derive(Clone)]
pub struct MarketClientHttp {
    client: Client,
    base_url: String,
    store: TokenStore,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: User,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    user: User,
}

#[derive(Debug, Deserialize)]
struct VehicleResponse {
    vehicle: Vehicle,
}

#[derive(Debug, Deserialize)]
struct LeadCreatedResponse {
    lead: LeadReceipt,
}

#[derive(Debug, Deserialize)]
struct LeadStatsResponse {
    stats: LeadStats,
}

impl MarketClientHttp {
    pub fn connect(endpoint: &str, store: TokenStore) -> Result<Self, MarketClientError> {
        let token = store.load()?;
        Ok(Self {
            client: Client::builder().build()?,
            base_url: endpoint.trim_end_matches('/').to_string(),
            store,
            token,
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn logout(&mut self) -> Result<(), MarketClientError> {
        self.token = None;
        self.store.clear()
    }

    fn set_token(&mut self, token: String) -> Result<(), MarketClientError> {
        self.store.save(&token)?;
        self.token = Some(token);
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> Result<RequestBuilder, MarketClientError> {
        let token = self.token.as_deref().ok_or(MarketClientError::NotLoggedIn)?;
        let header = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| MarketClientError::NotLoggedIn)?;
        Ok(req.header(AUTHORIZATION, header))
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T, MarketClientError> {
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(MarketClientError::from_http_response(resp).await)
        }
    }

    async fn authenticate(
        &mut self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<User, MarketClientError> {
        let resp = self.client.post(self.url(path)).json(&body).send().await?;
        let auth: AuthResponse = Self::parse(resp).await?;
        self.set_token(auth.token)?;
        Ok(auth.user)
    }
}

#[async_trait(?Send)]
impl MarketClient for MarketClientHttp {
    async fn register(
        &mut self,
        name: String,
        email: String,
        password: String,
    ) -> Result<User, MarketClientError> {
        self.authenticate(
            "/auth/register",
            serde_json::json!({ "name": name, "email": email, "password": password }),
        )
        .await
    }

    async fn login(&mut self, email: String, password: String) -> Result<User, MarketClientError> {
        self.authenticate(
            "/auth/login",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn me(&self) -> Result<User, MarketClientError> {
        let req = self.authorized(self.client.get(self.url("/auth/me")))?;
        let body: UserResponse = Self::parse(req.send().await?).await?;
        Ok(body.user)
    }

    async fn list_public(&self, search: &VehicleSearch) -> Result<VehiclePage, MarketClientError> {
        let resp = self
            .client
            .get(self.url("/vehicles/public"))
            .query(search)
            .send()
            .await?;
        Self::parse(resp).await
    }

    async fn get_public(&self, id: Uuid) -> Result<Vehicle, MarketClientError> {
        let resp = self
            .client
            .get(self.url(&format!("/vehicles/public/{}", id)))
            .send()
            .await?;
        let body: VehicleResponse = Self::parse(resp).await?;
        Ok(body.vehicle)
    }

    async fn list_owned(&self, search: &VehicleSearch) -> Result<VehiclePage, MarketClientError> {
        let req = self.authorized(self.client.get(self.url("/vehicles")).query(search))?;
        Self::parse(req.send().await?).await
    }

    async fn get_vehicle(&self, id: Uuid) -> Result<Vehicle, MarketClientError> {
        let req = self.authorized(self.client.get(self.url(&format!("/vehicles/{}", id))))?;
        let body: VehicleResponse = Self::parse(req.send().await?).await?;
        Ok(body.vehicle)
    }

    async fn create_vehicle(&self, input: &VehicleInput) -> Result<Vehicle, MarketClientError> {
        let req = self.authorized(self.client.post(self.url("/vehicles")).json(input))?;
        let body: VehicleResponse = Self::parse(req.send().await?).await?;
        Ok(body.vehicle)
    }

    async fn update_vehicle(
        &self,
        id: Uuid,
        changes: &VehicleInput,
    ) -> Result<Vehicle, MarketClientError> {
        let req = self.authorized(
            self.client
                .put(self.url(&format!("/vehicles/{}", id)))
                .json(changes),
        )?;
        let body: VehicleResponse = Self::parse(req.send().await?).await?;
        Ok(body.vehicle)
    }

    async fn delete_vehicle(&self, id: Uuid) -> Result<(), MarketClientError> {
        let req = self.authorized(self.client.delete(self.url(&format!("/vehicles/{}", id))))?;
        let resp = req.send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(MarketClientError::from_http_response(resp).await)
        }
    }

    async fn create_lead(&self, lead: &LeadInput) -> Result<LeadReceipt, MarketClientError> {
        let resp = self.client.post(self.url("/leads")).json(lead).send().await?;
        let body: LeadCreatedResponse = Self::parse(resp).await?;
        Ok(body.lead)
    }

    async fn list_leads(&self, search: &LeadSearch) -> Result<LeadPage, MarketClientError> {
        let req = self.authorized(self.client.get(self.url("/leads")).query(search))?;
        Self::parse(req.send().await?).await
    }

    async fn lead_stats(&self) -> Result<LeadStats, MarketClientError> {
        let req = self.authorized(self.client.get(self.url("/leads/stats")))?;
        let body: LeadStatsResponse = Self::parse(req.send().await?).await?;
        Ok(body.stats)
    }
}
