use std::borrow::Cow;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::error::DomainError;
use crate::domain::lead::{LeadFilter, LeadStats, LeadSummary, LeadWithVehicle, NewLead};
use crate::domain::pagination::{PageRequest, Paginated, Pagination};
use crate::domain::user::UserProfile;
use crate::domain::vehicle::{
    FUELS, NewVehicle, OwnerFilter, TRANSMISSIONS, VehicleChanges, VehicleFilter, VehicleStatus,
};
use crate::presentation::coerce::{
    Numeric, decimal_opt, integer_opt, query_decimal, query_integer, trimmed, trimmed_opt,
};

pub const VEHICLE_PAGE_SIZE: u32 = 12;
pub const LEAD_PAGE_SIZE: u32 = 20;

static PLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}[0-9][A-Z0-9][0-9]{2}$").expect("plate pattern compiles"));

/// Runs the derived validators and folds every failure into one 400 message.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), DomainError> {
    payload
        .validate()
        .map_err(|errors| DomainError::Validation(describe(&errors)))
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    messages.dedup();
    messages.join("; ")
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn required(field: &str) -> DomainError {
    DomainError::Validation(format!("{} is required", field))
}

// ======================= AUTH =======================

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100, message = "name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "email must be valid"))]
    pub email: String,
    #[validate(
        length(min = 6, max = 128, message = "password must be between 6 and 128 characters"),
        custom = "password_strength"
    )]
    pub password: String,
}

impl RegisterRequest {
    pub fn normalized(self) -> Self {
        Self {
            name: trimmed(self.name),
            email: trimmed(self.email),
            password: self.password,
        }
    }
}

fn password_strength(password: &str) -> Result<(), ValidationError> {
    let lower = password.chars().any(|c| c.is_ascii_lowercase());
    let upper = password.chars().any(|c| c.is_ascii_uppercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    if lower && upper && digit {
        Ok(())
    } else {
        Err(invalid(
            "password_strength",
            "password must contain a lowercase letter, an uppercase letter and a digit",
        ))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be valid"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ======================= VEHICLES =======================

/// Body of `POST /vehicles` and `PUT /vehicles/{id}`. Numbers may arrive as
/// JSON numbers or numeric strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleBody {
    pub title: Option<String>,
    pub price: Option<Numeric>,
    pub year: Option<Numeric>,
    pub mileage_km: Option<Numeric>,
    pub fuel: Option<String>,
    pub transmission: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub plate: Option<String>,
    pub status: Option<String>,
    pub images: Option<Vec<String>>,
}

/// Coerced vehicle fields. Absent fields skip validation.
#[derive(Debug, Default, Validate)]
struct VehicleForm {
    #[validate(length(min = 5, max = 200, message = "title must be between 5 and 200 characters"))]
    title: Option<String>,
    #[validate(custom = "positive_price")]
    price: Option<Decimal>,
    #[validate(custom = "model_year")]
    year: Option<i32>,
    #[validate(range(min = 0, max = 1000000, message = "mileageKm must be between 0 and 1000000"))]
    mileage_km: Option<i32>,
    #[validate(custom = "known_fuel")]
    fuel: Option<String>,
    #[validate(custom = "known_transmission")]
    transmission: Option<String>,
    #[validate(length(min = 2, max = 50, message = "color must be between 2 and 50 characters"))]
    color: Option<String>,
    #[validate(length(min = 5, max = 100, message = "location must be between 5 and 100 characters"))]
    location: Option<String>,
    #[validate(length(
        min = 10,
        max = 2000,
        message = "description must be between 10 and 2000 characters"
    ))]
    description: Option<String>,
    #[validate(regex(path = "PLATE_RE", message = "plate must look like ABC1234 or ABC1D23"))]
    plate: Option<String>,
    #[validate(
        length(max = 20, message = "a vehicle can have at most 20 images"),
        custom = "image_urls"
    )]
    images: Option<Vec<String>>,
}

/// Largest value a `NUMERIC(12, 2)` price column holds.
fn max_price() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

fn positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if !price.is_sign_positive() || price.is_zero() {
        return Err(invalid("price", "price must be a positive number"));
    }
    if price.normalize().scale() > 2 {
        return Err(invalid("price", "price must have at most 2 decimal places"));
    }
    if *price > max_price() {
        return Err(invalid("price", "price must be at most 9999999999.99"));
    }
    Ok(())
}

fn model_year(year: i32) -> Result<(), ValidationError> {
    let newest = Utc::now().year() + 1;
    if (1980..=newest).contains(&year) {
        Ok(())
    } else {
        Err(invalid("year", "year must be between 1980 and next year"))
    }
}

fn known_fuel(fuel: &str) -> Result<(), ValidationError> {
    if FUELS.contains(&fuel) {
        Ok(())
    } else {
        Err(invalid(
            "fuel",
            "fuel must be one of Gasolina, Álcool, Flex, Diesel, GNV, Híbrido, Elétrico",
        ))
    }
}

fn known_transmission(transmission: &str) -> Result<(), ValidationError> {
    if TRANSMISSIONS.contains(&transmission) {
        Ok(())
    } else {
        Err(invalid(
            "transmission",
            "transmission must be one of Manual, Automática, CVT, Automatizada",
        ))
    }
}

fn image_urls(urls: &[String]) -> Result<(), ValidationError> {
    if urls.iter().all(|u| (1..=2048).contains(&u.chars().count())) {
        Ok(())
    } else {
        Err(invalid(
            "images",
            "each image url must be between 1 and 2048 characters",
        ))
    }
}

fn parse_status(raw: &str) -> Result<VehicleStatus, DomainError> {
    match raw {
        "ACTIVE" => Ok(VehicleStatus::Active),
        "INACTIVE" => Ok(VehicleStatus::Inactive),
        "SOLD" => Ok(VehicleStatus::Sold),
        _ => Err(DomainError::Validation(
            "status must be ACTIVE, INACTIVE or SOLD".into(),
        )),
    }
}

impl VehicleBody {
    fn into_form(self) -> Result<(VehicleForm, Option<String>), DomainError> {
        let form = VehicleForm {
            title: trimmed_opt(self.title),
            price: decimal_opt(self.price.as_ref(), "price")?,
            year: integer_opt(self.year.as_ref(), "year")?,
            mileage_km: integer_opt(self.mileage_km.as_ref(), "mileageKm")?,
            fuel: trimmed_opt(self.fuel),
            transmission: trimmed_opt(self.transmission),
            color: trimmed_opt(self.color),
            location: trimmed_opt(self.location),
            description: trimmed_opt(self.description),
            plate: trimmed_opt(self.plate),
            images: self.images,
        };
        validate_payload(&form)?;
        Ok((form, trimmed_opt(self.status)))
    }

    /// Every descriptive field is mandatory on create; `status` is ignored.
    pub fn into_new_vehicle(self) -> Result<NewVehicle, DomainError> {
        let (form, _) = self.into_form()?;
        Ok(NewVehicle {
            title: form.title.ok_or_else(|| required("title"))?,
            price: form.price.ok_or_else(|| required("price"))?,
            year: form.year.ok_or_else(|| required("year"))?,
            mileage_km: form.mileage_km.ok_or_else(|| required("mileageKm"))?,
            fuel: form.fuel.ok_or_else(|| required("fuel"))?,
            transmission: form.transmission.ok_or_else(|| required("transmission"))?,
            color: form.color.ok_or_else(|| required("color"))?,
            location: form.location.ok_or_else(|| required("location"))?,
            description: form.description.ok_or_else(|| required("description"))?,
            plate: form.plate,
            images: form.images.unwrap_or_default(),
        })
    }

    pub fn into_changes(self) -> Result<VehicleChanges, DomainError> {
        let (form, status) = self.into_form()?;
        Ok(VehicleChanges {
            title: form.title,
            price: form.price,
            year: form.year,
            mileage_km: form.mileage_km,
            fuel: form.fuel,
            transmission: form.transmission,
            color: form.color,
            location: form.location,
            description: form.description,
            plate: form.plate,
            status: status.as_deref().map(parse_status).transpose()?,
            images: form.images,
        })
    }
}

/// Query string of both vehicle listings. The storefront ignores `status`
/// and `plate`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleQuery {
    pub search: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_year: Option<String>,
    pub max_year: Option<String>,
    pub fuel: Option<String>,
    pub transmission: Option<String>,
    pub status: Option<String>,
    pub plate: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl VehicleQuery {
    pub fn filter(&self) -> Result<VehicleFilter, DomainError> {
        Ok(VehicleFilter {
            search: trimmed_opt(self.search.clone()),
            min_price: query_decimal(self.min_price.as_deref(), "minPrice")?,
            max_price: query_decimal(self.max_price.as_deref(), "maxPrice")?,
            min_year: query_integer(self.min_year.as_deref(), "minYear")?,
            max_year: query_integer(self.max_year.as_deref(), "maxYear")?,
            fuel: trimmed_opt(self.fuel.clone()),
            transmission: trimmed_opt(self.transmission.clone()),
        })
    }

    pub fn owner_filter(&self) -> Result<OwnerFilter, DomainError> {
        Ok(OwnerFilter {
            base: self.filter()?,
            status: trimmed_opt(self.status.clone())
                .as_deref()
                .map(parse_status)
                .transpose()?,
            plate: trimmed_opt(self.plate.clone()),
        })
    }

    pub fn page(&self) -> Result<PageRequest, DomainError> {
        page_request(self.page.as_deref(), self.limit.as_deref(), VEHICLE_PAGE_SIZE)
    }
}

fn page_request(
    page: Option<&str>,
    limit: Option<&str>,
    default_limit: u32,
) -> Result<PageRequest, DomainError> {
    Ok(PageRequest::new(
        query_integer(page, "page")?,
        query_integer(limit, "limit")?,
        default_limit,
    ))
}

#[derive(Debug, Serialize)]
pub struct VehiclePage<T> {
    pub vehicles: Vec<T>,
    pub pagination: Pagination,
}

impl<T> From<Paginated<T>> for VehiclePage<T> {
    fn from(page: Paginated<T>) -> Self {
        let pagination = page.pagination();
        Self {
            vehicles: page.items,
            pagination,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VehicleResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub vehicle: T,
}

// ======================= LEADS =======================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadRequest {
    pub vehicle_id: String,
    #[validate(length(min = 2, max = 100, message = "clientName must be between 2 and 100 characters"))]
    pub client_name: Option<String>,
    #[validate(length(max = 50, message = "utmSource must be at most 50 characters"))]
    pub utm_source: Option<String>,
    #[validate(length(max = 50, message = "utmMedium must be at most 50 characters"))]
    pub utm_medium: Option<String>,
    #[validate(length(max = 50, message = "utmCampaign must be at most 50 characters"))]
    pub utm_campaign: Option<String>,
}

impl CreateLeadRequest {
    pub fn into_new_lead(self) -> Result<NewLead, DomainError> {
        let vehicle_id = Uuid::parse_str(self.vehicle_id.trim())
            .map_err(|_| DomainError::Validation("vehicleId must be a valid UUID".into()))?;
        let normalized = Self {
            vehicle_id: self.vehicle_id,
            client_name: trimmed_opt(self.client_name),
            utm_source: trimmed_opt(self.utm_source),
            utm_medium: trimmed_opt(self.utm_medium),
            utm_campaign: trimmed_opt(self.utm_campaign),
        };
        validate_payload(&normalized)?;

        Ok(NewLead {
            vehicle_id,
            client_name: normalized.client_name,
            utm_source: normalized.utm_source,
            utm_medium: normalized.utm_medium,
            utm_campaign: normalized.utm_campaign,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadQuery {
    pub vehicle_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Start,
    End,
}

/// RFC 3339 instants are taken as-is. A bare `YYYY-MM-DD` covers the whole
/// UTC day: midnight for a start bound, the last instant of the day for an end.
fn parse_date_bound(raw: &str, field: &str, bound: Bound) -> Result<DateTime<Utc>, DomainError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        DomainError::Validation(format!(
            "{} must be a date (YYYY-MM-DD) or an RFC 3339 timestamp",
            field
        ))
    })?;
    let (h, m, s, nano) = match bound {
        Bound::Start => (0, 0, 0, 0),
        Bound::End => (23, 59, 59, 999_999_999),
    };
    day.and_hms_nano_opt(h, m, s, nano)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| DomainError::Validation(format!("{} is out of range", field)))
}

impl LeadQuery {
    pub fn filter(&self) -> Result<LeadFilter, DomainError> {
        let vehicle_id = trimmed_opt(self.vehicle_id.clone())
            .map(|raw| {
                Uuid::parse_str(&raw)
                    .map_err(|_| DomainError::Validation("vehicleId must be a valid UUID".into()))
            })
            .transpose()?;
        let start = trimmed_opt(self.start_date.clone())
            .map(|raw| parse_date_bound(&raw, "startDate", Bound::Start))
            .transpose()?;
        let end = trimmed_opt(self.end_date.clone())
            .map(|raw| parse_date_bound(&raw, "endDate", Bound::End))
            .transpose()?;
        Ok(LeadFilter {
            vehicle_id,
            start,
            end,
        })
    }

    pub fn page(&self) -> Result<PageRequest, DomainError> {
        page_request(self.page.as_deref(), self.limit.as_deref(), LEAD_PAGE_SIZE)
    }
}

#[derive(Debug, Serialize)]
pub struct LeadCreatedResponse {
    pub message: &'static str,
    pub lead: LeadSummary,
}

#[derive(Debug, Serialize)]
pub struct LeadPage {
    pub leads: Vec<LeadWithVehicle>,
    pub pagination: Pagination,
}

impl From<Paginated<LeadWithVehicle>> for LeadPage {
    fn from(page: Paginated<LeadWithVehicle>) -> Self {
        let pagination = page.pagination();
        Self {
            leads: page.items,
            pagination,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeadStatsResponse {
    pub stats: LeadStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn body(value: serde_json::Value) -> VehicleBody {
        serde_json::from_value(value).unwrap()
    }

    fn complete() -> serde_json::Value {
        json!({
            "title": "  Honda Civic EXL  ",
            "price": "95000.00",
            "year": 2022,
            "mileageKm": "25000",
            "fuel": "Flex",
            "transmission": "CVT",
            "color": "Branco",
            "location": "Goiânia, GO",
            "description": "Único dono, todas as revisões na concessionária.",
            "plate": "ABC1D23",
            "images": ["https://cdn/1.jpg"]
        })
    }

    #[test]
    fn complete_body_becomes_new_vehicle_with_coerced_numbers() {
        let vehicle = body(complete()).into_new_vehicle().unwrap();
        assert_eq!(vehicle.title, "Honda Civic EXL");
        assert_eq!(vehicle.price, Decimal::new(95_000, 0));
        assert_eq!(vehicle.mileage_km, 25_000);
        assert_eq!(vehicle.images.len(), 1);
    }

    #[rstest]
    #[case("title", json!("Gol"), "title must be between 5 and 200 characters")]
    #[case("price", json!(0), "price must be a positive number")]
    #[case("price", json!("-10"), "price must be a positive number")]
    #[case("price", json!("0.001"), "price must have at most 2 decimal places")]
    #[case("price", json!(0.005), "price must have at most 2 decimal places")]
    #[case("price", json!("10000000000000"), "price must be at most 9999999999.99")]
    #[case("price", json!("10000000000.00"), "price must be at most 9999999999.99")]
    #[case("year", json!(1975), "year must be between 1980 and next year")]
    #[case("mileageKm", json!(2_000_000), "mileageKm must be between 0 and 1000000")]
    #[case("fuel", json!("Carvão"), "fuel must be one of Gasolina, Álcool, Flex, Diesel, GNV, Híbrido, Elétrico")]
    #[case("transmission", json!("Sequencial"), "transmission must be one of Manual, Automática, CVT, Automatizada")]
    #[case("plate", json!("abc1234"), "plate must look like ABC1234 or ABC1D23")]
    #[case("year", json!("dois mil"), "year: must be an integer")]
    fn invalid_fields_are_rejected(
        #[case] field: &str,
        #[case] value: serde_json::Value,
        #[case] message: &str,
    ) {
        let mut raw = complete();
        raw[field] = value;
        let err = body(raw).into_new_vehicle().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), message);
    }

    #[rstest]
    #[case(json!("9999999999.99"), Decimal::new(999_999_999_999, 2))]
    #[case(json!("95000.000"), Decimal::new(95_000, 0))]
    #[case(json!(0.01), Decimal::new(1, 2))]
    fn prices_that_fit_the_column_are_accepted(
        #[case] value: serde_json::Value,
        #[case] expected: Decimal,
    ) {
        let mut raw = complete();
        raw["price"] = value;
        let vehicle = body(raw).into_new_vehicle().unwrap();
        assert_eq!(vehicle.price, expected);
    }

    #[test]
    fn sub_cent_price_is_rejected_on_update_too() {
        let err = body(json!({ "price": "123.456" })).into_changes().unwrap_err();
        assert_eq!(err.to_string(), "price must have at most 2 decimal places");
    }

    #[test]
    fn missing_required_field_is_reported_by_name() {
        let mut raw = complete();
        raw.as_object_mut().unwrap().remove("color");
        let err = body(raw).into_new_vehicle().unwrap_err();
        assert_eq!(err.to_string(), "color is required");
    }

    #[test]
    fn too_many_images_are_rejected() {
        let mut raw = complete();
        raw["images"] = json!(vec!["https://cdn/x.jpg"; 21]);
        assert!(body(raw).into_new_vehicle().is_err());
    }

    #[test]
    fn partial_update_validates_only_present_fields() {
        let changes = body(json!({ "price": 80000, "status": "SOLD" }))
            .into_changes()
            .unwrap();
        assert_eq!(changes.price, Some(Decimal::new(80_000, 0)));
        assert_eq!(changes.status, Some(VehicleStatus::Sold));
        assert!(changes.title.is_none());

        let err = body(json!({ "status": "ARCHIVED" })).into_changes().unwrap_err();
        assert_eq!(err.to_string(), "status must be ACTIVE, INACTIVE or SOLD");
    }

    #[rstest]
    #[case("Secret123", true)]
    #[case("secret123", false)]
    #[case("SECRET123", false)]
    #[case("SecretOnly", false)]
    #[case("Ab1", false)]
    fn register_password_rules(#[case] password: &str, #[case] valid: bool) {
        let request = RegisterRequest {
            name: "Maria".into(),
            email: "maria@example.com".into(),
            password: password.into(),
        };
        assert_eq!(validate_payload(&request).is_ok(), valid);
    }

    #[test]
    fn lead_request_trims_and_validates() {
        let id = Uuid::new_v4();
        let lead = CreateLeadRequest {
            vehicle_id: id.to_string(),
            client_name: Some("  Ana ".into()),
            utm_source: Some("".into()),
            utm_medium: None,
            utm_campaign: Some("x".repeat(50)),
        }
        .into_new_lead()
        .unwrap();
        assert_eq!(lead.vehicle_id, id);
        assert_eq!(lead.client_name.as_deref(), Some("Ana"));
        assert!(lead.utm_source.is_none());

        let err = CreateLeadRequest {
            vehicle_id: "not-a-uuid".into(),
            client_name: None,
            utm_source: None,
            utm_medium: None,
            utm_campaign: None,
        }
        .into_new_lead()
        .unwrap_err();
        assert_eq!(err.to_string(), "vehicleId must be a valid UUID");
    }

    #[test]
    fn bare_end_date_covers_the_whole_day() {
        let query = LeadQuery {
            start_date: Some("2024-03-01".into()),
            end_date: Some("2024-03-31".into()),
            ..Default::default()
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.start.unwrap().to_rfc3339(), "2024-03-01T00:00:00+00:00");
        let end = filter.end.unwrap();
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert!(end > "2024-03-31T23:59:59Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn rfc3339_bounds_and_bad_dates() {
        let query = LeadQuery {
            start_date: Some("2024-03-01T12:00:00-03:00".into()),
            ..Default::default()
        };
        assert_eq!(
            query.filter().unwrap().start.unwrap().to_rfc3339(),
            "2024-03-01T15:00:00+00:00"
        );

        let bad = LeadQuery {
            end_date: Some("yesterday".into()),
            ..Default::default()
        };
        assert!(matches!(bad.filter(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn vehicle_query_defaults_and_parses_filters() {
        let query = VehicleQuery {
            min_price: Some("50000".into()),
            max_year: Some("2022".into()),
            status: Some("INACTIVE".into()),
            limit: Some("500".into()),
            ..Default::default()
        };
        let owner = query.owner_filter().unwrap();
        assert_eq!(owner.base.min_price, Some(Decimal::new(50_000, 0)));
        assert_eq!(owner.base.max_year, Some(2022));
        assert_eq!(owner.status, Some(VehicleStatus::Inactive));

        let page = query.page().unwrap();
        assert_eq!((page.page, page.limit), (1, 100));
        assert_eq!(VehicleQuery::default().page().unwrap().limit, VEHICLE_PAGE_SIZE);
        assert_eq!(LeadQuery::default().page().unwrap().limit, LEAD_PAGE_SIZE);
    }
}
