use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use mall_auth_types::identity::AuthUser;
use mall_domain::id::{AddressId, UserId};

use crate::domain::types::{Address, AddressFields};
use crate::error::UsersServiceError;
use crate::state::AppState;
use crate::usecase::address::{
    CreateAddressUseCase, DeleteAddressUseCase, ListAddressesUseCase, RenameAddressUseCase,
    SetDefaultAddressUseCase, UpdateAddressUseCase,
};

use super::MessageResponse;
use super::extract::{ApiJson, ApiPath};

#[derive(Deserialize)]
pub struct AddressRequest {
    /// Defaults to the receiver name.
    pub title: Option<String>,
    pub receiver: String,
    pub province_id: i32,
    pub city_id: i32,
    pub district_id: i32,
    pub place: String,
    pub mobile: String,
    pub tel: Option<String>,
    pub email: Option<String>,
}

impl From<AddressRequest> for AddressFields {
    fn from(req: AddressRequest) -> Self {
        let blank_to_none = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            title: req.title.unwrap_or_else(|| req.receiver.clone()),
            receiver: req.receiver,
            province_id: req.province_id,
            city_id: req.city_id,
            district_id: req.district_id,
            place: req.place,
            mobile: req.mobile,
            tel: blank_to_none(req.tel),
            email: blank_to_none(req.email),
        }
    }
}

#[derive(Serialize)]
pub struct AddressResponse {
    pub id: AddressId,
    pub title: String,
    pub receiver: String,
    pub province_id: i32,
    pub city_id: i32,
    pub district_id: i32,
    pub place: String,
    pub mobile: String,
    pub tel: Option<String>,
    pub email: Option<String>,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        let f = address.fields;
        Self {
            id: address.id,
            title: f.title,
            receiver: f.receiver,
            province_id: f.province_id,
            city_id: f.city_id,
            district_id: f.district_id,
            place: f.place,
            mobile: f.mobile,
            tel: f.tel,
            email: f.email,
        }
    }
}

// ── GET /addresses/ ──────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AddressBookResponse {
    pub user_id: UserId,
    pub default_address_id: Option<AddressId>,
    pub limit: u64,
    pub addresses: Vec<AddressResponse>,
}

pub async fn list_addresses(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AddressBookResponse>, UsersServiceError> {
    let usecase = ListAddressesUseCase {
        users: state.user_repo(),
        addresses: state.address_repo(),
    };
    let book = usecase
        .execute(auth.user_id, state.settings.address_limit)
        .await?;
    Ok(Json(AddressBookResponse {
        user_id: book.user_id,
        default_address_id: book.default_address_id,
        limit: book.limit,
        addresses: book.addresses.into_iter().map(AddressResponse::from).collect(),
    }))
}

// ── POST /addresses/ ─────────────────────────────────────────────────────────

pub async fn create_address(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AddressRequest>,
) -> Result<impl IntoResponse, UsersServiceError> {
    let usecase = CreateAddressUseCase {
        repo: state.address_repo(),
    };
    let address = usecase
        .execute(auth.user_id, body.into(), state.settings.address_limit)
        .await?;
    Ok((StatusCode::CREATED, Json(AddressResponse::from(address))))
}

// ── PUT /addresses/{id}/ ─────────────────────────────────────────────────────

pub async fn update_address(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<AddressRequest>,
) -> Result<Json<AddressResponse>, UsersServiceError> {
    let usecase = UpdateAddressUseCase {
        repo: state.address_repo(),
    };
    let address = usecase
        .execute(auth.user_id, AddressId(id), body.into())
        .await?;
    Ok(Json(address.into()))
}

// ── DELETE /addresses/{id}/ ──────────────────────────────────────────────────

pub async fn delete_address(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, UsersServiceError> {
    let usecase = DeleteAddressUseCase {
        repo: state.address_repo(),
    };
    usecase.execute(auth.user_id, AddressId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PUT /addresses/{id}/status/ ──────────────────────────────────────────────

pub async fn set_default_address(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, UsersServiceError> {
    let usecase = SetDefaultAddressUseCase {
        repo: state.address_repo(),
    };
    usecase.execute(auth.user_id, AddressId(id)).await?;
    Ok(Json(MessageResponse::ok()))
}

// ── PUT /addresses/{id}/title/ ───────────────────────────────────────────────

#[derive(Deserialize, Serialize)]
pub struct TitleRequest {
    pub title: String,
}

pub async fn rename_address(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<TitleRequest>,
) -> Result<Json<TitleRequest>, UsersServiceError> {
    let usecase = RenameAddressUseCase {
        repo: state.address_repo(),
    };
    let title = usecase
        .execute(auth.user_id, AddressId(id), &body.title)
        .await?;
    Ok(Json(TitleRequest { title }))
}
