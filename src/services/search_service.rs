use sea_orm::{Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;

use crate::{
    dto::{cars::CarList, clients::ClientList, search::GlobalSearchResult},
    entity::{
        cars::{Column as CarCol, Entity as Cars},
        clients::{Column as ClientCol, Entity as Clients},
    },
    error::AppResult,
    models::{Car, Client},
    response::ApiResponse,
    routes::params::{CarQuery, ClientQuery, SearchQuery},
    services::{car_service, client_service, contains_pattern},
    state::AppState,
};

/// Car search shares the list filters, including the availability window.
pub async fn search_cars(state: &AppState, query: CarQuery) -> AppResult<ApiResponse<CarList>> {
    car_service::list_cars(state, query).await
}

pub async fn search_clients(
    state: &AppState,
    query: ClientQuery,
) -> AppResult<ApiResponse<ClientList>> {
    client_service::list_clients(state, query).await
}

pub async fn global_search(
    state: &AppState,
    query: SearchQuery,
) -> AppResult<ApiResponse<GlobalSearchResult>> {
    let term = query.q.as_deref().map(str::trim).unwrap_or("");
    if term.is_empty() {
        return Ok(ApiResponse::ok(
            "Search",
            GlobalSearchResult {
                cars: Vec::new(),
                clients: Vec::new(),
            },
        ));
    }
    let limit = query.limit() as u64;
    let pattern = contains_pattern(term);

    let cars = Cars::find()
        .filter(
            Condition::any()
                .add(Expr::col(CarCol::Brand).ilike(pattern.clone()))
                .add(Expr::col(CarCol::Model).ilike(pattern.clone()))
                .add(Expr::col(CarCol::BodyType).ilike(pattern)),
        )
        .order_by_asc(CarCol::Brand)
        .limit(limit)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Car::from)
        .collect();

    let clients = Clients::find()
        .filter(client_service::client_search_condition(term))
        .order_by_asc(ClientCol::FullName)
        .limit(limit)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Client::from)
        .collect();

    Ok(ApiResponse::ok("Search", GlobalSearchResult { cars, clients }))
}
