use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        analytics::{AnalyticsSummary, FleetStatusCounts, PopularCar, PopularCarList, RevenuePoint, RevenueSeries},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cars::{BookedPeriods, CarList, CreateCarRequest, UpdateCarRequest, UpdateCarStatusRequest},
        clients::{ClientList, ClientWithRentals, CreateClientRequest, UpdateClientRequest},
        penalties::{CreatePenaltyRequest, PenaltyList},
        rentals::{
            CompleteRentalRequest, CreateRentalRequest, QuoteRequest, QuoteResponse, RentalDetail,
            RentalList, UpdateRentalRequest,
        },
        reports::{ClientReport, ClientReportRow, FleetReport, FleetReportRow, RentalReport, RentalReportRow},
        search::GlobalSearchResult,
        upload::{ImageUploadForm, UploadList, UploadedFile},
        users::{CreateUserRequest, UpdateUserRequest, UserList},
    },
    models::{Car, CarStatus, CarType, Client, Penalty, Rental, RentalStatus, Role, User},
    pricing::{CostBreakdown, DateRange},
    response::{ApiResponse, Meta},
    routes::{analytics, auth, cars, clients, health, penalties, rentals, reports, search, upload, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        auth::register,
        auth::login,
        auth::me,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        cars::list_cars,
        cars::get_car,
        cars::create_car,
        cars::update_car,
        cars::update_car_status,
        cars::delete_car,
        cars::booked_periods,
        clients::list_clients,
        clients::get_client,
        clients::client_rentals,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        rentals::list_rentals,
        rentals::quote,
        rentals::get_rental,
        rentals::create_rental,
        rentals::update_rental,
        rentals::complete_rental,
        rentals::cancel_rental,
        rentals::delete_rental,
        penalties::list_penalties,
        penalties::get_penalty,
        penalties::create_penalty,
        penalties::delete_penalty,
        analytics::summary,
        analytics::revenue,
        analytics::popular_cars,
        reports::rentals_report,
        reports::fleet_report,
        reports::clients_report,
        search::global_search,
        search::search_cars,
        search::search_clients,
        upload::upload_image,
        upload::upload_car_images
    ),
    components(
        schemas(
            Role,
            CarType,
            CarStatus,
            RentalStatus,
            User,
            Car,
            Client,
            Rental,
            Penalty,
            DateRange,
            CostBreakdown,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateUserRequest,
            UpdateUserRequest,
            UserList,
            CreateCarRequest,
            UpdateCarRequest,
            UpdateCarStatusRequest,
            CarList,
            BookedPeriods,
            CreateClientRequest,
            UpdateClientRequest,
            ClientList,
            ClientWithRentals,
            CreateRentalRequest,
            UpdateRentalRequest,
            QuoteRequest,
            QuoteResponse,
            CompleteRentalRequest,
            RentalList,
            RentalDetail,
            CreatePenaltyRequest,
            PenaltyList,
            AnalyticsSummary,
            FleetStatusCounts,
            RevenuePoint,
            RevenueSeries,
            PopularCar,
            PopularCarList,
            RentalReport,
            RentalReportRow,
            FleetReport,
            FleetReportRow,
            ClientReport,
            ClientReportRow,
            GlobalSearchResult,
            UploadedFile,
            UploadList,
            ImageUploadForm,
            Meta,
            ApiResponse<Car>,
            ApiResponse<Rental>,
            ApiResponse<CarList>,
            ApiResponse<RentalList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Auth", description = "Registration, login and current user"),
        (name = "Users", description = "Staff account management"),
        (name = "Cars", description = "Fleet management"),
        (name = "Clients", description = "Client records"),
        (name = "Rentals", description = "Bookings, returns and cancellations"),
        (name = "Penalties", description = "Charges attached to rentals"),
        (name = "Analytics", description = "Dashboard figures"),
        (name = "Reports", description = "Period reports"),
        (name = "Search", description = "Search across cars and clients"),
        (name = "Upload", description = "Car image uploads"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
