use actix_web::{web, App, HttpServer};
use tracing::{info, Level};

mod config;
mod database;
mod error;
mod handlers;
mod models;
mod services;
mod utils;

use config::AppConfig;
use database::{Database, DatabaseConfig, DocumentStore};
use error::AppError;
use services::{
    BillingService, ContractService, CustomerService, ReferenceChecker, ReportService,
    VehicleService,
};

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    info!(
        "Starting EasyLoc back-office API on {}:{}",
        config.host, config.port
    );

    // Relational store: contracts and billings
    let database = Database::new(&DatabaseConfig::new(&config.database_url)).await?;
    database.migrate().await?;
    info!("Relational store ready, migrations applied");

    // Document store: customers and vehicles
    let documents =
        DocumentStore::connect(&config.document_store_url, &config.document_store_name).await?;

    // Initialize services
    let references = ReferenceChecker::new(documents.handle().clone(), database.pool().clone());
    let customer_service = CustomerService::new(documents.handle().clone(), references.clone());
    let vehicle_service = VehicleService::new(documents.handle().clone(), references.clone());
    let contract_service = ContractService::new(database.pool().clone(), references.clone());
    let billing_service = BillingService::new(database.pool().clone(), references);
    let report_service = ReportService::new(database.pool().clone());

    // Start HTTP server
    let (host, port) = (config.host.clone(), config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(customer_service.clone()))
            .app_data(web::Data::new(vehicle_service.clone()))
            .app_data(web::Data::new(contract_service.clone()))
            .app_data(web::Data::new(billing_service.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::Validation(err.to_string()).into()
            }))
            .service(
                web::scope("/api")
                    .service(handlers::health::health_check)
                    .service(
                        web::scope("/customers")
                            .route("", web::get().to(handlers::customers::list_customers))
                            .route("", web::post().to(handlers::customers::create_customer))
                            .route(
                                "/{last_name}/{first_name}",
                                web::get().to(handlers::customers::get_customer_by_name),
                            )
                            .route("/{id}", web::patch().to(handlers::customers::update_customer))
                            .route("/{id}", web::delete().to(handlers::customers::delete_customer)),
                    )
                    .service(
                        web::scope("/vehicles")
                            .route("", web::get().to(handlers::vehicles::list_vehicles))
                            .route("", web::post().to(handlers::vehicles::create_vehicle))
                            .route(
                                "/{licence_plate}",
                                web::get().to(handlers::vehicles::get_vehicle_by_plate),
                            )
                            .route("/{id}", web::patch().to(handlers::vehicles::update_vehicle))
                            .route("/{id}", web::delete().to(handlers::vehicles::delete_vehicle)),
                    )
                    .service(
                        web::scope("/contracts")
                            .route("", web::get().to(handlers::contracts::list_contracts))
                            .route("", web::post().to(handlers::contracts::create_contract))
                            .route(
                                "/search/queryparams",
                                web::get().to(handlers::contracts::search_contracts),
                            )
                            .route(
                                "/search/delays",
                                web::get().to(handlers::contracts::count_late_in_window),
                            )
                            .route(
                                "/search/groupby/customer",
                                web::get().to(handlers::contracts::count_by_customer),
                            )
                            .route(
                                "/search/groupby/vehicle",
                                web::get().to(handlers::contracts::count_by_vehicle),
                            )
                            .route(
                                "/search/groupby/delay/customer",
                                web::get().to(handlers::contracts::average_delay_by_customer),
                            )
                            .route(
                                "/search/groupby/delay/vehicle",
                                web::get().to(handlers::contracts::average_delay_by_vehicle),
                            )
                            .route("/{id}", web::get().to(handlers::contracts::get_contract))
                            .route("/{id}", web::patch().to(handlers::contracts::update_contract))
                            .route("/{id}", web::delete().to(handlers::contracts::delete_contract)),
                    )
                    .service(
                        web::scope("/billings")
                            .route("", web::get().to(handlers::billings::list_billings))
                            .route("", web::post().to(handlers::billings::create_billing))
                            .route(
                                "/search/queryparams",
                                web::get().to(handlers::billings::search_billings),
                            )
                            .route(
                                "/search/groupby/contract",
                                web::get().to(handlers::billings::settlements_by_contract),
                            )
                            .route("/{id}", web::get().to(handlers::billings::get_billing))
                            .route("/{id}", web::patch().to(handlers::billings::update_billing))
                            .route("/{id}", web::delete().to(handlers::billings::delete_billing)),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
    .map_err(AppError::from)
}
