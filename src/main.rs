use std::fs::File;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tracing::info;

use job_agent::agent::{
    application_router, discovery_router, import_listings, ApplicationLifecycleService,
    JobDiscoveryService, LifecycleConfig, MemoryApplicationStore, MemoryListingStore,
    MemoryProfileStore, MemorySavedSearchStore, NewListing, NoopSubmitter, Profile, ProfileId,
    ProfileStore, ScriptedGateway, Skill,
};
use job_agent::config::AppConfig;
use job_agent::error::AppError;
use job_agent::telemetry;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Personal Job Agent",
    about = "Run the job matching and application tracking engine from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk through search, recommendation, and application tracking on
    /// seeded in-memory data
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug, Default)]
struct DemoArgs {
    /// Optional listing CSV export to ingest before the walkthrough
    #[arg(long)]
    listings_csv: Option<PathBuf>,
}

type Discovery =
    JobDiscoveryService<MemoryListingStore, MemoryProfileStore, MemorySavedSearchStore>;
type Lifecycle =
    ApplicationLifecycleService<MemoryApplicationStore, MemoryProfileStore, MemoryListingStore>;

struct Engine {
    discovery: Arc<Discovery>,
    lifecycle: Arc<Lifecycle>,
    profiles: Arc<MemoryProfileStore>,
}

fn build_engine(lifecycle_config: LifecycleConfig) -> Engine {
    let listings = Arc::new(MemoryListingStore::default());
    let profiles = Arc::new(MemoryProfileStore::default());
    let searches = Arc::new(MemorySavedSearchStore::default());
    let applications = Arc::new(MemoryApplicationStore::default());
    let gateway = Arc::new(ScriptedGateway);

    let discovery = Arc::new(JobDiscoveryService::new(
        listings.clone(),
        profiles.clone(),
        searches,
    ));
    let lifecycle = Arc::new(ApplicationLifecycleService::new(
        applications,
        profiles.clone(),
        listings,
        gateway,
        Arc::new(NoopSubmitter),
        lifecycle_config,
    ));

    Engine {
        discovery,
        lifecycle,
        profiles,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Demo(args) => run_demo(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let engine = build_engine(config.engine.lifecycle());

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(discovery_router(engine.discovery))
        .merge(application_router(engine.lifecycle))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job agent ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = build_engine(config.engine.lifecycle());

    if let Some(path) = &args.listings_csv {
        let file = File::open(path)?;
        let summary = import_listings(engine.discovery.as_ref(), file)?;
        println!(
            "Imported {} listings ({} duplicates skipped) from {}",
            summary.inserted,
            summary.skipped_duplicates,
            path.display()
        );
    }
    seed_demo_listings(&engine);
    let profile = seed_demo_profile(&engine)?;

    println!("Job agent demo");
    println!(
        "Profile: {} {} ({} skills)",
        profile.first_name,
        profile.last_name,
        profile.skills.len()
    );

    let recommended = engine
        .discovery
        .recommended(profile.id, 10)
        .map_err(discovery_to_io)?;
    println!("\nRecommended listings");
    for listing in &recommended {
        let posted = listing
            .posted_at
            .map(|date| date.to_string())
            .unwrap_or_else(|| "undated".to_string());
        println!("- [{}] {} at {} (posted {posted})", listing.id, listing.title, listing.company);
    }

    let Some(target) = recommended.first() else {
        println!("\nNo recommendations; nothing to apply to.");
        return Ok(());
    };

    let application = engine
        .lifecycle
        .create(profile.id, target.id, None, None, Some("sent via referral"))
        .map_err(lifecycle_to_io)?;
    engine
        .lifecycle
        .update_status(application.id, "Interview", Some("scheduled for Tuesday"))
        .map_err(lifecycle_to_io)?;
    let letter = engine
        .lifecycle
        .generate_cover_letter(profile.id, target.id)
        .map_err(lifecycle_to_io)?;

    println!("\nApplied to '{}'; cover letter v{} generated", target.title, letter.version);

    let stats = engine
        .lifecycle
        .statistics(profile.id)
        .map_err(lifecycle_to_io)?;
    println!("\nApplication statistics");
    println!("- total: {}", stats.total);
    println!("- pending: {}", stats.pending);
    println!("- interviews: {}", stats.interviews);
    println!("- offers: {}", stats.offers);
    println!("- rejected: {}", stats.rejected);
    for (status, count) in &stats.by_status {
        println!("  {status}: {count}");
    }

    Ok(())
}

// Demo-only mapping; the engine errors never escape the library otherwise.
fn discovery_to_io(err: job_agent::agent::DiscoveryError) -> AppError {
    AppError::Io(std::io::Error::other(err.to_string()))
}

fn lifecycle_to_io(err: job_agent::agent::LifecycleError) -> AppError {
    AppError::Io(std::io::Error::other(err.to_string()))
}

fn seed_demo_listings(engine: &Engine) {
    let drafts = [
        NewListing {
            title: "Platform Engineer".to_string(),
            company: "Harbor Systems".to_string(),
            location: "Remote".to_string(),
            description: "Build and run Docker-based deployment tooling.".to_string(),
            job_type: "Full-time".to_string(),
            salary_min: Some(120_000),
            salary_max: Some(150_000),
            source: None,
            url: None,
            posted_at: NaiveDate::from_ymd_opt(2024, 1, 5),
            closes_at: None,
            active: true,
        },
        NewListing {
            title: "Full-Stack Developer".to_string(),
            company: "Brightline".to_string(),
            location: "Des Moines, IA".to_string(),
            description: "React front end, Docker-packaged services.".to_string(),
            job_type: "Full-time".to_string(),
            salary_min: Some(110_000),
            salary_max: Some(140_000),
            source: None,
            url: None,
            posted_at: NaiveDate::from_ymd_opt(2024, 1, 10),
            closes_at: None,
            active: true,
        },
        NewListing {
            title: "Accountant".to_string(),
            company: "Ledgerworks".to_string(),
            location: "Chicago, IL".to_string(),
            description: "Quarterly reporting and reconciliation.".to_string(),
            job_type: "Full-time".to_string(),
            salary_min: None,
            salary_max: None,
            source: None,
            url: None,
            posted_at: NaiveDate::from_ymd_opt(2024, 1, 20),
            closes_at: None,
            active: true,
        },
    ];
    for draft in drafts {
        // Seed data has no external source, so duplicates are impossible.
        let _ = engine.discovery.save_listing(draft);
    }
}

fn seed_demo_profile(engine: &Engine) -> Result<Profile, AppError> {
    let profile = Profile {
        id: ProfileId(0),
        first_name: "Jordan".to_string(),
        last_name: "Avery".to_string(),
        email: "jordan.avery@example.com".to_string(),
        phone: "(555) 010-7788".to_string(),
        location: "Des Moines, IA".to_string(),
        summary: "Engineer focused on containerized delivery.".to_string(),
        last_updated: chrono::Utc::now(),
        skills: vec![
            Skill {
                name: "Docker".to_string(),
                category: "Infrastructure".to_string(),
                proficiency: 5,
                years_experience: 4.0,
                highlighted: true,
            },
            Skill {
                name: "React".to_string(),
                category: "Front end".to_string(),
                proficiency: 4,
                years_experience: 3.0,
                highlighted: false,
            },
        ],
        experience: Vec::new(),
        education: Vec::new(),
        credentials: Vec::new(),
    };
    engine
        .profiles
        .add(profile)
        .map_err(|err| AppError::Io(std::io::Error::other(err.to_string())))
}
