mod config;
mod http;
mod telemetry;

use std::sync::Arc;

use anyhow::Context;
use api::{
    auth::issue_token,
    schema::{AppSchema, build_schema},
    service,
};
use clap::{Parser, Subcommand, ValueEnum};
use config::{AppConfig, ServeConfig};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::info;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "telecom-crm", version, about = "Telecom sales CRM server")]
struct Cli {
    #[command(flatten)]
    config: AppConfig,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run the HTTP server (applies pending migrations first)
    Serve(ServeConfig),
    /// Run migrations
    Migrate {
        #[arg(value_enum, default_value_t = MigrateAction::Up)]
        action: MigrateAction,
    },
    /// Seed demo data
    Seed,
    /// Print GraphQL SDL
    PrintSchema,
    /// Issue a session token for an existing user
    IssueToken {
        #[arg(long)]
        user: Uuid,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MigrateAction {
    Up,
    Down,
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    telemetry::init_tracing(&cli.config.telemetry)?;

    let db = Arc::new(
        Database::connect(&cli.config.database_url)
            .await
            .context("failed to connect to the database")?,
    );
    let auth = Arc::new(cli.config.auth());

    match cli.cmd {
        Cmd::Migrate { action } => migrate(db.as_ref(), action).await,
        Cmd::Seed => {
            let seeded = service::seed_demo(db.as_ref())
                .await
                .context("seeding failed")?;
            for profile in &seeded.profiles {
                println!("{}\t{}", profile.id, profile.email);
            }
            info!(
                proposals = seeded.proposals.len(),
                companies = seeded.companies.len(),
                "demo data seeded"
            );
            Ok(())
        }
        Cmd::PrintSchema => {
            let AppSchema(schema) = build_schema(db, auth);
            println!("{}", schema.sdl());
            Ok(())
        }
        Cmd::IssueToken { user } => {
            let actor = service::load_actor(db.as_ref(), user)
                .await
                .with_context(|| format!("no usable profile for {user}"))?;
            let token = issue_token(&actor, &auth).context("failed to sign token")?;
            println!("{token}");
            Ok(())
        }
        Cmd::Serve(serve) => {
            Migrator::up(db.as_ref(), None)
                .await
                .context("failed to apply migrations")?;
            let AppSchema(schema) = build_schema(db.clone(), auth.clone());
            let state = http::AppState {
                schema,
                db,
                auth,
                cors_allowed_origins: Arc::new(cli.config.cors_origins()),
            };
            http::serve(serve.bind, state).await
        }
    }
}

async fn migrate(db: &DatabaseConnection, action: MigrateAction) -> anyhow::Result<()> {
    match action {
        MigrateAction::Up => Migrator::up(db, None).await,
        MigrateAction::Down => Migrator::down(db, None).await,
        MigrateAction::Reset => Migrator::reset(db).await,
    }
    .with_context(|| format!("migrate {action:?} failed"))?;
    info!(?action, "migrations finished");
    Ok(())
}
