use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, LoginCmd};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use server::AuthConfig;

#[derive(Parser, Debug)]
#[command(name = "swapply_admin")]
#[command(about = "Admin utilities for Swapply (bootstrap users, boosts, tokens)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./swapply.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Boosts(Boosts),
    /// Mint a bearer token for local testing.
    Token(TokenArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    /// Identity provider subject the user signs in with.
    #[arg(long)]
    subject: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args, Debug)]
struct Boosts {
    #[command(subcommand)]
    command: BoostsCommand,
}

#[derive(Subcommand, Debug)]
enum BoostsCommand {
    /// Delete every boost that has expired.
    Sweep,
}

#[derive(Args, Debug)]
struct TokenArgs {
    #[arg(long)]
    subject: String,
    #[arg(long, env = "SWAPPLY__AUTH__SECRET")]
    secret: String,
    #[arg(long, env = "SWAPPLY__AUTH__ISSUER")]
    issuer: Option<String>,
    #[arg(long, env = "SWAPPLY__AUTH__AUDIENCE")]
    audience: Option<String>,
    /// Lifetime in seconds.
    #[arg(long, default_value_t = 3600)]
    ttl: u64,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let db = connect_db(&cli.database_url).await?;
            let engine = Engine::builder().database(db).build().await?;

            if engine.user_by_identity(&args.subject).await?.is_some() {
                eprintln!("user already exists: {}", args.subject);
                std::process::exit(1);
            }

            let mut cmd = LoginCmd::new(args.subject, args.email);
            if let Some(name) = args.name {
                cmd = cmd.name(name);
            }
            let user = engine.login(cmd).await?;
            println!("created user: {} ({})", user.email, user.id);
        }
        Command::Boosts(Boosts {
            command: BoostsCommand::Sweep,
        }) => {
            let db = connect_db(&cli.database_url).await?;
            let engine = Engine::builder().database(db).build().await?;
            let removed = engine.sweep_expired_boosts(chrono::Utc::now()).await?;
            println!("removed {removed} expired boost(s)");
        }
        Command::Token(args) => {
            let auth = AuthConfig {
                secret: args.secret,
                issuer: args.issuer,
                audience: args.audience,
            };
            println!("{}", auth.mint(&args.subject, args.ttl)?);
        }
    }

    Ok(())
}
