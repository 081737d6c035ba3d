//! Administrative CLI: schema migration, staff bootstrap and threshold
//! table checks, run against the same database as the server.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rusqlite::Connection;

use vitalmape_lib::config::Settings;
use vitalmape_lib::models::{Estamento, NuevoUsuario};
use vitalmape_lib::scoring::ScoringTables;
use vitalmape_lib::{db, init_tracing, registro};

const ENV_ADMIN_PASSWORD: &str = "VITALMAPE_ADMIN_PASSWORD";

#[derive(Parser, Debug)]
#[command(name = "vitalmape-admin")]
#[command(version)]
#[command(about = "VitalMape UTI administration")]
struct CliArgs {
    /// Database file (overrides VITALMAPE_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: AdminCommand,
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Open the database and apply pending migrations
    Migrate,
    /// Register a staff user; the password is read from VITALMAPE_ADMIN_PASSWORD
    CrearUsuario {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        estamento: Estamento,
    },
    /// List registered staff users
    ListarUsuarios,
    /// Build and validate every threshold table
    VerificarTablas,
}

fn main() -> ExitCode {
    init_tracing();
    let args = CliArgs::parse();
    match execute(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("vitalmape-admin: {e}");
            ExitCode::FAILURE
        }
    }
}

fn open(db_override: Option<PathBuf>) -> Result<(Connection, PathBuf, Settings), Box<dyn Error>> {
    let settings = Settings::from_env()?;
    let db_path = db_override.unwrap_or_else(|| settings.db_path.clone());
    let conn = db::open_database(&db_path)?;
    Ok((conn, db_path, settings))
}

fn execute(args: CliArgs) -> Result<(), Box<dyn Error>> {
    let CliArgs { db: db_override, command } = args;
    match command {
        AdminCommand::VerificarTablas => {
            let tables = ScoringTables::standard()?;
            for (name, bands) in tables.summary() {
                println!("{name:<28} {bands:>3} bands");
            }
            println!("All threshold tables are valid.");
        }
        AdminCommand::Migrate => {
            let (conn, db_path, _) = open(db_override)?;
            println!(
                "{} at schema version {}",
                db_path.display(),
                db::get_current_version(&conn)
            );
        }
        AdminCommand::CrearUsuario {
            nombre,
            email,
            estamento,
        } => {
            let password = std::env::var(ENV_ADMIN_PASSWORD)
                .map_err(|_| format!("{ENV_ADMIN_PASSWORD} must be set"))?;
            let (conn, _, settings) = open(db_override)?;
            let nuevo = NuevoUsuario {
                nombre,
                email,
                estamento,
                password,
            };
            let usuario = registro::registrar_usuario(&conn, nuevo, settings.pbkdf2_iterations)?;
            println!("{} {} ({})", usuario.id, usuario.email, usuario.estamento.as_str());
        }
        AdminCommand::ListarUsuarios => {
            let (conn, _, _) = open(db_override)?;
            for u in db::list_usuarios(&conn)? {
                println!("{}  {:<13} {:<30} {}", u.id, u.estamento.as_str(), u.email, u.nombre);
            }
        }
    }
    Ok(())
}
