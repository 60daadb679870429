//! Set (or reset) the admin password directly in the database.
//!
//!   cargo run --bin set_admin_password -- <new-password>
//!
//! Falls back to `ADMIN_INITIAL_PASSWORD` when no argument is given.

use std::env;
use std::process::ExitCode;

use dotenvy::dotenv;
use storefront::application::auth_service::{hash_password, ADMIN_USERNAME, MIN_PASSWORD_LEN};
use storefront::domain::ports::AdminRepository;
use storefront::infrastructure::admin_repo::DieselAdminRepository;
use storefront::{create_pool, run_migrations, Settings};

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let password = env::args()
        .nth(1)
        .or_else(|| env::var("ADMIN_INITIAL_PASSWORD").ok())
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    let Some(password) = password else {
        eprintln!("Usage: set_admin_password <new-password> (or set ADMIN_INITIAL_PASSWORD)");
        return ExitCode::FAILURE;
    };
    if password.chars().count() < MIN_PASSWORD_LEN {
        eprintln!("Password must be at least {} characters", MIN_PASSWORD_LEN);
        return ExitCode::FAILURE;
    }

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let pool = create_pool(&settings.database_url);
    run_migrations(&pool);

    let admins = DieselAdminRepository::new(pool);
    let result = hash_password(&password)
        .and_then(|hash| admins.upsert_password(ADMIN_USERNAME, &hash));
    match result {
        Ok(()) => {
            log::info!("Password for '{}' updated", ADMIN_USERNAME);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to update admin password: {}", e);
            ExitCode::FAILURE
        }
    }
}
