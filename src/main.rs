use actix_web::web;
use dotenvy::dotenv;
use storefront::{build_server, create_pool, run_migrations, AppState, Settings};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env().map_err(std::io::Error::other)?;

    let pool = create_pool(&settings.database_url);
    run_migrations(&pool);

    let state = AppState::from_settings(pool, &settings).map_err(std::io::Error::other)?;

    let auth = state.auth.clone();
    let initial_password = settings.admin_initial_password.clone();
    web::block(move || auth.ensure_admin(initial_password.as_deref()))
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;

    if settings.paddle_client_token.is_none() {
        log::warn!("PADDLE_CLIENT_TOKEN not set; checkout is disabled in the storefront");
    }
    if state.reconciler.can_verify() {
        log::info!("Paddle verification enabled");
    } else {
        log::warn!("PADDLE_API_KEY not set; checkout completions are trusted without verification");
    }

    log::info!("Starting server at http://{}:{}", settings.host, settings.port);

    build_server(state, &settings.host, settings.port)?.await
}
