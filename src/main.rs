use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use minbar::{api, app_state::AppState, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    let addr = config.server_address();

    // Initialize application state (opens the database and creates the
    // schema if absent)
    let app_state = AppState::new(config).await?;

    let app = api::router(app_state).layer(ServiceBuilder::new().layer(CorsLayer::permissive()));

    println!("minbar starting on http://{}", addr);
    println!("  POST   /session            - Login (admin token)");
    println!("  DELETE /session            - Logout");
    println!("  GET    /pages              - List pages");
    println!("  POST   /pages              - Create page (admin)");
    println!("  PUT    /pages/{{id}}         - Rename page (admin)");
    println!("  DELETE /pages/{{id}}         - Delete page and its content (admin)");
    println!("  GET    /pages/{{id}}/posts   - List posts of a page");
    println!("  GET    /pages/{{id}}/links   - List links of a page");
    println!("  POST   /posts              - Create post (admin)");
    println!("  PUT    /posts/{{id}}         - Update post (admin)");
    println!("  DELETE /posts/{{id}}         - Delete post (admin)");
    println!("  POST   /links              - Create link (admin)");
    println!("  PUT    /links/{{id}}         - Update link (admin)");
    println!("  DELETE /links/{{id}}         - Delete link (admin)");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
