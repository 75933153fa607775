use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let catalog = mock_server::Catalog::seeded();
    println!("listening on {addr}, api key `{}`", mock_server::DEFAULT_API_KEY);
    for collection in &catalog.collections {
        println!("  collection {} ({})", collection.id, collection.name);
    }
    mock_server::run(listener, catalog).await
}
