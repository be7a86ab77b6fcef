use staffdesk::cli::run_cli;

#[tokio::main]
async fn main() {
    // Load .env file if it exists; must happen before any config is read
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    if let Err(e) = run_cli().await {
        eprintln!("staffdesk: {}", e);
        std::process::exit(1);
    }
}
