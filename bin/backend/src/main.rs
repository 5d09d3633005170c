//! Account Server Binary
//!
//! Signup, login, token refresh, and user CRUD on BIND_ADDR
//! (e.g. 0.0.0.0:8888). Reads a `.env` file when one is present.

#[tokio::main]
async fn main() -> std::io::Result<()> {
    if let Ok(path) = dotenvy::dotenv() {
        println!("loaded environment from {}", path.display());
    }
    acct_core::log();
    acct_server::run().await.inspect_err(|e| log::error!("server exited: {}", e))
}
