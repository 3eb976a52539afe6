use std::time::Duration;

use clap::Parser;
use request_guard::services::auth::{MAX_TTL, TokenAuthenticator};

/// Issue an HS256 bearer token for local testing.
///
/// - Signs with the same secret the API verifies with (`AUTH_SECRET`, `.env` is read)
/// - Outputs the token and a ready-to-use `Authorization` header
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// Subject (e.g. user id). Omitted from the claims when not given.
    #[arg(long)]
    subject: Option<String>,

    /// Token lifetime in seconds.
    #[arg(long, env = "AUTH_TOKEN_TTL_SECONDS", default_value_t = 3600)]
    ttl_seconds: u64,

    /// HS256 signing secret.
    #[arg(long, env = "AUTH_SECRET", hide_env_values = true)]
    secret: String,

    /// Print only the token (no extra lines)
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if args.secret.is_empty() {
        return Err("secret must not be empty".into());
    }
    if args.ttl_seconds == 0 || args.ttl_seconds > MAX_TTL.as_secs() {
        return Err(format!("ttl-seconds must be between 1 and {}", MAX_TTL.as_secs()).into());
    }

    let auth = TokenAuthenticator::new(args.secret.as_bytes(), Duration::from_secs(args.ttl_seconds));
    let token = auth.issue(args.subject.as_deref())?;

    if args.quiet {
        println!("{}", token);
        return Ok(());
    }

    println!("token: {}", token);
    println!("Authorization: Bearer {}", token);
    println!("subject: {}", args.subject.as_deref().unwrap_or("(none)"));
    println!("expires in: {}s", args.ttl_seconds);

    Ok(())
}
