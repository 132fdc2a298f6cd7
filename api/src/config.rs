use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Port the HTTP server binds to on 0.0.0.0
    pub port: u16,
    /// Sustained signup rate per client IP
    pub signup_per_second: u64,
    /// Signup burst size per client IP
    pub signup_burst: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: parse_var("PORT", 8080),
            signup_per_second: parse_var("SIGNUP_PER_SECOND", 2),
            signup_burst: parse_var("SIGNUP_BURST", 5),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
