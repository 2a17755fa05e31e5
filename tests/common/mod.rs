use loginregister_server::Settings;

/// Settings with cheap argon2 parameters so tests hash quickly.
pub fn test_settings() -> Settings {
    Settings::from_overrides([
        ("APP_ENVIRONMENT", "test"),
        ("APP_AUTH__JWT_SECRET", "test_secret"),
        ("APP_AUTH__TOKEN_EXPIRY_HOURS", "1"),
        ("APP_AUTH__HASH_MEMORY_KIB", "1024"),
        ("APP_AUTH__HASH_ITERATIONS", "1"),
    ])
    .expect("Failed to load test config")
}
