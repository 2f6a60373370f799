/// Returns the CLI version: `QGISMETA_CLI_VERSION` when set, otherwise the
/// compile-time package version.
pub fn get_version() -> String {
    if let Ok(v) = std::env::var("QGISMETA_CLI_VERSION") {
        if !v.trim().is_empty() {
            return v.trim().to_string();
        }
    }

    option_env!("CARGO_PKG_VERSION").unwrap_or("0.0.0").to_string()
}
