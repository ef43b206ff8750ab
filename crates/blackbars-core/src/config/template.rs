/// Generates the default `config.toml` contents with explanatory comments.
///
/// Used by `blackbars init` to create a starter config file that users
/// can immediately edit.
pub fn generate_config() -> String {
    r##"# Black Bars configuration
# Location: ~/.config/blackbars/config.toml

# Exact, case-sensitive titles of the windows that get a black backdrop.
# Run 'blackbars list' to see the titles of the windows currently open.
window_titles = ["League of Legends (TM) Client", "League of Legends"]

# Show an icon in the notification area with the current status and
# an Exit item.
tray = true

[logging]
# Enable file logging to ~/.config/blackbars/logs/blackbars.log.
enabled = false
# Minimum log level: "debug", "info", "warn", or "error".
level = "info"
# Maximum log file size in MB before rotation.
max_file_mb = 10
"##
    .to_string()
}
