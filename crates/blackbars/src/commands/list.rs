use std::path::Path;

#[cfg(windows)]
pub fn execute(config_path: Option<&Path>) {
    use comfy_table::presets::UTF8_FULL;
    use comfy_table::{Cell, ContentArrangement, Table};

    let titles = blackbars_core::config::load(config_path).monitored_titles();
    let windows = match blackbars_windows::enumerate_windows() {
        Ok(windows) => windows,
        Err(e) => {
            eprintln!("Error: failed to enumerate windows: {e}");
            std::process::exit(1);
        }
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("HWND"),
            Cell::new("Title"),
            Cell::new("Class"),
            Cell::new("Minimized"),
            Cell::new("Monitored"),
        ]);

    let mut monitored = 0;
    for window in &windows {
        let title = window.title();
        let is_monitored = titles.contains(&title);
        monitored += usize::from(is_monitored);

        table.add_row(vec![
            Cell::new(window.handle()),
            Cell::new(&title),
            Cell::new(window.class()),
            Cell::new(if window.is_minimized() { "yes" } else { "" }),
            Cell::new(if is_monitored { "yes" } else { "" }),
        ]);
    }

    println!("{table}");
    println!("\n{} windows found, {monitored} monitored", windows.len());
}

#[cfg(not(windows))]
pub fn execute(_config_path: Option<&Path>) {
    super::unsupported();
}
