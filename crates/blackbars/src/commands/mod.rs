pub mod events;
pub mod init;
pub mod list;
pub mod run;

/// Exits with an error on platforms without a desktop backend.
#[cfg(not(windows))]
pub fn unsupported() -> ! {
    eprintln!("Error: Black Bars only runs on Windows.");
    std::process::exit(1);
}
