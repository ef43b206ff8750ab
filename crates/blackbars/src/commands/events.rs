/// Prints window events as they arrive. Press Ctrl+C to stop.
#[cfg(windows)]
pub fn execute() {
    use blackbars_windows::Window;

    println!("Watching window events (press Ctrl+C to stop)...\n");

    let result = blackbars_windows::watch_events(|event| {
        let title = Window::from_handle(event.hwnd()).title();
        println!("{event} \"{title}\"");
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(windows))]
pub fn execute() {
    super::unsupported();
}
