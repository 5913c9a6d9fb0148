mod dispatcher;
mod error;
mod log;
mod mixer;
mod settings;
mod ui;

use settings::Settings;
use tracing::{info, warn};

fn main() {
    log::parse_log_level();

    let path = settings::scaffold().unwrap_or_else(|e| log::oops(format!("{}", e), 1));
    let settings = Settings::init(path.as_path())
        .unwrap_or_else(|e| log::oops(format!("Failed to load settings: {}", e), 1));

    if gtk::init().is_err() {
        log::oops(
            "Failed to start GTK, please ensure all dependancies are installed",
            2,
        );
    }

    // Ctrl-C arrives on another thread, hand it to the main loop
    let (tx, rx) = glib::MainContext::channel(glib::PRIORITY_DEFAULT);
    rx.attach(None, |()| {
        info!("Interrupted");
        gtk::main_quit();
        glib::Continue(false)
    });
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = tx.send(());
    }) {
        warn!("Error setting Ctrl-C handler: {}", e);
    }

    let window = ui::MixerWindow::new(settings);
    window.show();
    gtk::main();

    info!("gamix exiting, goodbye");
}
