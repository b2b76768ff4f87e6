//! collapses the services of a prototype day in a GTFS archive into a single
//! weekly calendar. see `bambam_calendar --help` for usage.
use bambam_calendar::app::CalendarApp;
use clap::Parser;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CalendarApp::parse();
    if let Err(e) = args.run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
