mod app;
mod canvas;
mod classes;
mod config;
mod constants;
mod error;
mod game_loop;
mod input;
mod logging;
mod network;
mod protocol;
mod renderer;
mod schedule;
mod simulation;
mod state;
mod ui;
mod upgrades;

fn main() {
    console_error_panic_hook::set_once();
    logging::init(config::stored_log_level());
    leptos::mount::mount_to_body(app::App);
}
