//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("Starting Inkboard");

    pollster::block_on(inkboard_app::App::run());
}
