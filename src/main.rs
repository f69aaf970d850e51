mod app;
mod cat;
mod click;
mod config;
mod debug;
mod ecs;
mod particles;
mod render;
mod scene;
mod schedule;

fn main() {
    env_logger::init();
    log::info!("Pixel cat starting up");

    let config = match config::CardConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Config error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = app::run(config) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
