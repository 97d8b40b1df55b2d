use {clap::Parser, std::panic, zone_patrol::Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    // RUST_LOG still wins when set
    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, global_level)
        .filter(Some("zone_patrol"), my_code_level)
        .filter(Some("tower_http"), my_code_level)
        .parse_default_env()
        .init();

    let args = Cli::parse();
    zone_patrol::run_server(args).await
}
