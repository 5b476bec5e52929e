use std::sync::Arc;

use d3_site::config::{AppState, Config};
use d3_site::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(AppState::new(&cfg)?);

    for (id, fragment) in state.registry.iter() {
        if !fragment.is_file() {
            logger::log_warning(&format!(
                "Page '{id}' has no fragment at '{}', it will render empty",
                fragment.display()
            ));
        }
    }

    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg, state.registry.iter().count());

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals))?;

    server::run_server(listener, state, signals).await?;
    Ok(())
}
