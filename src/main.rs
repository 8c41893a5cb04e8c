use coi_serve::{logger, server, Config, Server, ServerError};

fn main() {
    let cfg = Config::default();

    // Build the Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.workers {
        runtime_builder.worker_threads(workers);
    }

    let result = runtime_builder
        .build()
        .map_err(ServerError::from)
        .and_then(|runtime| runtime.block_on(async_main(&cfg)));

    if let Err(e) = result {
        logger::log_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn async_main(cfg: &Config) -> Result<(), ServerError> {
    let server = Server::bind(cfg)?;
    let addr = server.local_addr()?;

    println!("{}", cfg.announcement());
    logger::log_server_start(&addr, cfg);

    tokio::select! {
        () = server.run() => {}
        () = server::wait_for_termination() => {}
    }
    Ok(())
}
