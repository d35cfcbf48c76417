use anyhow::Context;
use garaj_core::config::Config;
use garaj_server::state::AppState;
use tracing::info;

pub fn run(config: Config, port: Option<u16>) -> anyhow::Result<()> {
    for w in config.validate() {
        tracing::warn!("config: {}", w.message);
    }

    garaj_core::store::bootstrap(&config.database).with_context(|| {
        format!("failed to initialise database {}", config.database.display())
    })?;
    info!(database = %config.database.display(), "database ready");

    let port = port.unwrap_or(config.server.port);
    let channel = garaj_server::channel::from_config(&config.telegram)?;
    let state = AppState::new(&config, channel);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(garaj_server::serve(state, port))
}
