use std::{future::Future, sync::Arc};

use teloxide::{
    dispatching::Dispatcher,
    dptree,
    prelude::*,
    types::{Update, UpdateKind},
};

use qab_core::{
    admin::AdminService,
    config::{Config, DeliveryMode},
    messaging::port::MessagingPort,
    store::ActivationStore,
};

use crate::{handlers, http, TelegramMessenger};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub bot: Bot,
    pub service: Arc<AdminService>,
    pub messenger: Arc<dyn MessagingPort>,
}

impl AppState {
    pub fn new(cfg: Arc<Config>, bot: Bot, store: Arc<dyn ActivationStore>) -> Self {
        let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
        let service = Arc::new(AdminService::new(
            store,
            messenger.clone(),
            cfg.admin_user_id,
        ));
        Self {
            cfg,
            bot,
            service,
            messenger,
        }
    }
}

/// Route one raw update to the matching handler (webhook path).
pub async fn dispatch_update(update: Update, state: Arc<AppState>) {
    let bot = state.bot.clone();
    let update_id = update.id;
    let res = match update.kind {
        UpdateKind::Message(msg) => handlers::handle_message(bot, msg, state).await,
        UpdateKind::CallbackQuery(q) => handlers::handle_callback(bot, q, state).await,
        _ => Ok(()),
    };
    if let Err(e) = res {
        tracing::error!(update_id, error = %e, "update handling failed");
    }
}

pub async fn run(cfg: Arc<Config>, store: Arc<dyn ActivationStore>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.bot_token.clone());

    match bot.get_me().await {
        Ok(me) => tracing::info!(username = %me.username(), "bot connected"),
        Err(e) => tracing::warn!(error = %e, "get_me failed; continuing"),
    }
    tracing::info!(
        admin_configured = cfg.admin_user_id != 0,
        mode = ?cfg.mode,
        port = cfg.port,
        "starting"
    );

    let state = Arc::new(AppState::new(cfg.clone(), bot.clone(), store));

    match cfg.mode {
        DeliveryMode::Webhook => run_webhook(state).await,
        DeliveryMode::Polling => run_polling(state).await,
    }
}

async fn run_webhook(state: Arc<AppState>) -> anyhow::Result<()> {
    if let Some(raw) = &state.cfg.webhook_url {
        let url = url::Url::parse(raw)?;
        state.bot.set_webhook(url).await?;
        tracing::info!(url = %raw, "webhook registered");
    }

    http::serve(state.clone(), state.cfg.port, shutdown_signal()).await
}

async fn run_polling(state: Arc<AppState>) -> anyhow::Result<()> {
    // Health checks stay available while polling.
    let listener = http::bind(state.cfg.port).await?;
    let server = tokio::spawn({
        let state = state.clone();
        async move {
            if let Err(e) = http::serve_on(listener, state, std::future::pending::<()>()).await {
                tracing::error!(error = %e, "http server failed");
            }
        }
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(state.bot.clone(), handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    server.abort();
    Ok(())
}

fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        tracing::info!("shutdown signal received");
    }
}
