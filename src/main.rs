use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
mod config;
mod error;
mod events;
mod services;
mod utils;

use config::Config;
use services::{
    create_focus_tracker, BackupWriter, CommandRunner, DryRunCommandRunner, KeyStore,
    ShortcutController, ShortcutState, SystemCommandRunner,
};

#[derive(Parser, Debug)]
#[command(name = "gnome-shortcut-blocker")]
#[command(about = "Отключает глобальные сочетания клавиш, пока в фокусе выбранное приложение")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "shortcut-blocker.toml")]
    config: String,

    /// Режим сухого запуска (значения читаются, но не изменяются)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (по умолчанию из конфигурации)
    #[arg(long)]
    log_level: Option<String>,

    /// Вывести backup скрипт для текущих значений и выйти
    #[arg(long)]
    print_backup: bool,

    /// Эмулировать смену фокуса вместо опроса окон
    #[arg(long)]
    simulate_focus: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Arc::new(Config::load(&args.config)?);

    // Инициализация системы логирования
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск GNOME Shortcut Blocker v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - сочетания клавиш не изменяются");
    }

    // Проверка внешних утилит до начала работы
    utils::dependencies::check_dependencies(&config, args.simulate_focus || args.print_backup)?;

    let runner: Arc<dyn CommandRunner> = if args.dry_run {
        Arc::new(DryRunCommandRunner::new())
    } else {
        Arc::new(SystemCommandRunner::new())
    };

    // Снимок текущих значений до любых изменений
    let key_store = KeyStore::new(runner.clone());
    let state = ShortcutState::capture(&key_store, &config.shortcuts);
    info!("Прочитано {} сочетаний", state.len());
    for (id, value) in state.iter() {
        debug!("{} = '{}'", id, value);
    }

    if args.print_backup {
        print!("{}", BackupWriter::render(&key_store, &config.shortcuts, &state));
        return Ok(());
    }

    BackupWriter::new(config.backup_path()).write(&key_store, &config.shortcuts, &state)?;

    let tracker = create_focus_tracker(config.clone(), runner.clone(), args.simulate_focus)?;
    let controller = ShortcutController::new(config.clone(), key_store, tracker, state);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut controller_handle = tokio::spawn(controller.run(shutdown_rx));

    info!("Мониторинг запущен");

    // Ожидание сигнала завершения
    tokio::select! {
        reason = wait_for_shutdown_signal() => {
            info!("Получен сигнал завершения ({})", reason);
        }
        result = &mut controller_handle => {
            match result {
                Ok(Ok(())) => warn!("ShortcutController завершился без сигнала"),
                Ok(Err(e)) => error!("Ошибка в ShortcutController: {}", e),
                Err(e) => error!("Задача ShortcutController аварийно завершилась: {}", e),
            }
            return Ok(());
        }
    }

    info!("Завершение работы...");

    // Контроллер сам вернёт сочетания, если они отключены
    let _ = shutdown_tx.send(true);

    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    match tokio::time::timeout(shutdown_timeout, controller_handle).await {
        Ok(Ok(Ok(()))) => info!("ShortcutController завершил работу корректно"),
        Ok(Ok(Err(e))) => error!("Ошибка при остановке ShortcutController: {}", e),
        Ok(Err(e)) => error!("Задача ShortcutController аварийно завершилась: {}", e),
        Err(_) => warn!("Таймаут при завершении ShortcutController"),
    }

    info!("GNOME Shortcut Blocker завершил работу");
    Ok(())
}

async fn wait_for_shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal as unix_signal, SignalKind};

    let mut terminate = match unix_signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(err) => {
            error!("Не удалось подписаться на SIGTERM: {}", err);
            return match signal::ctrl_c().await {
                Ok(()) => "Ctrl+C",
                Err(_) => "ошибка ожидания сигнала",
            };
        }
    };

    tokio::select! {
        result = signal::ctrl_c() => match result {
            Ok(()) => "Ctrl+C",
            Err(err) => {
                error!("Ошибка при ожидании сигнала завершения: {}", err);
                "ошибка ожидания сигнала"
            }
        },
        _ = terminate.recv() => "SIGTERM",
    }
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        "compact" => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    Ok(())
}
