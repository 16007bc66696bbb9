use airdash::{App, AppConfig, AppEvent, Args, OpenOptions, Theme};
use clap::{Parser, ValueEnum};
use color_eyre::Result;
use ratatui::DefaultTerminal;
use std::sync::mpsc::channel;
use std::time::Duration;
use tracing::{error, info};

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn run(mut terminal: DefaultTerminal, args: &Args, config: AppConfig) -> Result<()> {
    let (tx, rx) = channel::<AppEvent>();
    let poll_interval = Duration::from_millis(config.display.event_poll_interval_ms);
    let opts = OpenOptions::from_args_and_config(args, &config);
    let theme = Theme::from_config(&config.theme)?;
    let mut app = App::new_with_config(theme, config);
    if args.debug {
        app.enable_debug();
    }
    render(&mut terminal, &mut app)?;
    tx.send(AppEvent::Open(args.path.clone(), opts))?;

    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let updated = match rx.recv_timeout(Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    AppEvent::Crash(msg) => {
                        error!(message = %msg, "fatal error");
                        return Err(color_eyre::eyre::eyre!(msg));
                    }
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    info!("exiting");
    Ok(())
}

fn value_name<T: ValueEnum>(value: &T) -> Option<String> {
    value
        .to_possible_value()
        .map(|v| v.get_name().to_string())
}

/// CLI flags take precedence over the config file.
fn apply_cli_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(name) = args.variant.as_ref().and_then(value_name) {
        config.dashboard.variant = name;
    }
    if let Some(name) = args.column_policy.as_ref().and_then(value_name) {
        config.dashboard.column_policy = Some(name);
    }
    if let Some(name) = args.missing_columns.as_ref().and_then(value_name) {
        config.dashboard.missing_columns = name;
    }
    if let Some(page_size) = args.page_size {
        config.display.page_size = page_size;
    }
    if let Some(bins) = args.histogram_bins {
        config.display.histogram_bins = bins;
    }
    if let Some(dir) = &args.export_dir {
        config.export.directory = Some(dir.clone());
    }
    if args.debug {
        config.debug.enabled = true;
    }
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.generate_config {
        match airdash::ConfigManager::new(airdash::APP_NAME) {
            Ok(manager) => match manager.write_default_config(args.force) {
                Ok(path) => {
                    println!("Configuration file written to {}", path.display());
                    return Ok(Some(()));
                }
                Err(e) => {
                    eprintln!("Error writing configuration file: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error initializing config manager: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(None)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    let mut config = match AppConfig::load(airdash::APP_NAME) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };
    apply_cli_overrides(&mut config, &args);
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let _log_guard = airdash::logging::init(config.debug.enabled);
    color_eyre::install()?;
    let terminal = ratatui::init();
    let result = run(terminal, &args, config);
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
