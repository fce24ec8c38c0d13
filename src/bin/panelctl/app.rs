use std::path::PathBuf;

use async_channel::{Receiver, Sender, unbounded};
use panelkit::Result;
use panelkit::config::{Config, NotifySettings};
use panelkit::error::{ConfigError, Error as PanelError};
use panelkit::notify::NotificationRequest;
use panelkit::telemetry::init_tracing;
use panelkit::types::ClosedReason;
use tokio::signal;
use tracing::info;

use super::cli::Cli;

const DEFAULT_CONFIG: &str = "panelkit.toml";

#[derive(Debug)]
enum Event {
    Action(String),
    Closed(ClosedReason),
}

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = Config::from_env_and_file(&config_path)?;

    let (tx, rx) = unbounded();
    let request = build_request(&cli, &config.notify, &tx)?;
    drop(tx);

    let app_name = request
        .app_name
        .clone()
        .unwrap_or_else(|| config.notify.appname.clone());
    if !send(request, app_name).await? {
        return Ok(());
    }

    if cli.wait {
        wait_for_events(&rx).await;
    }
    Ok(())
}

fn build_request(
    cli: &Cli,
    settings: &NotifySettings,
    events: &Sender<Event>,
) -> Result<NotificationRequest> {
    let timeout = match cli.timeout {
        Some(timeout) => i32::try_from(timeout.as_millis()).map_err(|_| {
            PanelError::from(ConfigError::InvalidField {
                field: "cli.timeout",
                message: "timeout must fit in 32-bit milliseconds".to_string(),
            })
        })?,
        None => settings.timeout_ms(),
    };

    let mut request = NotificationRequest::new(cli.summary.clone())
        .app_name(cli.app_name.clone().unwrap_or_else(|| settings.appname.clone()))
        .urgency(cli.urgency.unwrap_or(settings.urgency))
        .timeout(timeout);
    request.body.clone_from(&cli.body);
    request.icon_name = cli.icon.clone().or_else(|| settings.icon.clone());
    request.id = cli.id;

    request.action_icons = Some(cli.action_icons);
    request.category.clone_from(&cli.category);
    request.desktop_entry.clone_from(&cli.desktop_entry);
    request.image.clone_from(&cli.image);
    request.resident = Some(cli.resident);
    request.sound_file.clone_from(&cli.sound_file);
    request.sound_name.clone_from(&cli.sound_name);
    request.suppress_sound = Some(cli.suppress_sound);
    request.transient = Some(cli.transient);
    request.x = cli.x;
    request.y = cli.y;

    for label in &cli.actions {
        let tx = events.clone();
        let invoked = label.clone();
        request = request.action(label.clone(), move || {
            let _ = tx.try_send(Event::Action(invoked.clone()));
        });
    }
    let tx = events.clone();
    request = request.on_closed(move |reason| {
        let _ = tx.try_send(Event::Closed(reason));
    });

    Ok(request)
}

/// Returns whether a notification was actually shown.
#[cfg(target_os = "linux")]
async fn send(request: NotificationRequest, app_name: String) -> Result<bool> {
    let notifier = panelkit::notify::desktop::notifier().with_app_name(app_name);
    match notifier.notify(request).await? {
        Some(live) => {
            info!(server_id = ?live.handle().server_id(), "notification sent");
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(not(target_os = "linux"))]
async fn send(request: NotificationRequest, app_name: String) -> Result<bool> {
    let _ = (request, app_name);
    tracing::error!("missing dependency: no desktop notification backend on this platform");
    Ok(false)
}

async fn wait_for_events(rx: &Receiver<Event>) {
    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("interrupted, no longer waiting for the notification");
                break;
            }
            event = rx.recv() => match event {
                Ok(Event::Action(label)) => println!("action: {label}"),
                Ok(Event::Closed(reason)) => {
                    println!("closed: {reason}");
                    break;
                }
                Err(_) => break,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Event, build_request};
    use crate::cli::Cli;
    use clap::Parser;
    use panelkit::config::NotifySettings;
    use panelkit::notify::HintValue;
    use panelkit::types::{ClosedReason, Urgency};
    use std::time::Duration;

    fn settings() -> NotifySettings {
        NotifySettings {
            appname: "configured".into(),
            timeout: Some(Duration::from_secs(4)),
            urgency: Urgency::Low,
            icon: Some("dialog-information".into()),
        }
    }

    fn cli(args: &[&str]) -> Cli {
        match Cli::try_parse_from(std::iter::once("panelctl").chain(args.iter().copied())) {
            Ok(cli) => cli,
            Err(err) => panic!("arguments should parse: {err}"),
        }
    }

    #[test]
    fn config_fills_in_missing_flags() {
        let (tx, _rx) = async_channel::unbounded();
        let request = match build_request(&cli(&["Hello"]), &settings(), &tx) {
            Ok(request) => request,
            Err(err) => panic!("request should build: {err}"),
        };
        assert_eq!(request.app_name.as_deref(), Some("configured"));
        assert_eq!(request.urgency, Some(Urgency::Low));
        assert_eq!(request.timeout, Some(4_000));
        assert_eq!(request.icon_name.as_deref(), Some("dialog-information"));
        assert!(request.hints().is_empty());
    }

    #[test]
    fn flags_override_config_and_set_hints() {
        let (tx, _rx) = async_channel::unbounded();
        let args = [
            "Hello", "World", "-u", "critical", "-t", "2s", "--transient", "--x", "-5",
        ];
        let request = match build_request(&cli(&args), &settings(), &tx) {
            Ok(request) => request,
            Err(err) => panic!("request should build: {err}"),
        };
        assert_eq!(request.body.as_deref(), Some("World"));
        assert_eq!(request.urgency, Some(Urgency::Critical));
        assert_eq!(request.timeout, Some(2_000));
        assert_eq!(
            request.hints(),
            vec![("transient", HintValue::Bool(true)), ("x", HintValue::Int(-5))]
        );
    }

    #[test]
    fn callbacks_forward_events() {
        let (tx, rx) = async_channel::unbounded();
        let mut request = match build_request(&cli(&["Hi", "--action", "Open"]), &settings(), &tx)
        {
            Ok(request) => request,
            Err(err) => panic!("request should build: {err}"),
        };

        let (label, callback) = &request.actions[0];
        assert_eq!(label, "Open");
        callback();
        if let Some(on_closed) = request.on_closed.take() {
            on_closed(ClosedReason::Dismissed);
        }

        assert!(matches!(rx.try_recv(), Ok(Event::Action(label)) if label == "Open"));
        assert!(matches!(rx.try_recv(), Ok(Event::Closed(ClosedReason::Dismissed))));
    }
}
