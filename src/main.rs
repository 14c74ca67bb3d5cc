use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use card_onboarding::config::OnboardingConfig;
use card_onboarding::education::source_from_config;
use card_onboarding::error::Result;
use card_onboarding::onboarding::{Intent, SessionEvent, SessionHandle, view};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = OnboardingConfig::from_env()?;
    let source = source_from_config(&config)?;

    eprintln!("Card Onboarding v{}", env!("CARGO_PKG_VERSION"));
    match &config.dataset_file {
        Some(path) => eprintln!("   Dataset: {}", path.display()),
        None => eprintln!("   Dataset: {}", config.metadata_url()),
    }
    eprintln!("   Commands: tap <n>, save, back\n");

    let mut session = SessionHandle::spawn(source, &config);
    let mut events = session.store().subscribe();
    eprintln!("   Session: {}", session.id());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        // A failure may land before the subscription above.
        if session.snapshot().error.is_some() {
            break;
        }
        tokio::select! {
            _ = session.wait_for_exit() => break,
            event = events.recv() => match event {
                Ok(event) => {
                    println!("{}", serde_json::to_string(&event)?);
                    if matches!(event, SessionEvent::LoadFailed { .. }) {
                        break;
                    }
                    if matches!(event, SessionEvent::PhaseChanged { .. } | SessionEvent::AnimationCompleted) {
                        let frame = view::build(&session.snapshot());
                        eprintln!("   screen={:?} background={} save={}", frame.screen, frame.background_color, frame.show_save_button);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event printer lagged");
                }
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match Intent::parse_command(line) {
                        Some(intent) => {
                            if !session.send(intent).await {
                                break;
                            }
                        }
                        None => eprintln!("   Unknown command: {line}"),
                    }
                }
                Ok(None) => stdin_open = false, // EOF, keep printing until exit
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    stdin_open = false;
                }
            },
        }
    }

    let last = session.snapshot();
    if let Some(error) = &last.error {
        eprintln!("Onboarding failed: {error}");
    }
    session.shutdown().await;
    Ok(())
}
