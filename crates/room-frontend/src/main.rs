//! Room Editor main entry point

use std::io::{BufRead, Write};

use room_frontend::config::create_shared_config;
use room_frontend::{ActionContext, create_shared_state, dispatch, parse_command};

fn main() -> std::io::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "room_frontend=debug,room_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Room Editor");

    let config = create_shared_config();
    let (editor_config, shell_config) = {
        let config = config.read();
        (config.config().editor.clone(), config.config().shell.clone())
    };
    let ctx = ActionContext::new(
        create_shared_state(editor_config, shell_config.model_dir.clone()),
        config,
    );

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        write!(stdout, "{}", shell_config.prompt)?;
        stdout.flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        match parse_command(&line) {
            Ok(Some(action)) => {
                for out in dispatch(action, &ctx) {
                    writeln!(stdout, "{}", out)?;
                }
            }
            Ok(None) => {}
            Err(e) => writeln!(stdout, "{}", e)?,
        }

        if !ctx.app_state.lock().running {
            break;
        }
    }

    if let Err(e) = ctx.config.write().save() {
        tracing::warn!("Failed to save config: {}", e);
    }
    tracing::info!("Room Editor closed");
    Ok(())
}
