use futures::StreamExt;
use log::{info, warn};
use protocol_sim_demo::{Command, Playground, PlaygroundConfig, PlaygroundMessage, HELP};
use std::{path::Path, time::Duration};
use tokio::{runtime::Runtime, sync::mpsc};
use tokio_util::codec::{FramedRead, LinesCodec};

async fn console_loop(config: PlaygroundConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (output_tx, mut output_rx) = mpsc::channel::<String>(100);

    let playground = Playground::new(&config.delays, config.initial_tab()?, output_tx);
    let playground_tx = playground.sender();
    let playground_task = tokio::spawn(playground.run());

    // The printer ends once the playground drops its output handle
    let printer_task = tokio::spawn(async move {
        while let Some(text) = output_rx.recv().await {
            println!("{}", text);
        }
    });

    println!("{}", HELP);

    let mut lines = FramedRead::new(tokio::io::stdin(), LinesCodec::new());

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("Error while reading from stdin: {:?}", err);
                break;
            },
        };

        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                println!("{}", err);
                continue;
            },
        };

        let quit = command == Command::Quit;

        if playground_tx.send(PlaygroundMessage::Command(command)).await.is_err() || quit {
            break;
        }
    }

    // Harmless if the playground has already quit
    drop(playground_tx.send(PlaygroundMessage::Command(Command::Quit)).await);
    drop(playground_tx);

    playground_task.await?;
    printer_task.await?;

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading config from {}", path);
            PlaygroundConfig::load(Path::new(&path))?
        },
        None => PlaygroundConfig::default(),
    };

    let runtime = Runtime::new()?;
    let result = runtime.block_on(console_loop(config));

    // A blocking stdin read can outlive the console loop
    runtime.shutdown_timeout(Duration::from_millis(100));

    result
}
