#[macro_use]
extern crate log;

mod console;
mod error;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use botlog_cli::Options;
use botlog_handler::{
    make_handler, Collaborators, ConnectivityTracker, Edge, HandlerSettings, LogHandler,
    SharedQueue,
};
use botlog_protocol::{init_log, BotCodec, MsgFromBot, TaggedResource};
use botlog_queue::{BatchQueue, FlushTimer};
use console::ConsoleUi;
use error::DemoError;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main(flavor = "current_thread")]
pub async fn main() {
    env_logger::init();
    debug!("Starting device log router");

    let options = Options::from_cmd_line();
    if let Err(e) = run(options).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(options: Options) -> Result<(), DemoError> {
    let settings = options.get_handler_settings()?;
    let topic = match &settings.device {
        Some(device) => BotCodec::logs_topic(device),
        None => BotCodec::logs_topic_filter(),
    };
    debug!("Expecting input from: mosquitto_sub -v -t '{}'", topic);

    let queue: SharedQueue = Rc::new(RefCell::new(BatchQueue::new(settings.queue_capacity)));
    let connectivity = Rc::new(ConnectivityTracker::new(settings.offline_throttle));
    let state = settings.initial_state();

    let handler = make_handler(
        Collaborators {
            ui: Rc::new(ConsoleUi),
            connectivity: connectivity.clone(),
            normalizer: Box::new(init_log),
            sink: Box::new(queue.clone()),
        },
        Rc::new(move || state.clone()),
    );

    let mut timer = FlushTimer::new(settings.flush_interval);
    let mut ticker = tokio::time::interval(timer.interval());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => process_line(&line, &settings, &handler, &connectivity),
                    None => break,
                }
            }
            _ = ticker.tick() => {}
        }

        let now = Instant::now();
        if timer.is_due(now) {
            flush(&queue, &mut stdout).await?;
            timer.reset(now);
        }
    }

    debug!("Input closed, flushing remaining logs");
    flush(&queue, &mut stdout).await?;
    Ok(())
}

fn process_line(
    line: &str,
    settings: &HandlerSettings,
    handler: &LogHandler,
    connectivity: &ConnectivityTracker,
) {
    if line.trim().is_empty() {
        return;
    }

    match BotCodec::decode_line(line) {
        Ok(MsgFromBot::Log(msg)) => {
            if !settings.accepts(&msg.device) {
                trace!("Ignoring log from {}", msg.device);
                return;
            }
            let outcome = handler.handle(&msg.body);
            debug!("Log from {}: {:?}", msg.device, outcome);
        }
        Ok(MsgFromBot::Status(msg)) => {
            if settings.accepts(&msg.device) {
                let _applied = connectivity.network_up(Edge::BotMqtt, None, "Got status message");
            }
        }
        Ok(MsgFromBot::UnknownMessage()) => trace!("Ignoring unknown message"),
        Err(e) => warn!("Skipping input line: {}", e),
    }
}

/// One JSON document per line
fn encode_batch(batch: &[TaggedResource]) -> Result<Vec<u8>, DemoError> {
    let mut out = Vec::new();
    for resource in batch {
        serde_json::to_writer(&mut out, resource)?;
        out.push(b'\n');
    }
    Ok(out)
}

async fn flush(queue: &SharedQueue, stdout: &mut tokio::io::Stdout) -> Result<(), DemoError> {
    let batch = queue.borrow_mut().flush();
    if batch.is_empty() {
        return Ok(());
    }

    let bytes = encode_batch(&batch)?;
    stdout.write_all(&bytes).await?;
    stdout.flush().await?;
    Ok(())
}
