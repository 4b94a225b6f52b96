//! Crossmix Player - headless two-slot mix runner
//!
//! Resolves two links, loads them into simulated player handles and runs
//! a synchronized start, printing the resulting mix. Useful for checking
//! a config's sync timing without a rendering layer.
//!
//! ## Usage
//!
//! ```text
//! crossmix-player [--config PATH] [--template split|fade-through]
//!                 [--video N] [--audio N] [--stall-b] [--save TITLE]
//!                 <link-a> <link-b>
//! ```
//!
//! - `--stall-b`: make slot B never start, to watch the retry path
//! - `--save`: store the mix in the configured mix store

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crossmix_core::auth::StaticIdentity;
use crossmix_core::config::{default_config_path, load_config, CrossmixConfig};
use crossmix_core::controller::MixController;
use crossmix_core::player::SimulatedPlayer;
use crossmix_core::session::{percent_to_fader, Template};
use crossmix_core::source::{LinkResolver, SourceResolver};
use crossmix_core::store::YamlMixStore;
use crossmix_core::SlotLabel;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    template: Option<Template>,
    video: Option<u8>,
    audio: Option<u8>,
    stall_b: bool,
    save: Option<String>,
    links: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => args.config = Some(iter.next().context("--config needs a path")?.into()),
            "--template" => {
                let id = iter.next().context("--template needs a name")?;
                args.template = Some(Template::from_id(&id));
            }
            "--video" => args.video = Some(percent_arg(iter.next(), "--video")?),
            "--audio" => args.audio = Some(percent_arg(iter.next(), "--audio")?),
            "--stall-b" => args.stall_b = true,
            "--save" => args.save = Some(iter.next().context("--save needs a title")?),
            _ => args.links.push(arg),
        }
    }

    if args.links.len() != 2 {
        bail!("expected two links, got {}", args.links.len());
    }
    Ok(args)
}

fn percent_arg(value: Option<String>, flag: &str) -> Result<u8> {
    let value = value.with_context(|| format!("{} needs a percentage", flag))?;
    let percent: u8 = value
        .parse()
        .with_context(|| format!("{} expects 0-100, got {:?}", flag, value))?;
    Ok(percent.min(100))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logger - set RUST_LOG=debug for per-poll output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = parse_args()?;
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let config: CrossmixConfig = load_config(&config_path);
    log::info!("crossmix-player starting (sync timing: {:?})", config.sync);

    let resolver = LinkResolver::new();
    let mut controller = MixController::new(&config);

    if let Some(template) = args.template {
        controller.select_template(template);
    }

    for (label, link) in SlotLabel::ALL.into_iter().zip(&args.links) {
        let source = resolver
            .resolve(link)
            .with_context(|| format!("Failed to resolve slot {} link", label))?;
        let start = source.start_offset_seconds.unwrap_or(0.0);
        let player = if label == SlotLabel::B && args.stall_b {
            SimulatedPlayer::stalled()
        } else {
            SimulatedPlayer::responsive()
        };

        log::info!("Slot {} ({}): {} from {:.0}s", label, label.name(), source.source_id, start);
        // The controller seeks the new handle to the link's offset
        controller.assign_source(label, source, Arc::new(player));
        controller.mark_ready(label);
    }

    if let Some(video) = args.video {
        controller.set_video_fader(percent_to_fader(video));
    }
    if let Some(audio) = args.audio {
        controller.set_audio_fader(percent_to_fader(audio));
    }

    match controller.request_playback(true).await {
        Ok(()) => log::info!("Both slots playing"),
        Err(e) => log::warn!("Playback did not start: {}", e),
    }

    let output = controller.output();
    let labels = controller.labels();
    println!("template: {}", controller.session().template().name());
    println!("geometry: {:?}", output.geometry);
    println!("video:    {}", labels.video);
    println!("audio:    {}", labels.audio);
    println!("volumes:  A={:.2} B={:.2}", output.volume_a, output.volume_b);

    if let Some(title) = &args.save {
        let mut store = YamlMixStore::open(config.store_path())
            .with_context(|| format!("Failed to open mix store {:?}", config.store_path()))?;
        let user = std::env::var("USER").unwrap_or_else(|_| "local".to_string());
        let identity = StaticIdentity::signed_in(1, user);
        match controller.save_mix(title, &identity, &mut store) {
            Ok(saved) => println!("saved:    mix {} \"{}\"", saved.id, saved.title),
            Err(e) => log::warn!("Mix not saved: {}", e),
        }
    }

    if let Err(e) = controller.request_playback(false).await {
        log::warn!("Stop incomplete: {}", e);
    }

    for notice in controller.take_notices() {
        println!("[{:?}] {}: {}", notice.level, notice.title, notice.message);
    }

    Ok(())
}
