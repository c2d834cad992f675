use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use runtime::frame::Frame;
use tokio::time::MissedTickBehavior;
use tour::waypoints;
use tour::{Itinerary, MapCamera, SimulatedCamera, TourConfig, TourEvent, TourSequencer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plays the intro camera tour against a simulated map camera")]
struct Args {
    /// Play the intro tour (overrides TOUR_INTRO)
    #[arg(long)]
    intro: bool,

    /// Seconds to linger at each stop (overrides TOUR_DWELL_S)
    #[arg(long)]
    dwell: Option<f64>,

    /// JSON itinerary to play instead of the built-in tour
    #[arg(long)]
    itinerary: Option<PathBuf>,

    /// Press skip this many seconds into the tour
    #[arg(long)]
    skip_at: Option<f64>,

    /// Frames per second of the tour clock
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Wall-clock playback speed multiplier
    #[arg(long, default_value_t = 1.0)]
    speed: f64,
}

/// Shortest wall-clock frame period; `tokio::time::interval` rejects zero.
const MIN_FRAME_PERIOD_S: f64 = 0.001;
/// Longest wall-clock frame period, reached only at very slow speeds.
const MAX_FRAME_PERIOD_S: f64 = 60.0;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = TourConfig::from_env()?;
    if args.intro {
        config.intro = true;
    }
    if let Some(dwell) = args.dwell {
        config.dwell_s = dwell;
    }

    let itinerary = match &args.itinerary {
        Some(path) => {
            let json = tokio::fs::read_to_string(path).await?;
            Itinerary::from_json_str(&json, config.dwell_s)?
        }
        None => waypoints::builtin_itinerary(config.dwell_s)?,
    };

    if config.map_api_key.is_none() {
        warn!("MAPBOX_API_KEY not set; a real map camera would not load tiles");
    }

    let mut camera = SimulatedCamera::new(itinerary.table().first().pose());
    if !config.intro {
        let primary = itinerary.table().last().pose();
        camera.jump_to(&primary);
        info!(?primary, "intro disabled, showing primary view");
        return Ok(());
    }

    let speed = if args.speed.is_finite() && args.speed > 0.0 {
        args.speed
    } else {
        warn!(speed = args.speed, "invalid playback speed, using 1.0");
        1.0
    };

    let seq = TourSequencer::new(itinerary, camera);
    play(seq, Frame::at_rate(args.fps), speed, args.skip_at).await;
    Ok(())
}

/// Runs the tour on the tour clock until it has finished, skipping on Ctrl-C or at `skip_at`.
async fn play(
    mut seq: TourSequencer<SimulatedCamera>,
    mut frame: Frame,
    speed: f64,
    mut skip_at: Option<f64>,
) {
    let mut interval = tokio::time::interval(frame_period(frame.dt_s, speed));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;

    seq.start(frame.time);
    report(&mut seq);

    while !seq.is_finished() {
        tokio::select! {
            _ = interval.tick() => {}
            res = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                if let Err(err) = res {
                    warn!("ctrl-c handler failed: {err}");
                }
                seq.skip(frame.time);
                report(&mut seq);
                continue;
            }
        }

        frame = frame.next();
        if let Some(at) = skip_at
            && frame.time.0 >= at
        {
            skip_at = None;
            seq.skip(frame.time);
        }
        if let Some(flight) = seq.camera_mut().poll_arrival(frame.time) {
            seq.on_camera_arrived(flight, frame.time);
        }
        seq.tick(frame);
        report(&mut seq);
    }

    let pose = seq.camera().pose_at(frame.time);
    info!(state = ?seq.state(), t = frame.time.0, ?pose, "tour finished");
}

/// Wall-clock time between frames at `speed`, kept within what the timer accepts.
fn frame_period(dt_s: f64, speed: f64) -> Duration {
    let secs = dt_s / speed;
    if !(MIN_FRAME_PERIOD_S..=MAX_FRAME_PERIOD_S).contains(&secs) {
        warn!(dt_s, speed, "frame period out of range, clamping");
    }
    Duration::from_secs_f64(secs.clamp(MIN_FRAME_PERIOD_S, MAX_FRAME_PERIOD_S))
}

fn report(seq: &mut TourSequencer<SimulatedCamera>) {
    for stamped in seq.drain_events() {
        let t = stamped.at.0;
        match stamped.event {
            TourEvent::Started { waypoints } => info!(t, waypoints, "tour started"),
            TourEvent::FlightRequested { index, flight } => {
                let name = seq
                    .itinerary()
                    .table()
                    .get(index)
                    .map(|w| w.name.to_string())
                    .unwrap_or_default();
                let eta = seq.camera().arrival_time().map(|e| e.0);
                info!(t, index, ?flight, %name, ?eta, "flying");
            }
            TourEvent::Arrived { index, .. } => info!(t, index, "arrived"),
            TourEvent::CaptionShown { text, .. } => info!(t, %text, "caption"),
            TourEvent::DwellElapsed { index } => info!(t, index, "dwell elapsed"),
            TourEvent::SkipRevealed => info!(t, "skip control revealed"),
            TourEvent::Skipped { from } => info!(t, ?from, "skipped"),
            TourEvent::Completed => info!(t, "complete"),
        }
    }
}
