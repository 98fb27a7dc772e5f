//! Decoder thread standing in for the host media element: symphonia decodes
//! the source's audio track, cpal plays it, and transport changes come back
//! as [`MediaEvent`]s on the app channel.

use std::collections::VecDeque;
use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use cpal::Sample;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use symphonia::core::audio::{SampleBuffer, SignalSpec};
use symphonia::core::codecs::{CODEC_TYPE_NULL, Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::Time;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::events::types::AppEvent;
use crate::player::commands::PlayerCommand;
use crate::player::media::MediaEvent;

const TIME_UPDATE_INTERVAL: Duration = Duration::from_millis(250);
const IDLE_SLEEP: Duration = Duration::from_millis(50);
const FULL_BUFFER_SLEEP: Duration = Duration::from_millis(10);
/// Seconds of audio kept queued ahead of the output callback.
const BUFFER_AHEAD_SECS: usize = 3;

#[derive(Debug, Error)]
enum DecodeError {
    #[error("cannot open source: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Symphonia(#[from] SymphoniaError),
    #[error("source has no decodable audio track")]
    NoTrack,
    #[error("no audio output device")]
    NoDevice,
    #[error("audio output: {0}")]
    Output(String),
}

/// Volume and mute shared with the output callback.
#[derive(Debug)]
struct Gain {
    volume_bits: AtomicU32,
    muted: AtomicBool,
}

impl Gain {
    fn new() -> Self {
        Self {
            volume_bits: AtomicU32::new(1.0f32.to_bits()),
            muted: AtomicBool::new(false),
        }
    }

    fn set_volume(&self, volume: f32) {
        self.volume_bits
            .store(volume.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    fn level(&self) -> f32 {
        if self.muted.load(Ordering::Relaxed) {
            0.0
        } else {
            f32::from_bits(self.volume_bits.load(Ordering::Relaxed))
        }
    }
}

struct AudioOutput {
    queue: Arc<Mutex<VecDeque<f32>>>,
    spec: SignalSpec,
    paused: Arc<AtomicBool>,
    _stream: cpal::Stream,
}

impl AudioOutput {
    /// Opens the default device. The stream starts paused.
    fn open(spec: SignalSpec, gain: Arc<Gain>) -> Result<Self, DecodeError> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or(DecodeError::NoDevice)?;

        let config = cpal::StreamConfig {
            channels: spec.channels.count() as u16,
            sample_rate: cpal::SampleRate(spec.rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let capacity = spec.rate as usize * spec.channels.count() * (BUFFER_AHEAD_SECS + 1);
        let queue = Arc::new(Mutex::new(VecDeque::with_capacity(capacity)));
        let paused = Arc::new(AtomicBool::new(true));

        let callback_queue = queue.clone();
        let callback_paused = paused.clone();
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if callback_paused.load(Ordering::Relaxed) {
                        data.fill(Sample::EQUILIBRIUM);
                        return;
                    }
                    let level = gain.level();
                    let Ok(mut queue) = callback_queue.lock() else {
                        data.fill(Sample::EQUILIBRIUM);
                        return;
                    };
                    for sample in data.iter_mut() {
                        *sample = queue
                            .pop_front()
                            .map_or(Sample::EQUILIBRIUM, |s| s * level);
                    }
                },
                |err| warn!(%err, "audio stream error"),
                None,
            )
            .map_err(|e| DecodeError::Output(e.to_string()))?;

        stream
            .play()
            .map_err(|e| DecodeError::Output(e.to_string()))?;

        Ok(Self {
            queue,
            spec,
            paused,
            _stream: stream,
        })
    }

    fn push(&self, samples: &[f32]) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.extend(samples.iter().copied());
        }
    }

    fn queued(&self) -> usize {
        self.queue.lock().map(|q| q.len()).unwrap_or(0)
    }

    fn clear(&self) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.clear();
        }
    }

    fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }

    fn channels(&self) -> usize {
        self.spec.channels.count().max(1)
    }

    fn is_full(&self) -> bool {
        self.queued() > self.spec.rate as usize * self.channels() * BUFFER_AHEAD_SECS
    }
}

enum Step {
    Decoded,
    BufferFull,
    Draining,
}

/// An opened source: demuxer, decoder and output stream.
struct DecodeSession {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    output: AudioOutput,
    samples: Option<SampleBuffer<f32>>,
    sample_frames: u64,
    frames_decoded: u64,
    duration: Option<Duration>,
    reached_eof: bool,
    ended: bool,
}

impl DecodeSession {
    fn open(path: &Path, gain: Arc<Gain>) -> Result<Self, DecodeError> {
        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(DecodeError::NoTrack)?;
        let track_id = track.id;
        let params = track.codec_params.clone();

        let duration = params.time_base.zip(params.n_frames).map(|(tb, frames)| {
            let time = tb.calc_time(frames);
            Duration::from_secs_f64(time.seconds as f64 + time.frac)
        });

        let mut decoder =
            symphonia::default::get_codecs().make(&params, &DecoderOptions::default())?;

        // AAC decoders commonly reject the first packets; the output is opened
        // with the spec of the first packet that decodes.
        let (spec, first, sample_frames) = loop {
            let packet = format.next_packet()?;
            if packet.track_id() != track_id {
                continue;
            }
            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    let frames = decoded.capacity() as u64;
                    let mut buf = SampleBuffer::<f32>::new(frames, spec);
                    buf.copy_interleaved_ref(decoded);
                    break (spec, buf, frames);
                }
                Err(SymphoniaError::DecodeError(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        };

        let output = AudioOutput::open(spec, gain)?;
        output.push(first.samples());
        let frames_decoded = first.len() as u64 / output.channels() as u64;

        Ok(Self {
            format,
            decoder,
            track_id,
            output,
            samples: Some(first),
            sample_frames,
            frames_decoded,
            duration,
            reached_eof: false,
            ended: false,
        })
    }

    fn duration_secs(&self) -> f64 {
        self.duration.map_or(f64::NAN, |d| d.as_secs_f64())
    }

    /// Position heard by the listener: decoded frames minus what is queued.
    fn position(&self) -> f64 {
        let queued = (self.output.queued() / self.output.channels()) as u64;
        self.frames_decoded.saturating_sub(queued) as f64 / self.output.spec.rate as f64
    }

    fn seek(&mut self, position: Duration) -> Result<f64, DecodeError> {
        self.output.clear();
        self.format.seek(
            SeekMode::Accurate,
            SeekTo::Time {
                time: Time::from(position.as_secs_f64()),
                track_id: Some(self.track_id),
            },
        )?;
        self.decoder.reset();
        self.frames_decoded = (position.as_secs_f64() * self.output.spec.rate as f64) as u64;
        self.reached_eof = false;
        self.ended = false;
        Ok(position.as_secs_f64())
    }

    fn step(&mut self) -> Result<Step, DecodeError> {
        if self.reached_eof {
            return Ok(Step::Draining);
        }
        if self.output.is_full() {
            return Ok(Step::BufferFull);
        }

        let packet = match self.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.reached_eof = true;
                return Ok(Step::Draining);
            }
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != self.track_id {
            return Ok(Step::Decoded);
        }

        match self.decoder.decode(&packet) {
            Ok(decoded) => {
                let frames = decoded.capacity() as u64;
                if self.samples.is_none() || frames > self.sample_frames {
                    self.samples = Some(SampleBuffer::new(frames, *decoded.spec()));
                    self.sample_frames = frames;
                }
                if let Some(buf) = self.samples.as_mut() {
                    buf.copy_interleaved_ref(decoded);
                    self.frames_decoded += buf.len() as u64 / self.output.channels() as u64;
                    self.output.push(buf.samples());
                }
                Ok(Step::Decoded)
            }
            Err(SymphoniaError::DecodeError(e)) => {
                debug!(error = e, "skipping undecodable packet");
                Ok(Step::Decoded)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// State owned by the decoder thread.
struct Worker {
    events: mpsc::Sender<AppEvent>,
    gain: Arc<Gain>,
    session: Option<DecodeSession>,
    playing: bool,
    generation: u64,
    last_time_update: Instant,
}

impl Worker {
    fn new(events: mpsc::Sender<AppEvent>) -> Self {
        Self {
            events,
            gain: Arc::new(Gain::new()),
            session: None,
            playing: false,
            generation: 0,
            last_time_update: Instant::now(),
        }
    }

    fn emit(&self, event: MediaEvent) {
        let _ = self.events.send(AppEvent::Media {
            generation: self.generation,
            event,
        });
    }

    fn run(mut self, commands: mpsc::Receiver<PlayerCommand>) {
        loop {
            match commands.try_recv() {
                Ok(cmd) => self.handle(cmd),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => break,
            }

            if self.playing {
                self.advance();
            } else {
                std::thread::sleep(IDLE_SLEEP);
            }
        }
        debug!("decoder thread exiting");
    }

    fn handle(&mut self, cmd: PlayerCommand) {
        match cmd {
            PlayerCommand::Load { path, generation } => {
                self.generation = generation;
                self.session = None;
                self.playing = false;
                match DecodeSession::open(&path, self.gain.clone()) {
                    Ok(session) => {
                        info!(path = %path.display(), "media loaded");
                        let duration = session.duration_secs();
                        self.session = Some(session);
                        self.emit(MediaEvent::LoadedMetadata { duration });
                        self.emit(MediaEvent::TimeUpdate(0.0));
                    }
                    Err(err) => {
                        warn!(%err, path = %path.display(), "cannot load media");
                        self.emit(MediaEvent::Error(err.to_string()));
                    }
                }
            }

            PlayerCommand::Play => {
                let Some(session) = self.session.as_mut() else {
                    self.emit(MediaEvent::Error("no media loaded".into()));
                    return;
                };
                if session.ended {
                    if let Err(err) = session.seek(Duration::ZERO) {
                        warn!(%err, "cannot rewind ended media");
                    }
                }
                session.output.set_paused(false);
                self.playing = true;
                self.emit(MediaEvent::Play);
            }

            PlayerCommand::Pause => {
                if let Some(session) = self.session.as_ref() {
                    session.output.set_paused(true);
                }
                if self.playing {
                    self.playing = false;
                    self.emit(MediaEvent::Pause);
                }
            }

            PlayerCommand::Seek(position) => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                let landed = match session.seek(position) {
                    Ok(secs) => secs,
                    Err(err) => {
                        warn!(%err, "seek failed");
                        session.position()
                    }
                };
                self.emit(MediaEvent::TimeUpdate(landed));
            }

            PlayerCommand::SetVolume(volume) => self.gain.set_volume(volume),
            PlayerCommand::SetMuted(muted) => self.gain.set_muted(muted),

            PlayerCommand::Unload => {
                self.session = None;
                self.playing = false;
            }
        }
    }

    fn advance(&mut self) {
        let Some(session) = self.session.as_mut() else {
            self.playing = false;
            return;
        };

        match session.step() {
            Ok(Step::Decoded) => {}
            Ok(Step::BufferFull) => std::thread::sleep(FULL_BUFFER_SLEEP),
            Ok(Step::Draining) => {
                if session.output.queued() == 0 {
                    session.output.set_paused(true);
                    session.ended = true;
                    let end = session.position();
                    self.playing = false;
                    self.emit(MediaEvent::TimeUpdate(end));
                    self.emit(MediaEvent::Ended);
                    return;
                }
                std::thread::sleep(IDLE_SLEEP);
            }
            Err(err) => {
                warn!(%err, "decoding stopped");
                self.session = None;
                self.playing = false;
                self.emit(MediaEvent::Error(err.to_string()));
                return;
            }
        }

        if self.last_time_update.elapsed() >= TIME_UPDATE_INTERVAL {
            if let Some(session) = self.session.as_ref() {
                self.emit(MediaEvent::TimeUpdate(session.position()));
            }
            self.last_time_update = Instant::now();
        }
    }
}

pub fn spawn(
    commands: mpsc::Receiver<PlayerCommand>,
    events: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    std::thread::spawn(move || Worker::new(events).run(commands))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_applies_mute_over_volume() {
        let gain = Gain::new();
        assert_eq!(gain.level(), 1.0);
        gain.set_volume(0.3);
        assert_eq!(gain.level(), 0.3);
        gain.set_muted(true);
        assert_eq!(gain.level(), 0.0);
        gain.set_muted(false);
        assert_eq!(gain.level(), 0.3);
        gain.set_volume(4.0);
        assert_eq!(gain.level(), 1.0);
    }

    #[test]
    fn play_without_source_reports_error() {
        let (tx, rx) = mpsc::channel();
        let mut worker = Worker::new(tx);
        worker.handle(PlayerCommand::Play);
        assert!(matches!(
            rx.try_recv(),
            Ok(AppEvent::Media { event: MediaEvent::Error(_), .. })
        ));
        assert!(!worker.playing);
    }

    #[test]
    fn missing_file_reports_error() {
        let (tx, rx) = mpsc::channel();
        let mut worker = Worker::new(tx);
        worker.handle(PlayerCommand::Load {
            path: "/nonexistent/demo.mp4".into(),
            generation: 3,
        });
        assert!(matches!(
            rx.try_recv(),
            Ok(AppEvent::Media { generation: 3, event: MediaEvent::Error(_) })
        ));
        assert!(worker.session.is_none());
    }
}
