use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::shared::constants::PROGRESS_THROTTLE_FRAMES;

/// Receives what the detection loop wants reported: frame progress, how
/// long each stage took, per-frame metrics and status lines such as
/// `Camera On`.
pub trait PipelineLogger: Send {
    /// `frames` frames processed so far. Live sources have no total.
    fn progress(&mut self, frames: usize);

    fn timing(&mut self, stage: &str, duration_ms: f64);

    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Called once when the session has stopped.
    fn summary(&self) {}
}

/// Discards everything.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _frames: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Count, sum, peak and latest value of a series, kept without storing the
/// samples so an open-ended session uses constant memory.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    pub count: usize,
    pub total: f64,
    pub max: f64,
    pub last: f64,
}

impl RunningStats {
    pub fn record(&mut self, value: f64) {
        if self.count == 0 || value > self.max {
            self.max = value;
        }
        self.count += 1;
        self.total += value;
        self.last = value;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Logs through the `log` facade and prints a session summary at the end.
///
/// Progress is logged every `throttle_frames` frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    stages: BTreeMap<String, RunningStats>,
    metrics: BTreeMap<String, RunningStats>,
    started: Instant,
    frames: usize,
    messages: Vec<String>,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            stages: BTreeMap::new(),
            metrics: BTreeMap::new(),
            started: Instant::now(),
            frames: 0,
            messages: Vec::new(),
        }
    }

    pub fn stage(&self, stage: &str) -> Option<&RunningStats> {
        self.stages.get(stage)
    }

    pub fn metric_stats(&self, name: &str) -> Option<&RunningStats> {
        self.metrics.get(name)
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// The end-of-session report, or `None` when no frame got as far as a
    /// timed stage.
    pub fn summary_string(&self) -> Option<String> {
        self.render_summary(self.started.elapsed())
    }

    fn render_summary(&self, elapsed: Duration) -> Option<String> {
        if self.stages.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let secs = elapsed.as_secs_f64();
        let mut out = format!("Session summary ({} frames, {secs:.1}s):", self.frames);
        for (stage, stats) in &self.stages {
            out.push_str(&format!(
                "\n  {stage:10}: avg {:6.1}ms  max {:6.1}ms  total {:7.0}ms",
                stats.mean(),
                stats.max,
                stats.total
            ));
        }
        for (name, stats) in &self.metrics {
            out.push_str(&format!(
                "\n  {name}: avg {:.1}  max {:.0}  total {:.0}",
                stats.mean(),
                stats.max,
                stats.total
            ));
        }
        if self.frames > 0 && secs > 0.0 {
            out.push_str(&format!(
                "\n  Throughput: {:.1} fps",
                self.frames as f64 / secs
            ));
        }
        Some(out)
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(PROGRESS_THROTTLE_FRAMES)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, frames: usize) {
        self.frames = frames;
        if frames > 0 && frames % self.throttle_frames == 0 {
            log::info!(
                "{frames} frames ({:.1}s)",
                self.started.elapsed().as_secs_f64()
            );
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.stages
            .entry(stage.to_string())
            .or_default()
            .record(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().record(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
        self.messages.push(message.to_string());
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
