use std::io::{self, Write};
use std::time::Duration;

use log::{debug, info};

use super::pacing::{Clock, InterruptibleSleeper, Pacing, Sleeper, SystemClock};
use super::series::{FrameRecord, FrameSeries};
use crate::ascii::{escape::EscapeCodes, frame::AnsiFrame};
use crate::AnsiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Redraw {
    /// Clear the screen and home the cursor.
    Clear,
    /// Home the cursor and overdraw in place.
    Home,
}

/// Only a frame with strictly fewer lines than its predecessor needs a full clear.
///
/// Width is not considered, so a narrower frame of equal height leaves the previous frame's
/// right-hand columns on screen.
pub fn redraw_for(previous_lines: usize, current_lines: usize) -> Redraw {
    if current_lines < previous_lines {
        Redraw::Clear
    } else {
        Redraw::Home
    }
}

/// Time left to sleep once render time is accounted for.
pub fn pacing_delay(delay: Duration, elapsed: Duration) -> Duration {
    delay.saturating_sub(elapsed)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackCursor {
    pub index: usize,
    pub previous_line_count: usize,
    pub frames_presented: u64,
    pub loops_completed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub frames_presented: u64,
    pub loops_completed: u64,
}

/// Loops a pre-rendered [`FrameSeries`] on a terminal until interrupted.
pub struct Player<W, C = SystemClock, S = InterruptibleSleeper> {
    out: W,
    clock: C,
    sleeper: S,
    escapes: EscapeCodes,
    cursor: PlaybackCursor,
}

impl<W, C, S> Player<W, C, S>
where
    W: Write,
    C: Clock,
    S: Sleeper,
{
    pub fn new(out: W, clock: C, sleeper: S, escapes: EscapeCodes) -> Self {
        Self { out, clock, sleeper, escapes, cursor: PlaybackCursor::default() }
    }

    pub fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Presents the series forever; returns only when the sleeper reports an interruption or
    /// the terminal cannot be written.
    pub fn play(&mut self, series: &FrameSeries) -> Result<PlaybackSummary, AnsiError> {
        let frames = series.frames();
        if frames.is_empty() {
            return Err(AnsiError::EmptySeries);
        }

        self.cursor = PlaybackCursor::default();
        self.out.write_all(self.escapes.clear.as_bytes())?;

        loop {
            let record = &frames[self.cursor.index];
            let started = self.clock.now();

            self.present(record)?;

            let elapsed = self.clock.now().saturating_duration_since(started);
            let pause = pacing_delay(record.delay, elapsed);
            if elapsed > record.delay {
                debug!(
                    "frame {} took {}ms, over its {}ms delay",
                    self.cursor.index,
                    elapsed.as_millis(),
                    record.delay.as_millis()
                );
            }

            if self.sleeper.sleep(pause) == Pacing::Interrupted {
                let summary = PlaybackSummary {
                    frames_presented: self.cursor.frames_presented,
                    loops_completed: self.cursor.loops_completed,
                };
                info!(
                    "playback interrupted after {} frames ({} full loops)",
                    summary.frames_presented, summary.loops_completed
                );
                return Ok(summary);
            }

            self.advance(frames.len());
        }
    }

    fn present(&mut self, record: &FrameRecord) -> io::Result<()> {
        let lines = record.line_count();
        let prefix = match redraw_for(self.cursor.previous_line_count, lines) {
            Redraw::Clear => &self.escapes.clear,
            Redraw::Home => &self.escapes.home,
        };

        self.out.write_all(prefix.as_bytes())?;
        self.out.write_all(record.frame.text().as_bytes())?;
        self.out.flush()?;

        self.cursor.previous_line_count = lines;
        self.cursor.frames_presented += 1;
        Ok(())
    }

    fn advance(&mut self, frame_count: usize) {
        self.cursor.index += 1;
        if self.cursor.index >= frame_count {
            self.cursor.index = 0;
            self.cursor.loops_completed += 1;
        }
    }
}

/// Prints a single frame once on a cleared screen.
pub fn present_static<W: Write>(
    out: &mut W,
    frame: &AnsiFrame,
    escapes: &EscapeCodes,
) -> io::Result<()> {
    out.write_all(escapes.clear.as_bytes())?;
    out.write_all(frame.text().as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}
