use std::time::Duration;

use log::debug;

use super::loader::FrameSource;

/// Minimum frame time substituted for unreadable timing metadata.
pub const MIN_FRAME_TIME: Duration = Duration::from_millis(50);

#[derive(Debug, thiserror::Error)]
pub enum DelayError {
    #[error("frame has no delay metadata")]
    Missing,
    #[error("malformed delay metadata: {0}")]
    Malformed(String),
    #[error("frame {0} is out of range")]
    OutOfRange(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayPolicy {
    pub fallback: Duration,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self { fallback: MIN_FRAME_TIME }
    }
}

/// Delay before advancing past `index`, in whole milliseconds.
///
/// Never fails: any metadata error is logged and replaced by the policy fallback so one bad frame
/// cannot stop an otherwise playable animation. An authored zero is kept as zero.
pub fn delay_for_frame<S>(source: &S, index: usize, policy: DelayPolicy) -> Duration
where
    S: FrameSource + ?Sized,
{
    match source.delay_centis(index) {
        Ok(centis) => Duration::from_millis(u64::from(centis) * 10),
        Err(err) => {
            debug!("frame {index}: {err}, using {}ms", policy.fallback.as_millis());
            policy.fallback
        },
    }
}
