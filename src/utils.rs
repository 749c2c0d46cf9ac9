use std::fmt;
use std::time::Instant;

/// Wall-clock stopwatch that reports its elapsed time when displayed, for
/// the sweep banner log.
pub struct Timer {
    started: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Timer {
            started: Instant::now(),
        }
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:<30} {:.2} s",
            "wall time:",
            self.started.elapsed().as_secs_f64()
        )
    }
}
