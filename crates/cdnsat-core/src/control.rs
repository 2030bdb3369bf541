//! Stop token shared by the fleet, the sampler and the fatal gate.
//!
//! The download loop and the sampler poll the token; once set they unwind and
//! return. In normal operation nothing sets it except the fatal gate right
//! before the process is replaced.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct StopToken {
    flag: Arc<AtomicBool>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
