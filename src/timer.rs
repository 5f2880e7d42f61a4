/*
timer.rs

Copyright 2025 Hervé Quatremain

This file is part of Nightfall.

Nightfall is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Nightfall is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Nightfall. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Mission countdown.
//!
//! [`MissionTimer`] holds the remaining seconds. In [`TimerMode::Background`] mode, starting the
//! timer spawns a [`Ticker`] thread that sends one tick per second through an
//! [`async_channel`]. The ticks are only applied when the owner of the timer calls
//! [`MissionTimer::pump`], so the countdown is always modified from the session's thread.
//!
//! Stopping the timer cancels the ticker: the thread is woken up and joined, and the channel is
//! dropped together with the ticks it still holds.

use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::TimerMode;

/// Period between two ticks.
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Result of a tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// The timer is not running. Nothing changed.
    Idle,

    /// One second elapsed. The value is the number of remaining seconds.
    Ticked(u32),

    /// The timer reached zero and stopped.
    Expired,
}

/// Background task that emits a tick every period.
pub struct Ticker {
    /// Set when the ticker must stop.
    cancelled: Arc<AtomicBool>,

    /// Pending ticks.
    receiver: async_channel::Receiver<()>,

    /// Ticker thread.
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn the ticker thread.
    pub fn spawn(period: Duration) -> Self {
        let (sender, receiver) = async_channel::unbounded::<()>();
        let cancelled: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));
        let flag: Arc<AtomicBool> = Arc::clone(&cancelled);

        let handle: JoinHandle<()> = thread::spawn(move || {
            let mut next: Instant = Instant::now() + period;
            loop {
                // `park_timeout` can return early: wait until the deadline is really reached
                let now: Instant = Instant::now();
                if now < next {
                    thread::park_timeout(next - now);
                    if flag.load(Ordering::Acquire) {
                        break;
                    }
                    continue;
                }
                if flag.load(Ordering::Acquire) || sender.send_blocking(()).is_err() {
                    break;
                }
                next += period;
            }
            debug!("Ticker stopped");
        });

        Self {
            cancelled,
            receiver,
            handle: Some(handle),
        }
    }

    /// Return the number of ticks received since the last call.
    pub fn drain(&self) -> u32 {
        let mut count: u32 = 0;
        while self.receiver.try_recv().is_ok() {
            count += 1;
        }
        count
    }

    /// Stop the ticker thread and wait for it. Pending ticks are discarded.
    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
        self.receiver.close();
        // A closed channel still delivers the queued messages
        self.drain();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Mission countdown.
pub struct MissionTimer {
    /// Remaining seconds.
    seconds_remaining: u32,

    /// Whether the countdown is running.
    running: bool,

    /// Whether ticks come from a background thread or from the caller.
    mode: TimerMode,

    /// Background ticker, while the countdown runs in [`TimerMode::Background`] mode.
    ticker: Option<Ticker>,
}

impl MissionTimer {
    /// Create a stopped [`MissionTimer`] object.
    pub fn new(seconds: u32, mode: TimerMode) -> Self {
        Self {
            seconds_remaining: seconds,
            running: false,
            mode,
            ticker: None,
        }
    }

    /// Remaining seconds.
    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    /// Whether the countdown is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the countdown reached zero.
    pub fn is_expired(&self) -> bool {
        self.seconds_remaining == 0
    }

    /// Start the countdown. Starting a running or an expired timer has no effect.
    pub fn start(&mut self) {
        if self.running || self.seconds_remaining == 0 {
            return;
        }
        self.running = true;
        if self.mode == TimerMode::Background {
            self.ticker = Some(Ticker::spawn(TICK_PERIOD));
        }
        debug!("Timer started at {}s", self.seconds_remaining);
    }

    /// Stop the countdown and cancel the pending ticks.
    pub fn stop(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
        if self.running {
            debug!("Timer stopped at {}s", self.seconds_remaining);
        }
        self.running = false;
    }

    /// Stop the countdown and set the remaining seconds.
    pub fn reset(&mut self, to_seconds: u32) {
        self.stop();
        self.seconds_remaining = to_seconds;
    }

    /// Remove one second.
    pub fn tick(&mut self) -> TimerEvent {
        if !self.running {
            return TimerEvent::Idle;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.stop();
            info!("Mission timer elapsed");
            return TimerEvent::Expired;
        }
        TimerEvent::Ticked(self.seconds_remaining)
    }

    /// Apply the ticks that the background ticker emitted since the last call.
    ///
    /// Return the last event, or [`TimerEvent::Idle`] when no tick was pending.
    pub fn pump(&mut self) -> TimerEvent {
        let pending: u32 = match &self.ticker {
            Some(ticker) => ticker.drain(),
            None => 0,
        };
        let mut event: TimerEvent = TimerEvent::Idle;
        for _ in 0..pending {
            event = self.tick();
            if event == TimerEvent::Expired {
                break;
            }
        }
        event
    }

    /// Format the remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.seconds_remaining / 60,
            self.seconds_remaining % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_countdown_stops_at_zero() {
        let mut timer: MissionTimer = MissionTimer::new(1200, TimerMode::Manual);
        timer.start();
        for _ in 0..1199 {
            assert!(matches!(timer.tick(), TimerEvent::Ticked(_)));
        }
        assert_eq!(timer.tick(), TimerEvent::Expired);
        assert_eq!(timer.seconds_remaining(), 0);
        assert!(!timer.is_running());

        // No further decrement
        assert_eq!(timer.tick(), TimerEvent::Idle);
        assert_eq!(timer.seconds_remaining(), 0);

        // An expired timer cannot be restarted
        timer.start();
        assert!(!timer.is_running());
    }

    #[test]
    fn stopped_timer_does_not_move() {
        let mut timer: MissionTimer = MissionTimer::new(10, TimerMode::Manual);
        assert_eq!(timer.tick(), TimerEvent::Idle);
        timer.start();
        timer.start();
        assert_eq!(timer.tick(), TimerEvent::Ticked(9));
        timer.stop();
        assert_eq!(timer.tick(), TimerEvent::Idle);
        assert_eq!(timer.seconds_remaining(), 9);
        timer.reset(30);
        assert_eq!(timer.seconds_remaining(), 30);
        assert!(!timer.is_running());
    }

    #[test]
    fn display_format() {
        let timer: MissionTimer = MissionTimer::new(1199, TimerMode::Manual);
        assert_eq!(timer.display(), "19:59");
        let timer: MissionTimer = MissionTimer::new(5, TimerMode::Manual);
        assert_eq!(timer.display(), "00:05");
    }

    #[test]
    fn ticker_emits_and_stops() {
        let mut ticker: Ticker = Ticker::spawn(Duration::from_millis(5));
        thread::sleep(Duration::from_millis(60));
        assert!(ticker.drain() > 0);
        ticker.cancel();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(ticker.drain(), 0);
    }

    #[test]
    fn background_timer_is_cancelled_on_stop() {
        let mut timer: MissionTimer = MissionTimer::new(100, TimerMode::Background);
        timer.start();
        assert!(timer.is_running());
        timer.stop();
        assert!(timer.ticker.is_none());
        assert_eq!(timer.pump(), TimerEvent::Idle);
        assert_eq!(timer.seconds_remaining(), 100);
    }
}
