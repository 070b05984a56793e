//! Timer state machine
//!
//! The engine never reads a clock on its own. Callers pass `now` into every
//! time-dependent operation, and the remaining time is always derived from a
//! fixed end timestamp so late or skipped ticks correct themselves on the next
//! call.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use super::{
    snapshot::{format_clock, percent_complete},
    CustomInput, Mode, Phase, TimerConfig, TimerSnapshot,
};

/// Receives the completion signal when a countdown reaches zero
pub trait Notifier {
    /// Called exactly once per Running -> Finished transition
    fn notify_complete(&mut self, muted: bool);
}

/// Full mutable state owned by the engine
#[derive(Debug, Clone)]
struct TimerState {
    mode: Mode,
    total_duration: u64,
    remaining: u64,
    phase: Phase,
    end_timestamp: Option<DateTime<Utc>>,
    muted: bool,
    custom_input: CustomInput,
    committed_custom: Option<u64>,
}

/// Countdown engine for a single timer session
#[derive(Debug)]
pub struct TimerEngine<N> {
    config: TimerConfig,
    state: TimerState,
    notifier: N,
}

impl<N: Notifier> TimerEngine<N> {
    /// Create an idle engine in Work mode
    pub fn new(config: TimerConfig, notifier: N) -> Self {
        let work = config.work;
        Self {
            config,
            state: TimerState {
                mode: Mode::Work,
                total_duration: work,
                remaining: work,
                phase: Phase::Idle,
                end_timestamp: None,
                muted: false,
                custom_input: CustomInput::default(),
                committed_custom: None,
            },
            notifier,
        }
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining(&self) -> u64 {
        self.state.remaining
    }

    /// Duration a fresh session in the current mode would run for, if known
    fn session_duration(&self) -> Option<u64> {
        match self.config.duration_of(self.state.mode) {
            Some(secs) => Some(secs),
            None => self
                .state
                .committed_custom
                .or_else(|| self.state.custom_input.total_seconds()),
        }
    }

    /// Nominal idle duration: the preset, or the committed custom duration
    fn nominal_duration(&self) -> u64 {
        self.config
            .duration_of(self.state.mode)
            .or(self.state.committed_custom)
            .unwrap_or(0)
    }

    fn go_idle(&mut self) {
        let nominal = self.nominal_duration();
        self.state.phase = Phase::Idle;
        self.state.end_timestamp = None;
        self.state.total_duration = nominal;
        self.state.remaining = nominal;
    }

    /// Start a fresh session, or continue a paused one
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        match self.state.phase {
            Phase::Running => {
                debug!("Start ignored, timer already running");
                false
            }
            Phase::Paused => self.resume(now),
            Phase::Idle | Phase::Finished => {
                let Some(duration) = self.session_duration() else {
                    debug!("Start ignored, no positive custom duration");
                    return false;
                };
                let Some(end) = end_after(now, duration) else {
                    debug!("Start ignored, {}s is past the representable end time", duration);
                    return false;
                };
                if self.state.mode == Mode::Custom {
                    self.state.committed_custom = Some(duration);
                }
                self.state.total_duration = duration;
                self.state.remaining = duration;
                self.state.end_timestamp = Some(end);
                self.state.phase = Phase::Running;
                info!("Timer started: mode={}, duration={}s", self.state.mode, duration);
                true
            }
        }
    }

    /// Freeze the countdown at its last computed value
    pub fn pause(&mut self) -> bool {
        if self.state.phase != Phase::Running {
            debug!("Pause ignored in phase {:?}", self.state.phase);
            return false;
        }
        self.state.phase = Phase::Paused;
        self.state.end_timestamp = None;
        info!("Timer paused with {}s remaining", self.state.remaining);
        true
    }

    /// Continue a paused countdown from exactly the frozen remaining time
    pub fn resume(&mut self, now: DateTime<Utc>) -> bool {
        if self.state.phase != Phase::Paused {
            debug!("Resume ignored in phase {:?}", self.state.phase);
            return false;
        }
        let Some(end) = end_after(now, self.state.remaining) else {
            debug!("Resume ignored, {}s is past the representable end time", self.state.remaining);
            return false;
        };
        self.state.end_timestamp = Some(end);
        self.state.phase = Phase::Running;
        info!("Timer resumed with {}s remaining", self.state.remaining);
        true
    }

    /// Return to Idle, restoring the mode's nominal duration
    pub fn stop(&mut self) -> bool {
        self.go_idle();
        info!("Timer stopped, {}s on the clock", self.state.remaining);
        true
    }

    /// Like `stop`, but Custom mode also forgets its committed duration and input
    pub fn reset(&mut self) -> bool {
        if self.state.mode == Mode::Custom {
            self.state.committed_custom = None;
            self.state.custom_input = CustomInput::default();
        }
        self.go_idle();
        info!("Timer reset, {}s on the clock", self.state.remaining);
        true
    }

    /// Change mode; only accepted while Idle or Finished
    pub fn switch_mode(&mut self, mode: Mode) -> bool {
        if matches!(self.state.phase, Phase::Running | Phase::Paused) {
            debug!("Mode switch to {} ignored in phase {:?}", mode, self.state.phase);
            return false;
        }
        self.state.mode = mode;
        self.state.committed_custom = None;
        self.go_idle();
        info!("Switched to {} mode", mode);
        true
    }

    /// Recompute the remaining time from the end timestamp
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if self.state.phase != Phase::Running {
            debug!("Tick ignored in phase {:?}", self.state.phase);
            return false;
        }
        let Some(end) = self.state.end_timestamp else {
            return false;
        };

        let remaining = seconds_until(end, now).min(self.state.total_duration);
        self.state.remaining = remaining;
        debug!("Tick: {}s remaining", remaining);

        if remaining == 0 {
            self.state.phase = Phase::Finished;
            self.state.end_timestamp = None;
            info!("Timer finished: mode={}, muted={}", self.state.mode, self.state.muted);
            self.notifier.notify_complete(self.state.muted);
        }
        true
    }

    pub fn set_muted(&mut self, muted: bool) -> bool {
        self.state.muted = muted;
        true
    }

    /// Store the pending custom duration text used by the next fresh Custom start
    pub fn set_custom_input(&mut self, input: CustomInput) -> bool {
        self.state.custom_input = input;
        true
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let state = &self.state;
        TimerSnapshot {
            mode: state.mode,
            phase: state.phase,
            total_duration: state.total_duration,
            remaining: state.remaining,
            end_timestamp: state.end_timestamp,
            muted: state.muted,
            custom_input: state.custom_input.clone(),
            committed_custom: state.committed_custom,
            percent_complete: percent_complete(state.total_duration, state.remaining),
            display: format_clock(state.remaining),
        }
    }
}

/// `now` plus `secs`, or `None` when the sum leaves chrono's date range
fn end_after(now: DateTime<Utc>, secs: u64) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(secs).ok()?;
    now.checked_add_signed(Duration::try_seconds(secs)?)
}

/// Whole seconds from `now` until `end`, rounded up, never negative
fn seconds_until(end: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (end - now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        ((millis + 999) / 1000) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Default)]
    struct RecordingNotifier {
        calls: Vec<bool>,
    }

    impl Notifier for RecordingNotifier {
        fn notify_complete(&mut self, muted: bool) {
            self.calls.push(muted);
        }
    }

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + millis).unwrap()
    }

    fn engine() -> TimerEngine<RecordingNotifier> {
        TimerEngine::new(TimerConfig::default(), RecordingNotifier::default())
    }

    fn assert_invariants(engine: &TimerEngine<RecordingNotifier>) {
        let snap = engine.snapshot();
        assert!(snap.remaining <= snap.total_duration, "{:?}", snap);
        if snap.phase == Phase::Finished {
            assert_eq!(snap.remaining, 0);
        }
        if snap.phase != Phase::Running {
            assert!(snap.end_timestamp.is_none());
        }
    }

    #[test]
    fn starts_idle_in_work_mode() {
        let snap = engine().snapshot();
        assert_eq!(snap.mode, Mode::Work);
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.remaining, 1500);
        assert_eq!(snap.total_duration, 1500);
        assert_eq!(snap.display, "25:00");
        assert!(snap.end_timestamp.is_none());
    }

    #[test]
    fn work_session_finishes_and_notifies_once() {
        let mut engine = engine();
        assert!(engine.start(at(0)));
        assert_eq!(engine.snapshot().end_timestamp, Some(at(1_500_000)));

        engine.tick(at(1_500_000));
        let snap = engine.snapshot();
        assert_eq!(snap.remaining, 0);
        assert_eq!(snap.phase, Phase::Finished);
        assert_eq!(snap.percent_complete, 100.0);
        assert_eq!(engine.notifier().calls, vec![false]);

        // late callbacks after completion change nothing
        assert!(!engine.tick(at(1_501_000)));
        assert_eq!(engine.notifier().calls.len(), 1);
        assert_invariants(&engine);
    }

    #[test]
    fn overdue_tick_never_goes_negative() {
        let mut engine = engine();
        engine.switch_mode(Mode::ShortBreak);
        engine.start(at(0));
        engine.tick(at(10_000_000));
        assert_eq!(engine.remaining(), 0);
        assert_eq!(engine.phase(), Phase::Finished);
        assert_invariants(&engine);
    }

    #[test]
    fn rounds_partial_seconds_up() {
        let mut engine = engine();
        engine.start(at(0));
        engine.tick(at(400));
        assert_eq!(engine.remaining(), 1500);
        engine.tick(at(1_000));
        assert_eq!(engine.remaining(), 1499);
        engine.tick(at(1_499_001));
        assert_eq!(engine.remaining(), 1);
        assert_eq!(engine.phase(), Phase::Running);
    }

    #[test]
    fn delayed_ticks_self_correct() {
        let mut engine = engine();
        engine.start(at(0));
        engine.tick(at(1_000));
        // host was busy for a minute, nothing ticked
        engine.tick(at(61_000));
        assert_eq!(engine.remaining(), 1439);
    }

    #[test]
    fn custom_input_commits_duration() {
        let mut engine = engine();
        engine.switch_mode(Mode::Custom);
        assert_eq!(engine.snapshot().remaining, 0);

        engine.set_custom_input(CustomInput::new("1", "30"));
        assert!(engine.start(at(0)));
        let snap = engine.snapshot();
        assert_eq!(snap.total_duration, 90);
        assert_eq!(snap.remaining, 90);
        assert_eq!(snap.phase, Phase::Running);
        assert_eq!(snap.committed_custom, Some(90));
    }

    #[test]
    fn custom_start_without_positive_duration_is_noop() {
        let mut engine = engine();
        engine.switch_mode(Mode::Custom);
        let before = engine.snapshot();

        assert!(!engine.start(at(0)));
        engine.set_custom_input(CustomInput::new("0", "0"));
        assert!(!engine.start(at(0)));
        engine.set_custom_input(CustomInput::new("-2", ""));
        assert!(!engine.start(at(0)));

        let after = engine.snapshot();
        assert_eq!(after.phase, before.phase);
        assert_eq!(after.remaining, before.remaining);
        assert_eq!(after.total_duration, 0);
    }

    #[test]
    fn pause_excludes_time_spent_paused() {
        let mut engine = engine();
        engine.start(at(0));
        engine.tick(at(1_490_000));
        assert_eq!(engine.remaining(), 10);

        assert!(engine.pause());
        assert!(engine.snapshot().end_timestamp.is_none());
        // stray tick while paused
        assert!(!engine.tick(at(1_600_000)));
        assert_eq!(engine.remaining(), 10);

        assert!(engine.resume(at(5_000_000)));
        assert_eq!(engine.remaining(), 10);
        engine.tick(at(5_001_000));
        assert_eq!(engine.remaining(), 9);
        assert_invariants(&engine);
    }

    #[test]
    fn stop_while_paused_restores_nominal_duration() {
        let mut engine = engine();
        engine.start(at(0));
        engine.tick(at(1_458_000));
        engine.pause();
        assert_eq!(engine.remaining(), 42);

        assert!(engine.stop());
        let snap = engine.snapshot();
        assert_eq!(snap.remaining, 1500);
        assert_eq!(snap.phase, Phase::Idle);
        assert!(snap.end_timestamp.is_none());
    }

    #[test]
    fn stop_keeps_committed_custom_duration() {
        let mut engine = engine();
        engine.switch_mode(Mode::Custom);
        engine.set_custom_input(CustomInput::new("", "45"));
        engine.start(at(0));
        engine.tick(at(20_000));
        engine.stop();

        let snap = engine.snapshot();
        assert_eq!(snap.total_duration, 45);
        assert_eq!(snap.remaining, 45);
        assert_eq!(snap.committed_custom, Some(45));

        // a new input does not override the committed session
        engine.set_custom_input(CustomInput::new("5", ""));
        engine.start(at(30_000));
        assert_eq!(engine.snapshot().total_duration, 45);
    }

    #[test]
    fn reset_clears_custom_session() {
        let mut engine = engine();
        engine.switch_mode(Mode::Custom);
        engine.set_custom_input(CustomInput::new("1", "30"));
        engine.start(at(0));
        engine.tick(at(5_000));

        assert!(engine.reset());
        let snap = engine.snapshot();
        assert_eq!(snap.total_duration, 0);
        assert_eq!(snap.remaining, 0);
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.committed_custom, None);
        assert!(snap.custom_input.is_empty());
        assert_eq!(snap.percent_complete, 0.0);
    }

    #[test]
    fn reset_in_fixed_mode_matches_stop() {
        let mut engine = engine();
        engine.switch_mode(Mode::LongBreak);
        engine.start(at(0));
        engine.tick(at(100_000));
        engine.reset();
        let snap = engine.snapshot();
        assert_eq!(snap.remaining, 900);
        assert_eq!(snap.phase, Phase::Idle);
    }

    #[test]
    fn mode_switch_rejected_while_running_or_paused() {
        let mut engine = engine();
        engine.start(at(0));
        let running = engine.snapshot();
        assert!(!engine.switch_mode(Mode::ShortBreak));
        assert_eq!(engine.snapshot(), running);

        engine.pause();
        let paused = engine.snapshot();
        assert!(!engine.switch_mode(Mode::LongBreak));
        assert_eq!(engine.snapshot(), paused);
    }

    #[test]
    fn mode_switch_accepted_from_idle_and_finished() {
        let mut engine = engine();
        assert!(engine.switch_mode(Mode::ShortBreak));
        assert_eq!(engine.snapshot().remaining, 300);

        engine.start(at(0));
        engine.tick(at(300_000));
        assert_eq!(engine.phase(), Phase::Finished);

        assert!(engine.switch_mode(Mode::Work));
        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.remaining, 1500);
        assert_invariants(&engine);
    }

    #[test]
    fn switching_away_from_custom_drops_committed_duration() {
        let mut engine = engine();
        engine.switch_mode(Mode::Custom);
        engine.set_custom_input(CustomInput::new("2", "0"));
        engine.start(at(0));
        engine.stop();
        engine.switch_mode(Mode::Work);
        engine.switch_mode(Mode::Custom);

        let snap = engine.snapshot();
        assert_eq!(snap.committed_custom, None);
        assert_eq!(snap.remaining, 0);
    }

    #[test]
    fn start_twice_is_idempotent() {
        let mut engine = engine();
        engine.start(at(0));
        let once = engine.snapshot();
        assert!(!engine.start(at(3_000)));
        assert_eq!(engine.snapshot(), once);
    }

    #[test]
    fn start_while_paused_resumes() {
        let mut engine = engine();
        engine.start(at(0));
        engine.tick(at(5_000));
        engine.pause();
        assert!(engine.start(at(60_000)));
        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::Running);
        assert_eq!(snap.remaining, 1495);
        assert_eq!(snap.end_timestamp, Some(at(60_000 + 1_495_000)));
    }

    #[test]
    fn pause_and_resume_in_wrong_phase_are_noops() {
        let mut engine = engine();
        assert!(!engine.pause());
        assert!(!engine.resume(at(0)));
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn restart_after_finish_runs_a_full_session() {
        let mut engine = engine();
        engine.switch_mode(Mode::ShortBreak);
        engine.start(at(0));
        engine.tick(at(300_000));
        assert!(engine.start(at(400_000)));
        let snap = engine.snapshot();
        assert_eq!(snap.remaining, 300);
        assert_eq!(snap.phase, Phase::Running);
    }

    #[test]
    fn muted_completion_still_finishes() {
        let mut engine = engine();
        engine.set_muted(true);
        engine.switch_mode(Mode::ShortBreak);
        engine.start(at(0));
        engine.tick(at(300_000));
        assert_eq!(engine.phase(), Phase::Finished);
        assert_eq!(engine.notifier().calls, vec![true]);
    }

    #[test]
    fn percent_complete_tracks_elapsed_share() {
        let mut engine = engine();
        engine.switch_mode(Mode::ShortBreak);
        engine.start(at(0));
        engine.tick(at(150_000));
        assert_eq!(engine.snapshot().percent_complete, 50.0);
    }

    #[test]
    fn oversized_custom_duration_is_rejected() {
        let mut engine = engine();
        engine.switch_mode(Mode::Custom);
        let before = engine.snapshot();

        engine.set_custom_input(CustomInput::new("1000000000000", "0"));
        assert!(!engine.start(at(0)));
        engine.set_custom_input(CustomInput::new("", "18446744073709551615"));
        assert!(!engine.start(at(0)));

        let after = engine.snapshot();
        assert_eq!(after.phase, Phase::Idle);
        assert_eq!(after.remaining, before.remaining);
        assert_eq!(after.committed_custom, None);
        assert_invariants(&engine);

        // the engine stays usable with a sane duration afterwards
        engine.set_custom_input(CustomInput::new("1", "0"));
        assert!(engine.start(at(0)));
        assert_eq!(engine.snapshot().total_duration, 60);
    }

    #[test]
    fn oversized_preset_duration_is_rejected() {
        let config = TimerConfig { work: u64::MAX, short_break: 300, long_break: 900 };
        let mut engine = TimerEngine::new(config, RecordingNotifier::default());
        assert!(!engine.start(at(0)));
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.snapshot().end_timestamp.is_none());
    }

    #[test]
    fn invariants_hold_after_every_operation() {
        type Engine = TimerEngine<RecordingNotifier>;
        type Step = fn(&mut Engine, i64);

        let mut engine = engine();
        let mut clock = 0;
        let steps: [Step; 21] = [
            |e: &mut Engine, now: i64| { e.start(at(now)); },
            |e: &mut Engine, now: i64| { e.tick(at(now)); },
            |e: &mut Engine, _: i64| { e.pause(); },
            |e: &mut Engine, _: i64| { e.switch_mode(Mode::ShortBreak); },
            |e: &mut Engine, now: i64| { e.tick(at(now)); },
            |e: &mut Engine, now: i64| { e.resume(at(now)); },
            |e: &mut Engine, now: i64| { e.tick(at(now)); },
            |e: &mut Engine, now: i64| { e.tick(at(now + 2_000_000)); },
            |e: &mut Engine, _: i64| { e.switch_mode(Mode::Custom); },
            |e: &mut Engine, now: i64| { e.start(at(now)); },
            |e: &mut Engine, _: i64| { e.set_custom_input(CustomInput::new("0", "5")); },
            |e: &mut Engine, now: i64| { e.start(at(now)); },
            |e: &mut Engine, now: i64| { e.tick(at(now)); },
            |e: &mut Engine, _: i64| { e.stop(); },
            |e: &mut Engine, now: i64| { e.start(at(now)); },
            |e: &mut Engine, now: i64| { e.tick(at(now + 10_000)); },
            |e: &mut Engine, _: i64| { e.set_muted(true); },
            |e: &mut Engine, _: i64| { e.reset(); },
            |e: &mut Engine, _: i64| { e.switch_mode(Mode::LongBreak); },
            |e: &mut Engine, now: i64| { e.start(at(now)); },
            |e: &mut Engine, _: i64| { e.stop(); },
        ];

        for step in &steps {
            clock += 1_700;
            step(&mut engine, clock);
            assert_invariants(&engine);
        }
        assert_eq!(engine.notifier().calls, vec![false, false]);
    }
}
