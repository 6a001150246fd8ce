//! Recording test doubles for every hardware collaborator
//!
//! All mocks append to one shared [`HwTrace`], so tests can assert on the
//! global order of hardware operations and outbound events.

use std::sync::{Arc, Mutex};
use std::vec::Vec;

pub use embassy_futures::block_on;
use embassy_futures::yield_now;

use embedded_hal_async::delay::DelayNs;
use fpsense_hal::{ClockError, ClockSource, GpioLine, IrqLine, LineError, Monotonic, Trigger, WakeSource};
use fpsense_protocol::NetEvent;

use crate::board::{Board, SensorParts};
use crate::fanout::{EventFanout, SessionId};
use crate::input::InputReporter;

/// One recorded operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Request(&'static str),
    Release(&'static str),
    ConfigureOutput(&'static str, bool),
    ConfigureInput(&'static str),
    SetLevel(&'static str, bool),
    Register(Trigger, bool),
    Unregister,
    IrqEnable,
    IrqDisable,
    ArmWake,
    DisarmWake,
    ClockEnable(&'static str),
    ClockDisable(&'static str),
    SetRate(&'static str, u64),
    Delay(u32),
    StayAwake(u32),
    Key(u16, i32),
    Sync,
    Broadcast(NetEvent),
    Signal(SessionId),
    Unsubscribe(SessionId),
}

#[derive(Default)]
struct Inner {
    ops: Vec<Op>,
    failing: Vec<Op>,
    now_ms: u64,
    yield_on_delay: bool,
}

/// Shared operation log and fault injector
#[derive(Clone, Default)]
pub struct HwTrace {
    inner: Arc<Mutex<Inner>>,
}

impl HwTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `op`; returns `Err` if a failure was injected for it
    fn record(&self, op: Op) -> Result<(), ()> {
        let mut inner = self.inner.lock().unwrap();
        let fail = inner.failing.contains(&op);
        inner.ops.push(op);
        if fail {
            Err(())
        } else {
            Ok(())
        }
    }

    /// Make every future occurrence of `op` fail
    pub fn fail_on(&self, op: Op) {
        self.inner.lock().unwrap().failing.push(op);
    }

    /// Stop injecting failures
    pub fn heal(&self) {
        self.inner.lock().unwrap().failing.clear();
    }

    /// Copy of every recorded operation
    pub fn ops(&self) -> Vec<Op> {
        self.inner.lock().unwrap().ops.clone()
    }

    /// Forget recorded operations
    pub fn clear(&self) {
        self.inner.lock().unwrap().ops.clear();
    }

    /// Number of recorded operations matching `pred`
    pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.inner.lock().unwrap().ops.iter().filter(|op| pred(op)).count()
    }

    /// Make every delay yield once to the executor before completing
    pub fn yield_on_delay(&self) {
        self.inner.lock().unwrap().yield_on_delay = true;
    }

    fn yields(&self) -> bool {
        self.inner.lock().unwrap().yield_on_delay
    }

    /// Advance the mock clock
    pub fn advance_ms(&self, ms: u64) {
        self.inner.lock().unwrap().now_ms += ms;
    }

    pub fn now_ms(&self) -> u64 {
        self.inner.lock().unwrap().now_ms
    }
}

/// GPIO line that also serves as the interrupt line
pub struct MockLine {
    name: &'static str,
    trace: HwTrace,
    high: bool,
}

impl MockLine {
    pub fn new(name: &'static str, trace: &HwTrace) -> Self {
        Self {
            name,
            trace: trace.clone(),
            high: false,
        }
    }
}

impl GpioLine for MockLine {
    fn request(&mut self, _label: &'static str) -> Result<(), LineError> {
        self.trace.record(Op::Request(self.name)).map_err(|_| LineError::Busy)
    }

    fn release(&mut self) -> Result<(), LineError> {
        self.trace.record(Op::Release(self.name)).map_err(|_| LineError::Io)
    }

    fn configure_output(&mut self, high: bool) -> Result<(), LineError> {
        self.trace
            .record(Op::ConfigureOutput(self.name, high))
            .map_err(|_| LineError::Io)?;
        self.high = high;
        Ok(())
    }

    fn configure_input(&mut self) -> Result<(), LineError> {
        self.trace
            .record(Op::ConfigureInput(self.name))
            .map_err(|_| LineError::Io)
    }

    fn set_level(&mut self, high: bool) -> Result<(), LineError> {
        self.trace
            .record(Op::SetLevel(self.name, high))
            .map_err(|_| LineError::Io)?;
        self.high = high;
        Ok(())
    }

    fn read_level(&self) -> Result<bool, LineError> {
        Ok(self.high)
    }
}

impl IrqLine for MockLine {
    fn register(&mut self, trigger: Trigger, oneshot: bool) -> Result<(), LineError> {
        self.trace
            .record(Op::Register(trigger, oneshot))
            .map_err(|_| LineError::IrqUnavailable)
    }

    fn unregister(&mut self) -> Result<(), LineError> {
        self.trace.record(Op::Unregister).map_err(|_| LineError::Io)
    }

    fn enable(&mut self) {
        let _ = self.trace.record(Op::IrqEnable);
    }

    fn disable(&mut self) {
        let _ = self.trace.record(Op::IrqDisable);
    }

    fn arm_wake(&mut self) -> Result<(), LineError> {
        self.trace
            .record(Op::ArmWake)
            .map_err(|_| LineError::IrqUnavailable)
    }

    fn disarm_wake(&mut self) -> Result<(), LineError> {
        self.trace
            .record(Op::DisarmWake)
            .map_err(|_| LineError::IrqUnavailable)
    }
}

/// Clock provider with a fixed set of supported rates
pub struct MockClock {
    name: &'static str,
    trace: HwTrace,
    rates: Vec<u64>,
}

impl MockClock {
    pub fn new(name: &'static str, trace: &HwTrace, rates: &[u64]) -> Self {
        let mut rates = rates.to_vec();
        rates.sort_unstable();
        Self {
            name,
            trace: trace.clone(),
            rates,
        }
    }
}

impl ClockSource for MockClock {
    fn enable(&mut self) -> Result<(), ClockError> {
        self.trace
            .record(Op::ClockEnable(self.name))
            .map_err(|_| ClockError::EnableFailed)
    }

    fn disable(&mut self) {
        let _ = self.trace.record(Op::ClockDisable(self.name));
    }

    /// Smallest supported rate at or above `hz`, else the largest
    fn round_rate(&self, hz: u64) -> u64 {
        self.rates
            .iter()
            .copied()
            .find(|&r| r >= hz)
            .or_else(|| self.rates.last().copied())
            .unwrap_or(0)
    }

    fn set_rate(&mut self, hz: u64) -> Result<(), ClockError> {
        self.trace
            .record(Op::SetRate(self.name, hz))
            .map_err(|_| ClockError::RateRejected)
    }
}

/// Delay that records the requested time
///
/// Completes immediately unless [`HwTrace::yield_on_delay`] is set, in
/// which case it suspends once so concurrent tasks can interleave.
pub struct MockDelay {
    trace: HwTrace,
}

impl MockDelay {
    pub fn new(trace: &HwTrace) -> Self {
        Self {
            trace: trace.clone(),
        }
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        let _ = self.trace.record(Op::Delay(ns / 1_000_000));
    }

    async fn delay_us(&mut self, us: u32) {
        let _ = self.trace.record(Op::Delay(us / 1_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        let _ = self.trace.record(Op::Delay(ms));
        self.trace.advance_ms(u64::from(ms));
        if self.trace.yields() {
            yield_now().await;
        }
    }
}

pub struct MockWake {
    trace: HwTrace,
}

impl MockWake {
    pub fn new(trace: &HwTrace) -> Self {
        Self {
            trace: trace.clone(),
        }
    }
}

impl WakeSource for MockWake {
    fn stay_awake(&self, hold_ms: u32) {
        let _ = self.trace.record(Op::StayAwake(hold_ms));
    }
}

/// Monotonic clock driven by [`HwTrace::advance_ms`]
pub struct MockTimer {
    trace: HwTrace,
}

impl MockTimer {
    pub fn new(trace: &HwTrace) -> Self {
        Self {
            trace: trace.clone(),
        }
    }
}

impl Monotonic for MockTimer {
    fn now_ms(&self) -> u64 {
        self.trace.now_ms()
    }
}

pub struct MockFanout {
    trace: HwTrace,
}

impl MockFanout {
    pub fn new(trace: &HwTrace) -> Self {
        Self {
            trace: trace.clone(),
        }
    }
}

impl EventFanout for MockFanout {
    fn broadcast(&self, event: NetEvent) {
        let _ = self.trace.record(Op::Broadcast(event));
    }

    fn signal(&self, session: SessionId) {
        let _ = self.trace.record(Op::Signal(session));
    }

    fn unsubscribe(&self, session: SessionId) {
        let _ = self.trace.record(Op::Unsubscribe(session));
    }
}

pub struct MockInput {
    trace: HwTrace,
}

impl MockInput {
    pub fn new(trace: &HwTrace) -> Self {
        Self {
            trace: trace.clone(),
        }
    }
}

impl InputReporter for MockInput {
    fn report_key(&self, code: u16, value: i32) {
        let _ = self.trace.record(Op::Key(code, value));
    }

    fn sync(&self) {
        let _ = self.trace.record(Op::Sync);
    }
}

/// Board built entirely from recording mocks
pub struct MockBoard;

impl Board for MockBoard {
    type Reset = MockLine;
    type Irq = MockLine;
    type Power = MockLine;
    type Clock = MockClock;
    type Delay = MockDelay;
    type Wake = MockWake;
    type Timer = MockTimer;
    type Fanout = MockFanout;
    type Input = MockInput;
}

/// Mock hardware bundle
///
/// Lines are named "reset", "irq" and "pwr"; clocks "core" and "iface"
/// support 500 kHz, 960 kHz and 2 MHz.
pub fn parts(trace: &HwTrace, with_power_line: bool, with_clocks: bool) -> SensorParts<MockBoard> {
    const RATES: &[u64] = &[500_000, 960_000, 2_000_000];

    SensorParts {
        reset: MockLine::new("reset", trace),
        irq: MockLine::new("irq", trace),
        power: with_power_line.then(|| MockLine::new("pwr", trace)),
        core_clock: with_clocks.then(|| MockClock::new("core", trace, RATES)),
        iface_clock: with_clocks.then(|| MockClock::new("iface", trace, RATES)),
        delay: MockDelay::new(trace),
        wake: MockWake::new(trace),
        timer: MockTimer::new(trace),
        fanout: MockFanout::new(trace),
        input: MockInput::new(trace),
    }
}
