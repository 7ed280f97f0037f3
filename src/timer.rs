//! Busy-wait microsecond timing on top of a free-running cycle counter.

use embedded_hal::delay::DelayNs;

/// Longest single spin, in microseconds.
///
/// Longer delays are split so the elapsed cycle count of one spin stays far
/// below the 32-bit counter wrap even at high core clocks.
const MAX_SPIN_US: u32 = 1_000;

/// A free-running, monotonically increasing CPU cycle counter.
pub trait CycleCounter {
    /// Starts the counter.
    fn enable(&mut self);

    /// Sets the counter back to zero.
    fn reset(&mut self);

    /// Current cycle count. Wraps at `u32::MAX`.
    fn cycles(&self) -> u32;
}

impl<T: CycleCounter + ?Sized> CycleCounter for &mut T {
    fn enable(&mut self) {
        T::enable(self)
    }

    fn reset(&mut self) {
        T::reset(self)
    }

    fn cycles(&self) -> u32 {
        T::cycles(self)
    }
}

/// Microsecond timer built from a [`CycleCounter`] and the core clock.
///
/// Constructing the timer initialises the counter, so every existing
/// `MicrosecondTimer` is ready to delay.
pub struct MicrosecondTimer<C> {
    counter: C,
    cycles_per_us: u32,
}

impl<C: CycleCounter> MicrosecondTimer<C> {
    /// Takes ownership of `counter`, resets it to zero and enables it.
    ///
    /// # Arguments
    ///
    /// * `counter` - The cycle counter of the core.
    /// * `core_clock_hz` - Frequency the counter runs at.
    pub fn new(mut counter: C, core_clock_hz: u32) -> Self {
        counter.reset();
        counter.enable();

        MicrosecondTimer {
            counter,
            cycles_per_us: (core_clock_hz / 1_000_000).max(1),
        }
    }

    /// Current cycle count.
    pub fn now(&self) -> u32 {
        self.counter.cycles()
    }

    pub fn cycles_per_us(&self) -> u32 {
        self.cycles_per_us
    }

    /// Microseconds elapsed since the cycle count `since`.
    pub fn elapsed_us(&self, since: u32) -> u32 {
        self.now().wrapping_sub(since) / self.cycles_per_us
    }

    /// Spins until at least `us` microseconds have elapsed.
    pub fn delay(&self, us: u32) {
        let mut remaining = us;
        while remaining > 0 {
            let step = remaining.min(MAX_SPIN_US);
            self.spin(step.saturating_mul(self.cycles_per_us));
            remaining -= step;
        }
    }

    /// Gives the counter back.
    pub fn release(self) -> C {
        self.counter
    }

    fn spin(&self, cycles: u32) {
        let start = self.counter.cycles();
        while self.counter.cycles().wrapping_sub(start) < cycles {}
    }
}

impl<C: CycleCounter> DelayNs for MicrosecondTimer<C> {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = (ns as u64 * self.cycles_per_us as u64).div_ceil(1_000);
        // whole microseconds go through delay() so long waits are chunked
        let us = (cycles / self.cycles_per_us as u64) as u32;
        let rest = (cycles % self.cycles_per_us as u64) as u32;
        self.delay(us);
        self.spin(rest);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay(1_000);
        }
    }
}

/// Cortex-M DWT cycle counter.
#[cfg(feature = "cortex-m")]
pub struct DwtCounter {
    dwt: cortex_m::peripheral::DWT,
}

#[cfg(feature = "cortex-m")]
impl DwtCounter {
    /// Enables trace in the DCB and takes the DWT peripheral.
    pub fn new(dcb: &mut cortex_m::peripheral::DCB, dwt: cortex_m::peripheral::DWT) -> Self {
        dcb.enable_trace();
        DwtCounter { dwt }
    }
}

#[cfg(feature = "cortex-m")]
impl CycleCounter for DwtCounter {
    fn enable(&mut self) {
        self.dwt.enable_cycle_counter();
    }

    fn reset(&mut self) {
        self.dwt.set_cycle_count(0);
    }

    fn cycles(&self) -> u32 {
        cortex_m::peripheral::DWT::cycle_count()
    }
}
