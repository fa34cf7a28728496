//! Hardware boundary
//!
//! Board-specific glue the session calls into: the interrupt line, the
//! settling delays, the front-end module wiring and the TX/RX enable
//! signals. The board implements [`Hal`] and forwards its interrupt to the
//! [`IrqHandle`] it receives in [`Hal::open`].

use core::fmt::Debug;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::commands::RfSwitchDio;

/// Logical RF switch position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FemRole {
    /// Every DIO the board uses for the switch
    PinUsed,
    Standby,
    Rx,
    Tx,
    TxHp,
    Wifi,
    Gnss,
}

/// Board-dependent timings added to the wake-up estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalLatency {
    Reset,
    WakeUp,
}

/// Pending-interrupt flag shared between the interrupt handler and the
/// session.
///
/// Lives in a `static` so the handler can reach it without borrowing the
/// session:
///
/// ```
/// use lr11xx_rf::IrqLine;
///
/// static RADIO_IRQ: IrqLine = IrqLine::new();
/// assert!(!RADIO_IRQ.is_pending());
/// ```
#[derive(Debug)]
pub struct IrqLine {
    pending: AtomicBool,
    enabled: AtomicBool,
}

impl IrqLine {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            enabled: AtomicBool::new(false),
        }
    }

    /// An edge was observed and not yet processed.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// Consumes the pending edge, if any.
    ///
    /// Only the session clears the flag, so a plain load/store pair is
    /// enough and works on cores without compare-and-swap.
    pub(crate) fn take(&self) -> bool {
        let pending = self.pending.load(Ordering::Acquire);
        if pending {
            self.pending.store(false, Ordering::Release);
        }
        pending
    }

    pub(crate) fn clear(&self) {
        self.pending.store(false, Ordering::Release);
    }
}

impl Default for IrqLine {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle given to the board in [`Hal::open`].
///
/// Call [`IrqHandle::on_interrupt`] from the radio interrupt.
#[derive(Debug, Clone, Copy)]
pub struct IrqHandle {
    line: &'static IrqLine,
    process: Option<fn()>,
}

impl IrqHandle {
    pub(crate) fn new(line: &'static IrqLine, process: Option<fn()>) -> Self {
        Self { line, process }
    }

    /// Marks an interrupt as pending and requests processing.
    ///
    /// Ignored while the session has interrupts disabled.
    pub fn on_interrupt(&self) {
        if !self.line.is_enabled() {
            return;
        }
        self.line.pending.store(true, Ordering::Release);
        if let Some(process) = self.process {
            process();
        }
    }
}

/// Board support for the radio.
pub trait Hal {
    type Error: Debug;

    /// Configures the pins and hooks the radio interrupt to `irq`.
    fn open(&mut self, irq: IrqHandle) -> Result<(), Self::Error>;
    /// Releases everything acquired in [`Hal::open`].
    fn close(&mut self) -> Result<(), Self::Error>;
    fn delay_ms(&mut self, ms: u32) -> Result<(), Self::Error>;
    /// DIOs driven high for `role`.
    fn fem_mask(&mut self, role: FemRole) -> Result<RfSwitchDio, Self::Error>;
    fn tx_on(&mut self) -> Result<(), Self::Error>;
    fn tx_off(&mut self) -> Result<(), Self::Error>;
    fn rx_on(&mut self) -> Result<(), Self::Error>;
    fn rx_off(&mut self) -> Result<(), Self::Error>;

    /// Extra time in milliseconds spent by the board in `kind`.
    fn latency(&mut self, kind: HalLatency) -> Result<u32, Self::Error> {
        let _ = kind;
        Ok(0)
    }
}
