use crate::chip::Chip;
use crate::commands::IrqMask;
use crate::encoder::LineEncoder;
use crate::error::{Error, ErrorKind};
use crate::hal::Hal;
use crate::timer::Timer;

use super::{Session, SessionError};

impl<C, H, T, E> Session<C, H, T, E>
where
    C: Chip,
    H: Hal,
    T: Timer,
    E: LineEncoder,
{
    /// Handles the pending radio interrupt.
    ///
    /// Reads and clears the chip interrupt status, then handles TX done,
    /// RX done and chip error, in that order. Fails with [`Error::State`]
    /// when no interrupt is pending.
    ///
    /// In callback mode any failure is also reported to the error callback
    /// as [`ErrorKind::Generic`].
    pub fn process(&mut self) -> Result<(), SessionError<C, H, T>> {
        let result = self.handle_pending_irq();
        if let Err(e) = &result {
            error!("radio irq processing failed: {:?}", e.kind());
            if let Some(on_error) = self.mode.callbacks().and_then(|cb| cb.error) {
                on_error(ErrorKind::Generic);
            }
        }
        result
    }

    fn handle_pending_irq(&mut self) -> Result<(), SessionError<C, H, T>> {
        if !self.irq.take() {
            return Err(Error::State);
        }

        let irq = self
            .chip
            .get_and_clear_irq_status()
            .map_err(Self::system_err)?;
        trace!("radio irq {:?}", irq);

        if irq.contains(IrqMask::TX_DONE) {
            self.hal.tx_off().map_err(Self::hal_err)?;
            self.tx_done = true;
            self.in_flight = false;
            if let Some(on_tx_complete) = self.on_tx_complete {
                on_tx_complete();
            }
        }

        if irq.contains(IrqMask::RX_DONE) {
            self.hal.rx_off().map_err(Self::hal_err)?;
            self.rx_done = true;
            self.in_flight = false;
            if let Some(on_rx_data) = self.on_rx_data {
                on_rx_data();
            }
        }

        if irq.contains(IrqMask::ERROR) {
            self.error = true;
            self.in_flight = false;
            if let Some(on_error) = self.mode.callbacks().and_then(|cb| cb.error) {
                on_error(ErrorKind::ChipIrq);
            }
        }

        Ok(())
    }
}
