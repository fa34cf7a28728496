use crate::chip::Chip;
use crate::commands::{
    CalibrationMask, DioIrqConfig, IrqMask, LfClock, LfClockConfig, RegMode, RfSwitchConfig,
    RfSwitchDio, SleepConfig, StandbyConfig, TcxoConfig, TcxoVoltage,
};
use crate::encoder::LineEncoder;
use crate::error::Error;
use crate::hal::{FemRole, Hal, IrqHandle};
use crate::timer::Timer;

use super::{RadioState, Session, SessionError};

/// Settling time after reset and wake-up
pub const WAKE_UP_DELAY_MS: u32 = 150;
/// Settling time after calibration
pub const CALIBRATION_DELAY_MS: u32 = 50;
/// Settling time after entering standby
pub const STANDBY_DELAY_MS: u32 = 100;

/// TCXO start-up timeout, in RTC steps
const TCXO_TIMEOUT: u32 = 1;

const WAKE_UP_CALIBRATION: CalibrationMask = CalibrationMask::HF_RC
    .union(CalibrationMask::PLL)
    .union(CalibrationMask::ADC)
    .union(CalibrationMask::IMG)
    .union(CalibrationMask::PLL_TX);

/// Interrupts the session reacts to
const SESSION_IRQS: IrqMask = IrqMask::TX_DONE
    .union(IrqMask::RX_DONE)
    .union(IrqMask::ERROR);

impl<C, H, T, E> Session<C, H, T, E>
where
    C: Chip,
    H: Hal,
    T: Timer,
    E: LineEncoder,
{
    /// Opens the board and hooks the interrupt line.
    ///
    /// No chip communication happens here.
    pub fn open(&mut self) -> Result<(), SessionError<C, H, T>> {
        self.expect_state(&[RadioState::Closed])?;

        self.irq.set_enabled(false);
        self.irq.clear();
        let process = self.mode.callbacks().and_then(|cb| cb.process);
        self.hal
            .open(IrqHandle::new(self.irq, process))
            .map_err(Self::hal_err)?;

        self.set_state(RadioState::Sleeping);
        Ok(())
    }

    /// Releases the board. The chip must be asleep.
    pub fn close(&mut self) -> Result<(), SessionError<C, H, T>> {
        self.expect_state(&[RadioState::Sleeping])?;

        self.irq.set_enabled(false);
        self.hal.close().map_err(Self::hal_err)?;

        self.set_state(RadioState::Closed);
        Ok(())
    }

    /// Resets, configures and calibrates the chip, then parks it in
    /// standby with the crystal running.
    ///
    /// Stops at the first failing step. Interrupts are only enabled once
    /// every step succeeded; after a failure the whole sequence has to be
    /// run again.
    pub fn wake_up(&mut self) -> Result<(), SessionError<C, H, T>> {
        self.expect_state(&[RadioState::Sleeping])?;

        self.chip.reset().map_err(Self::reset_err)?;
        self.chip.wakeup().map_err(Self::wakeup_err)?;
        self.hal
            .delay_ms(WAKE_UP_DELAY_MS)
            .map_err(Self::hal_err)?;

        self.chip
            .set_reg_mode(RegMode::Ldo)
            .map_err(Self::system_err)?;
        let rf_switch = self.rf_switch_config()?;
        self.chip
            .set_dio_as_rf_switch(rf_switch)
            .map_err(Self::system_err)?;
        self.chip
            .config_lf_clock(LfClockConfig {
                source: LfClock::Rc,
                wait_xtal_ready: true,
            })
            .map_err(Self::system_err)?;
        self.chip.clear_errors().map_err(Self::system_err)?;
        self.chip
            .set_tcxo_mode(TcxoConfig {
                voltage: TcxoVoltage::V1_8,
                timeout: TCXO_TIMEOUT,
            })
            .map_err(Self::system_err)?;
        self.chip
            .calibrate(WAKE_UP_CALIBRATION)
            .map_err(Self::system_err)?;
        self.hal
            .delay_ms(CALIBRATION_DELAY_MS)
            .map_err(Self::hal_err)?;

        self.chip
            .set_standby(StandbyConfig::Xosc)
            .map_err(Self::system_err)?;
        self.hal
            .delay_ms(STANDBY_DELAY_MS)
            .map_err(Self::hal_err)?;

        self.chip
            .set_dio_irq_params(DioIrqConfig {
                irq1: SESSION_IRQS,
                irq2: IrqMask::empty(),
            })
            .map_err(Self::system_err)?;
        self.chip
            .clear_irq_status(IrqMask::ALL)
            .map_err(Self::system_err)?;

        let version = self.chip.get_version().map_err(Self::system_err)?;
        let errors = self.chip.get_errors().map_err(Self::system_err)?;
        if !errors.is_empty() {
            error!("radio reports errors after calibration: {:?}", errors);
            return Err(Error::LatchedErrors(errors));
        }
        info!("radio up, firmware {:?}", version);
        self.version = Some(version);
        self.clear_completion();

        self.irq.clear();
        self.irq.set_enabled(true);
        self.set_state(RadioState::Standby);
        Ok(())
    }

    /// Puts the chip into cold sleep. Interrupts are ignored until the next
    /// wake-up.
    pub fn sleep(&mut self) -> Result<(), SessionError<C, H, T>> {
        self.expect_state(&[RadioState::Sleeping, RadioState::Standby])?;

        self.irq.set_enabled(false);
        self.chip
            .set_sleep(SleepConfig::default())
            .map_err(Self::system_err)?;

        // a cold sleep loses the radio buffer
        self.clear_completion();
        self.set_state(RadioState::Sleeping);
        Ok(())
    }

    /// Cleanup after a reported error: clears the RX buffer, forces the
    /// chip to standby with both paths off, then puts it to sleep.
    ///
    /// Every step is attempted; failures are logged and otherwise ignored.
    pub fn recover(&mut self) {
        if self.state == RadioState::Closed {
            return;
        }

        if self.chip.clear_rx_buffer().is_err() {
            warn!("recover: clearing rx buffer failed");
        }
        if self.chip.set_standby(StandbyConfig::Xosc).is_err() {
            warn!("recover: standby failed");
        }
        if self.hal.rx_off().is_err() {
            warn!("recover: rx off failed");
        }
        if self.hal.tx_off().is_err() {
            warn!("recover: tx off failed");
        }
        self.in_flight = false;
        self.clear_completion();

        self.irq.set_enabled(false);
        self.irq.clear();
        if self.chip.set_sleep(SleepConfig::default()).is_err() {
            warn!("recover: sleep failed");
        }
        self.set_state(RadioState::Sleeping);
    }

    fn rf_switch_config(&mut self) -> Result<RfSwitchConfig, SessionError<C, H, T>> {
        let mut mask = |role| self.hal.fem_mask(role).map_err(Self::hal_err);

        Ok(RfSwitchConfig {
            enable: mask(FemRole::PinUsed)?,
            standby: mask(FemRole::Standby)?,
            tx: mask(FemRole::Tx)?,
            tx_hp: mask(FemRole::TxHp)?,
            rx: mask(FemRole::Rx)?,
            wifi: mask(FemRole::Wifi)?,
            gnss: mask(FemRole::Gnss)?,
            tx_hf: RfSwitchDio::empty(),
        })
    }
}
