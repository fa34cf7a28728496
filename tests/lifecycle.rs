
use lr11xx_rf::commands::{ChipErrors, IrqMask, RfSwitchDio, SleepConfig};
use lr11xx_rf::{
    Error, ErrorKind, ExecutionMode, Latency, Modulation, RadioParameters, RadioState, Role,
    RxRequest, TxRequest,
};
use mock::{awake, bench, callback_mode, raise, session, MockError, VERSION};

const WAKE_UP_SEQUENCE: [&str; 23] = [
    "reset",
    "wakeup",
    "delay_ms",
    "set_reg_mode",
    "fem_mask",
    "fem_mask",
    "fem_mask",
    "fem_mask",
    "fem_mask",
    "fem_mask",
    "fem_mask",
    "set_dio_as_rf_switch",
    "config_lf_clock",
    "clear_errors",
    "set_tcxo_mode",
    "calibrate",
    "delay_ms",
    "set_standby",
    "delay_ms",
    "set_dio_irq_params",
    "clear_irq_status",
    "get_version",
    "get_errors",
];

fn tx_params(bit_rate_bps: u16) -> RadioParameters {
    RadioParameters {
        role: Role::Tx,
        frequency_hz: 868_130_000,
        modulation: Modulation::Dbpsk,
        bit_rate_bps,
        deviation_hz: 0,
        tx_power_dbm: 14,
    }
}

#[test]
fn open_touches_only_the_board() {
    let bench = bench();
    let mut radio = session(&bench, ExecutionMode::Blocking);

    radio.open().unwrap();

    assert_eq!(radio.state(), RadioState::Sleeping);
    assert_eq!(bench.borrow().calls, ["hal_open"]);
    assert!(bench.borrow().irq.is_some());
}

#[test]
fn wake_up_runs_full_sequence() {
    let bench = bench();
    let mut radio = session(&bench, ExecutionMode::Blocking);
    radio.open().unwrap();
    bench.borrow_mut().calls.clear();

    radio.wake_up().unwrap();

    let bench = bench.borrow();
    assert_eq!(bench.calls, WAKE_UP_SEQUENCE);
    assert_eq!(radio.state(), RadioState::Standby);
    assert_eq!(radio.chip_version(), Some(VERSION));

    let rf_switch = bench.rf_switch.unwrap();
    assert_eq!(
        rf_switch.enable,
        RfSwitchDio::DIO5 | RfSwitchDio::DIO6 | RfSwitchDio::DIO7
    );
    assert_eq!(rf_switch.rx, RfSwitchDio::DIO5);
    assert_eq!(rf_switch.tx, RfSwitchDio::DIO6);
    assert_eq!(rf_switch.tx_hp, RfSwitchDio::DIO7);
    assert_eq!(rf_switch.tx_hf, RfSwitchDio::empty());

    let irq = bench.irq_config.unwrap();
    assert_eq!(irq.irq1, IrqMask::TX_DONE | IrqMask::RX_DONE | IrqMask::ERROR);
    assert!(irq.irq2.is_empty());
}

#[test]
fn wake_up_stops_at_first_failure() {
    for step in 0..WAKE_UP_SEQUENCE.len() {
        let bench = bench();
        let mut radio = session(&bench, ExecutionMode::Blocking);
        radio.open().unwrap();
        bench.borrow_mut().calls.clear();
        bench.borrow_mut().fail_at = Some(step);

        let err = radio.wake_up().unwrap_err();

        assert_eq!(
            bench.borrow().calls,
            WAKE_UP_SEQUENCE[..=step],
            "calls after failing step {step}"
        );
        assert_eq!(radio.state(), RadioState::Sleeping);
        assert_eq!(radio.chip_version(), None);

        let expected = match WAKE_UP_SEQUENCE[step] {
            "reset" => ErrorKind::ChipReset,
            "wakeup" => ErrorKind::ChipWakeup,
            "delay_ms" | "fem_mask" => ErrorKind::Hardware,
            _ => ErrorKind::ChipSystem,
        };
        assert_eq!(err.kind(), expected, "error kind for step {step}");

        // interrupts stay disabled after a failed wake-up
        raise(&bench, IrqMask::TX_DONE);
        assert_eq!(radio.process(), Err(Error::State));
    }
}

#[test]
fn wake_up_can_be_rerun_after_failure() {
    let bench = bench();
    let mut radio = session(&bench, ExecutionMode::Blocking);
    radio.open().unwrap();
    bench.borrow_mut().fail_at = Some(5);

    assert!(radio.wake_up().is_err());

    bench.borrow_mut().fail_at = None;
    radio.wake_up().unwrap();
    assert_eq!(radio.state(), RadioState::Standby);
}

#[test]
fn latched_chip_errors_fail_wake_up() {
    let bench = bench();
    bench.borrow_mut().errors = ChipErrors::PLL_LOCK;
    let mut radio = session(&bench, ExecutionMode::Blocking);
    radio.open().unwrap();

    assert_eq!(
        radio.wake_up(),
        Err(Error::LatchedErrors(ChipErrors::PLL_LOCK))
    );
    assert_eq!(radio.state(), RadioState::Sleeping);
}

#[test]
fn wake_up_failure_reports_the_chip_error() {
    let bench = bench();
    let mut radio = session(&bench, ExecutionMode::Blocking);
    radio.open().unwrap();
    bench.borrow_mut().fail_next();

    assert_eq!(
        radio.wake_up(),
        Err(Error::Chip {
            block: lr11xx_rf::ChipBlock::Reset,
            source: MockError("reset"),
        })
    );
}

#[test]
fn out_of_order_operations_are_rejected() {
    let bench = bench();
    let mut radio = session(&bench, ExecutionMode::Blocking);

    assert_eq!(radio.wake_up(), Err(Error::State));
    assert_eq!(radio.sleep(), Err(Error::State));
    assert_eq!(radio.close(), Err(Error::State));
    assert!(bench.borrow().calls.is_empty());

    radio.open().unwrap();
    assert_eq!(radio.open(), Err(Error::State));
    assert_eq!(radio.init(&tx_params(100)), Err(Error::State));
    assert_eq!(radio.de_init(), Err(Error::State));

    radio.wake_up().unwrap();
    assert_eq!(radio.close(), Err(Error::State));
    assert_eq!(radio.send(&TxRequest::new(&[0x01])), Err(Error::State));
    assert_eq!(radio.receive(&RxRequest::default()), Err(Error::State));

    radio.init(&tx_params(100)).unwrap();
    assert_eq!(radio.init(&tx_params(100)), Err(Error::State));
    assert_eq!(radio.receive(&RxRequest::default()), Err(Error::State));
    assert_eq!(radio.sleep(), Err(Error::State));

    bench.borrow_mut().calls.clear();
    assert_eq!(radio.close(), Err(Error::State));
    assert!(bench.borrow().calls.is_empty());
}

#[test]
fn full_lifecycle_returns_to_closed() {
    let bench = bench();
    let mut radio = session(&bench, ExecutionMode::Blocking);

    radio.open().unwrap();
    radio.wake_up().unwrap();
    radio.init(&tx_params(100)).unwrap();
    radio.send(&TxRequest::new(&[0xAB, 0xCD])).unwrap();
    radio.de_init().unwrap();
    radio.sleep().unwrap();
    radio.close().unwrap();

    assert_eq!(radio.state(), RadioState::Closed);
    assert!(bench.borrow().irq.is_none());
    assert_eq!(bench.borrow().calls.last(), Some(&"hal_close"));

    radio.open().unwrap();
    assert_eq!(radio.state(), RadioState::Sleeping);
}

#[test]
fn sleep_is_cold_and_ignores_interrupts() {
    let bench = bench();
    let mut radio = awake(&bench, ExecutionMode::Blocking);

    radio.sleep().unwrap();

    assert_eq!(bench.borrow().calls, ["set_sleep"]);
    assert_eq!(bench.borrow().sleep, Some(SleepConfig::default()));

    raise(&bench, IrqMask::TX_DONE);
    assert_eq!(radio.process(), Err(Error::State));
    assert!(!radio.is_tx_done());
}

#[test]
fn de_init_turns_both_paths_off() {
    let bench = bench();
    let mut radio = awake(&bench, ExecutionMode::Blocking);
    radio.init(&tx_params(100)).unwrap();
    bench.borrow_mut().calls.clear();

    radio.de_init().unwrap();

    assert_eq!(bench.borrow().calls, ["set_standby", "rx_off", "tx_off"]);
    assert_eq!(radio.state(), RadioState::Standby);

    // also accepted from standby
    radio.de_init().unwrap();
}

#[test]
fn recover_silences_radio_best_effort() {
    let bench = bench();
    let mut radio = awake(&bench, callback_mode());
    radio
        .init(&RadioParameters {
            role: Role::Rx,
            frequency_hz: 869_525_000,
            modulation: Modulation::Gfsk,
            bit_rate_bps: 600,
            deviation_hz: 800,
            tx_power_dbm: 0,
        })
        .unwrap();
    bench.borrow_mut().rx_irq = IrqMask::empty();
    radio.receive(&RxRequest::default()).unwrap();
    assert!(bench.borrow().rx_enabled);

    bench.borrow_mut().calls.clear();
    bench.borrow_mut().fail_next();
    radio.recover();

    assert_eq!(
        bench.borrow().calls,
        ["clear_rx_buffer", "set_standby", "rx_off", "tx_off", "set_sleep"]
    );
    assert!(!bench.borrow().rx_enabled);
    assert_eq!(radio.state(), RadioState::Sleeping);

    // a fresh wake-up works afterwards
    radio.wake_up().unwrap();
}

#[test]
fn recover_on_closed_session_does_nothing() {
    let bench = bench();
    let mut radio = session(&bench, ExecutionMode::Blocking);

    radio.recover();

    assert!(bench.borrow().calls.is_empty());
    assert_eq!(radio.state(), RadioState::Closed);
}

#[test]
fn wake_up_latency_adds_board_figures() {
    let bench = bench();
    bench.borrow_mut().hal_latency = (10, 7);
    let mut radio = session(&bench, ExecutionMode::Blocking);

    assert_eq!(radio.latency(Latency::WakeUp), Ok(549));
}

#[test]
fn fixed_latencies() {
    let bench = bench();
    let mut radio = session(&bench, ExecutionMode::Blocking);

    assert_eq!(radio.latency(Latency::ReceiveStop), Ok(5));
    for phase in [
        Latency::InitTx,
        Latency::DeInitTx,
        Latency::Sleep,
        Latency::InitRx,
        Latency::ReceiveStart,
        Latency::DeInitRx,
    ] {
        assert_eq!(radio.latency(phase), Ok(0), "{phase:?}");
    }
}

#[test]
fn send_latency_follows_configured_bit_rate() {
    let bench = bench();
    let mut radio = awake(&bench, ExecutionMode::Blocking);

    assert_eq!(radio.latency(Latency::SendStart), Err(Error::State));
    assert_eq!(radio.latency(Latency::SendStop), Err(Error::State));

    radio.init(&tx_params(100)).unwrap();
    assert_eq!(radio.latency(Latency::SendStart), Ok(20));
    assert_eq!(radio.latency(Latency::SendStop), Ok(90));

    radio.de_init().unwrap();
    radio.init(&tx_params(600)).unwrap();
    assert_eq!(radio.latency(Latency::SendStart), Ok(3));
    assert_eq!(radio.latency(Latency::SendStop), Ok(15));
}

#[test]
fn zero_bit_rate_send_latency_is_rejected() {
    let bench = bench();
    let mut radio = awake(&bench, ExecutionMode::Blocking);
    radio.init(&tx_params(0)).unwrap();

    assert_eq!(radio.latency(Latency::SendStart), Err(Error::State));
}

#[test]
fn adapter_version_follows_crate_version() {
    let bench = bench();
    let radio = session(&bench, ExecutionMode::Blocking);

    assert_eq!(
        lr11xx_rf::ADAPTER_VERSION,
        concat!("v", env!("CARGO_PKG_VERSION"))
    );
    assert_eq!(radio.adapter_version(), lr11xx_rf::ADAPTER_VERSION);
}

#[test]
fn completion_flags_reset_on_wake_up() {
    let bench = bench();
    let mut radio = awake(&bench, ExecutionMode::Blocking);
    radio.init(&tx_params(100)).unwrap();
    radio.send(&TxRequest::new(&[0xAB])).unwrap();
    assert!(radio.is_tx_done());

    radio.de_init().unwrap();
    radio.sleep().unwrap();
    radio.wake_up().unwrap();

    assert!(!radio.is_tx_done());
    assert!(!radio.is_rx_done());
    assert!(!radio.has_error());
}
