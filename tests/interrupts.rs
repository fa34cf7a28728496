
use lr11xx_rf::commands::IrqMask;
use lr11xx_rf::{
    ChipBlock, Error, ErrorKind, ExecutionMode, Modulation, RadioParameters, Role, TxRequest,
};
use mock::events::{self, Event};
use mock::{awake, bench, callback_mode, raise, session, MockError};

fn tx_params() -> RadioParameters {
    RadioParameters {
        role: Role::Tx,
        frequency_hz: 868_130_000,
        modulation: Modulation::Dbpsk,
        bit_rate_bps: 100,
        deviation_hz: 0,
        tx_power_dbm: 14,
    }
}

#[test]
fn process_without_pending_interrupt_fails() {
    let bench = bench();
    let mut radio = awake(&bench, ExecutionMode::Blocking);

    assert_eq!(radio.process(), Err(Error::State));
    assert!(bench.borrow().calls.is_empty());
}

#[test]
fn spurious_process_reports_generic_error_in_callback_mode() {
    let bench = bench();
    let mut radio = awake(&bench, callback_mode());

    assert_eq!(radio.process(), Err(Error::State));
    assert_eq!(events::take(), [Event::Error(ErrorKind::Generic)]);
}

#[test]
fn each_edge_is_handled_once() {
    let bench = bench();
    let mut radio = awake(&bench, ExecutionMode::Blocking);

    raise(&bench, IrqMask::TX_DONE | IrqMask::RX_DONE);
    radio.process().unwrap();

    assert!(radio.is_tx_done());
    assert!(radio.is_rx_done());
    assert_eq!(
        bench.borrow().calls,
        ["get_and_clear_irq_status", "tx_off", "rx_off"]
    );

    assert_eq!(radio.process(), Err(Error::State));
    assert_eq!(bench.borrow().calls.len(), 3);
}

#[test]
fn interrupts_before_wake_up_are_ignored() {
    let bench = bench();
    let mut radio = session(&bench, callback_mode());
    radio.open().unwrap();

    raise(&bench, IrqMask::TX_DONE);

    assert!(events::take().is_empty());
    assert_eq!(radio.process(), Err(Error::State));
    assert!(!radio.is_tx_done());
}

#[test]
fn process_callback_fires_from_interrupt() {
    let bench = bench();
    let _radio = awake(&bench, callback_mode());

    raise(&bench, IrqMask::RX_DONE);
    raise(&bench, IrqMask::RX_DONE);

    assert_eq!(events::take(), [Event::Process, Event::Process]);
}

#[test]
fn status_is_handled_in_fixed_order() {
    let bench = bench();
    bench.borrow_mut().tx_irq = IrqMask::TX_DONE | IrqMask::RX_DONE | IrqMask::ERROR;
    let mut radio = awake(&bench, callback_mode());
    radio.init(&tx_params()).unwrap();
    bench.borrow_mut().calls.clear();

    radio
        .send(&TxRequest {
            bitstream: &[0xAB],
            on_complete: Some(events::on_tx_complete),
        })
        .unwrap();
    radio.process().unwrap();

    assert_eq!(
        events::take(),
        [
            Event::Process,
            Event::TxComplete,
            Event::Error(ErrorKind::ChipIrq)
        ]
    );
    assert_eq!(
        &bench.borrow().calls[4..],
        ["get_and_clear_irq_status", "tx_off", "rx_off"]
    );
    assert!(radio.is_tx_done());
    assert!(radio.is_rx_done());
    assert!(radio.has_error());
}

#[test]
fn chip_error_interrupt_reaches_error_callback() {
    let bench = bench();
    bench.borrow_mut().tx_irq = IrqMask::ERROR;
    let mut radio = awake(&bench, callback_mode());
    radio.init(&tx_params()).unwrap();

    radio.send(&TxRequest::new(&[0xAB])).unwrap();
    radio.process().unwrap();

    assert_eq!(
        events::take(),
        [Event::Process, Event::Error(ErrorKind::ChipIrq)]
    );
    assert!(radio.has_error());
    assert!(!radio.is_tx_done());

    // the failed attempt no longer blocks a retry
    bench.borrow_mut().tx_irq = IrqMask::TX_DONE;
    radio.send(&TxRequest::new(&[0xAB])).unwrap();
}

#[test]
fn status_read_failure_is_reported() {
    let bench = bench();
    let mut radio = awake(&bench, callback_mode());

    raise(&bench, IrqMask::TX_DONE);
    bench.borrow_mut().fail_next();

    assert_eq!(
        radio.process(),
        Err(Error::Chip {
            block: ChipBlock::System,
            source: MockError("get_and_clear_irq_status"),
        })
    );
    assert_eq!(
        events::take(),
        [Event::Process, Event::Error(ErrorKind::Generic)]
    );
    assert!(!radio.is_tx_done());

    // the edge was consumed
    assert_eq!(radio.process(), Err(Error::State));
}

#[test]
fn board_failure_while_handling_is_hardware_error() {
    let bench = bench();
    let mut radio = awake(&bench, ExecutionMode::Blocking);

    raise(&bench, IrqMask::TX_DONE);
    bench.borrow_mut().fail_at = Some(1);

    assert_eq!(radio.process(), Err(Error::Hardware(MockError("tx_off"))));
    assert_eq!(
        radio.process().map_err(|e| e.kind()),
        Err(ErrorKind::State)
    );
}
