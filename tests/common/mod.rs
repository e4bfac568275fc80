//! Shared test doubles
//!
//! A scripted transceiver, alarm, delay and RTTY/SSTV clients. The radio
//! and the delay share one event log so tests can assert the exact
//! sequence of hardware interactions.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use sat_link::error::{DriverError, DriverResult};
use sat_link::link::AlarmTimer;
use sat_link::radio::{RadioDriver, RttyClient, SstvClient};
use sat_link::ssdo::packet::{decode, Frame, Ssdo, PACKET_SIZE};
use sat_link::types::{
    FskSettings, LoraSettings, ObjectType, RttySettings, SenderId, SstvMode,
};

/// One observable hardware interaction
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    BeginLora(LoraSettings),
    BeginFsk,
    SetCrc(bool),
    Transmit(Vec<u8>),
    StartReceive,
    Standby,
    EnableIrq,
    DelayMs(u32),
    RttyBegin,
    RttyIdle,
    RttyLine(String),
    SstvBegin(SstvMode),
    SstvCorrection,
    SstvIdle,
    SstvHeader,
    SstvLine(u32),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// Scripted transceiver
#[derive(Default)]
pub struct MockRadio {
    pub log: EventLog,
    /// Status returned by every `begin_lora`
    pub fail_lora: Option<i16>,
    /// Status returned by `begin_lora` for one frequency only
    pub fail_lora_at: Option<(f32, i16)>,
    pub fail_fsk: Option<i16>,
    /// Transmissions that succeed before every following one fails
    pub fail_transmit_after: Option<usize>,
    pub transmits: usize,
}

impl MockRadio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    /// Every transmitted payload, in order
    pub fn transmitted(&self) -> Vec<Vec<u8>> {
        self.log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Transmit(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

impl RadioDriver for MockRadio {
    fn begin_lora(&mut self, settings: &LoraSettings) -> DriverResult {
        self.push(Event::BeginLora(*settings));
        if let Some(code) = self.fail_lora {
            return Err(DriverError(code));
        }
        match self.fail_lora_at {
            Some((freq, code)) if freq == settings.frequency => Err(DriverError(code)),
            _ => Ok(()),
        }
    }

    fn begin_fsk(&mut self, _settings: &FskSettings) -> DriverResult {
        self.push(Event::BeginFsk);
        self.fail_fsk.map_or(Ok(()), |code| Err(DriverError(code)))
    }

    fn set_crc(&mut self, enabled: bool) -> DriverResult {
        self.push(Event::SetCrc(enabled));
        Ok(())
    }

    fn transmit(&mut self, data: &[u8]) -> DriverResult {
        self.push(Event::Transmit(data.to_vec()));
        self.transmits += 1;
        match self.fail_transmit_after {
            Some(limit) if self.transmits > limit => Err(DriverError(-1)),
            _ => Ok(()),
        }
    }

    fn start_receive(&mut self) -> DriverResult {
        self.push(Event::StartReceive);
        Ok(())
    }

    fn standby(&mut self) -> DriverResult {
        self.push(Event::Standby);
        Ok(())
    }

    fn enable_data_ready_irq(&mut self) {
        self.push(Event::EnableIrq);
    }
}

/// Delay that records instead of sleeping
pub struct MockDelay {
    pub log: EventLog,
}

impl MockDelay {
    pub fn sharing(radio: &MockRadio) -> Self {
        Self {
            log: Rc::clone(&radio.log),
        }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::DelayMs(ms));
    }
}

/// Alarm that records its programming
#[derive(Default)]
pub struct MockAlarm {
    pub interval_us: Cell<u64>,
    pub repeat: Cell<bool>,
    pub enabled: Cell<bool>,
    pub rearms: Cell<u32>,
}

impl AlarmTimer for MockAlarm {
    fn arm(&self, interval_us: u64, repeat: bool) {
        self.interval_us.set(interval_us);
        self.repeat.set(repeat);
    }

    fn rearm(&self) {
        self.rearms.set(self.rearms.get() + 1);
    }

    fn enable(&self) {
        self.enabled.set(true);
    }

    fn disable(&self) {
        self.enabled.set(false);
    }
}

/// RTTY client modulating through the mock radio's log
#[derive(Default)]
pub struct MockRtty {
    pub fail_begin: Option<i16>,
    pub fail_line: Option<i16>,
}

impl RttyClient<MockRadio> for MockRtty {
    fn begin(&mut self, radio: &mut MockRadio, _settings: &RttySettings) -> DriverResult {
        radio.push(Event::RttyBegin);
        self.fail_begin.map_or(Ok(()), |code| Err(DriverError(code)))
    }

    fn idle(&mut self, radio: &mut MockRadio) {
        radio.push(Event::RttyIdle);
    }

    fn println(&mut self, radio: &mut MockRadio, line: &str) -> DriverResult {
        radio.push(Event::RttyLine(line.to_owned()));
        self.fail_line.map_or(Ok(()), |code| Err(DriverError(code)))
    }
}

/// SSTV client recording the first pixel of every line
#[derive(Default)]
pub struct MockSstv {
    pub fail_begin: Option<i16>,
}

impl SstvClient<MockRadio> for MockSstv {
    fn begin(&mut self, radio: &mut MockRadio, _frequency: f32, mode: SstvMode) -> DriverResult {
        radio.push(Event::SstvBegin(mode));
        self.fail_begin.map_or(Ok(()), |code| Err(DriverError(code)))
    }

    fn set_correction(&mut self, radio: &mut MockRadio, _correction: f32) -> DriverResult {
        radio.push(Event::SstvCorrection);
        Ok(())
    }

    fn idle(&mut self, radio: &mut MockRadio) {
        radio.push(Event::SstvIdle);
    }

    fn send_header(&mut self, radio: &mut MockRadio) {
        radio.push(Event::SstvHeader);
    }

    fn send_line(&mut self, radio: &mut MockRadio, line: &[u32]) {
        radio.push(Event::SstvLine(line[0]));
    }
}

// ===== Fixtures =====

pub fn lora_default() -> LoraSettings {
    LoraSettings {
        frequency: 436.7,
        bandwidth: 125.0,
        spread_factor: 9,
        code_rate: 7,
        sync_word: 0x12,
        power: 17,
        current_limit: 100,
        preamble_length: 8,
        gain: 0,
    }
}

pub fn lora_alternate() -> LoraSettings {
    LoraSettings {
        frequency: 437.1,
        bandwidth: 250.0,
        spread_factor: 7,
        code_rate: 5,
        sync_word: 0x34,
        ..lora_default()
    }
}

pub fn fsk_default() -> FskSettings {
    FskSettings {
        frequency: 436.7,
        bit_rate: 4.8,
        freq_dev: 5.0,
        rx_bandwidth: 125.0,
        power: 10,
        preamble_length: 16,
        enable_ook: false,
        data_shaping: 0.5,
    }
}

pub fn rtty_default() -> RttySettings {
    RttySettings {
        frequency: 436.7,
        shift: 183,
        baud: 45,
        encoding: Default::default(),
        stop_bits: 1,
    }
}

/// Encode every fragment of `object`
pub fn encode_object(sender: u32, object_id: u32, object_type: ObjectType, object: &[u8]) -> Vec<Frame> {
    let ssdo = Ssdo::new(SenderId(sender), object_id, object_type);
    (0..Ssdo::fragment_count(object.len()))
        .map(|index| {
            let mut frame = [0u8; PACKET_SIZE];
            ssdo.encode(object, index, &mut frame).unwrap();
            frame
        })
        .collect()
}

/// Reassemble in-order frames (as captured from a transmit log)
pub fn reassemble(frames: &[Vec<u8>]) -> Vec<u8> {
    frames
        .iter()
        .flat_map(|f| decode(f).unwrap().1.to_vec())
        .collect()
}
