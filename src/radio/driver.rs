//! Radio collaborator interfaces
//!
//! The link core never talks to hardware directly. The transceiver chip
//! driver and the RTTY/SSTV encoders sit behind these traits; the encoders
//! borrow the driver for each call since they modulate through it.

use crate::error::DriverResult;
use crate::types::{FskSettings, LoraSettings, RttySettings, SstvMode};

/// Transceiver chip driver
pub trait RadioDriver {
    /// Configure the chip for LoRa
    fn begin_lora(&mut self, settings: &LoraSettings) -> DriverResult;

    /// Configure the chip for FSK
    fn begin_fsk(&mut self, settings: &FskSettings) -> DriverResult;

    /// Enable or disable the hardware payload CRC
    fn set_crc(&mut self, enabled: bool) -> DriverResult;

    /// Transmit one packet (blocking until sent)
    fn transmit(&mut self, data: &[u8]) -> DriverResult;

    /// Enter continuous receive
    fn start_receive(&mut self) -> DriverResult;

    /// Enter standby (transmitter off)
    fn standby(&mut self) -> DriverResult;

    /// Route the chip's rising-edge "data ready" signal to the receive interrupt
    fn enable_data_ready_irq(&mut self);
}

/// RTTY line encoder
pub trait RttyClient<R> {
    /// Configure RTTY on an FSK-ready radio
    fn begin(&mut self, radio: &mut R, settings: &RttySettings) -> DriverResult;

    /// Transmit the idle (mark) carrier
    fn idle(&mut self, radio: &mut R);

    /// Transmit one line of text followed by a line break
    fn println(&mut self, radio: &mut R, line: &str) -> DriverResult;
}

/// SSTV image encoder
pub trait SstvClient<R> {
    /// Configure SSTV
    fn begin(&mut self, radio: &mut R, frequency: f32, mode: SstvMode) -> DriverResult;

    /// Set the line timing correction factor
    fn set_correction(&mut self, radio: &mut R, correction: f32) -> DriverResult;

    /// Transmit the sync (idle) tone
    fn idle(&mut self, radio: &mut R);

    /// Transmit the VIS header
    fn send_header(&mut self, radio: &mut R);

    /// Transmit one image line of 24-bit RGB pixels
    fn send_line(&mut self, radio: &mut R, line: &[u32]);
}
