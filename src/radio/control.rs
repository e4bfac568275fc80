//! Radio Control Facade
//!
//! Owns the transceiver driver and composes the mode state machine, the
//! receive pipeline and the SSDO protocol into the public operations:
//! mode setup, per-mode sends, object transfer (optionally on a
//! temporarily changed channel), receive handler registration and the
//! poll tick.
//!
//! Everything here runs in the poll (caller) context and may block. The
//! interrupt side only touches the shared [`RxLink`].

use embedded_hal::delay::DelayNs;

use super::driver::{RadioDriver, RttyClient, SstvClient};
use super::handler::{FrameHandler, ObjectHandler, PacketHandler};
use super::mode::{apply_event, ModeEvent, Readiness};
use super::sstv::{gray_line, rgb565_line, SstvLine, SSTV_PIXELS};
use crate::config::{LinkTiming, DEFAULT_CHANGE_RESEND, RECV_BUFF_SIZE, SSTV_HEIGHT, SSTV_WIDTH};
use crate::error::{RadioError, RadioResult};
use crate::link::{AlarmTimer, RxLink};
use crate::ssdo::packet::{decode, Frame, Ssdo, SsdoHeader, PACKET_SIZE};
use crate::ssdo::{ChangeDescriptor, ObjectAssembler};
use crate::types::{
    FskSettings, LoraSettings, ObjectType, RadioMode, RttySettings, SenderId, SstvSettings,
};

/// Link counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Frames taken from the receive ring
    pub frames_received: u32,
    /// Frames dropped because they failed to decode
    pub decode_errors: u32,
    /// Frames lost to receive ring overwrite
    pub ring_overwrites: u32,
    /// Channel change requests applied
    pub channel_changes: u32,
    /// Watchdog-driven reverts to the default channel
    pub channel_resets: u32,
}

/// Installed LoRa receive path
enum Receiver<'a> {
    /// Raw frames straight to the application
    Frames(&'a mut dyn FrameHandler),
    /// SSDO decode, channel change handling, then the application
    Packets(&'a mut dyn PacketHandler),
}

/// Radio control facade
pub struct RadioControl<'a, R, T, D, const N: usize = RECV_BUFF_SIZE> {
    radio: R,
    link: &'a RxLink<T, N>,
    delay: D,
    timing: LinkTiming,
    readiness: Readiness,
    /// Channel every revert returns to
    default_lora: Option<LoraSettings>,
    /// Settings the chip currently runs in LoRa mode
    active_lora: Option<LoraSettings>,
    sender: Option<SenderId>,
    rtty: Option<&'a mut dyn RttyClient<R>>,
    sstv: Option<&'a mut dyn SstvClient<R>>,
    receiver: Option<Receiver<'a>>,
    stats: LinkStats,
}

impl<'a, R, T, D, const N: usize> RadioControl<'a, R, T, D, N>
where
    R: RadioDriver,
    T: AlarmTimer,
    D: DelayNs,
{
    /// Create the facade with the reference timing
    pub fn new(radio: R, link: &'a RxLink<T, N>, delay: D) -> Self {
        Self::with_timing(radio, link, delay, LinkTiming::default())
    }

    /// Create the facade with custom timing
    ///
    /// Programs the watchdog window; the countdown starts once a receive
    /// handler is installed.
    pub fn with_timing(radio: R, link: &'a RxLink<T, N>, delay: D, timing: LinkTiming) -> Self {
        link.watchdog().configure(timing.watchdog_timeout_us);
        Self {
            radio,
            link,
            delay,
            timing,
            readiness: Readiness::None,
            default_lora: None,
            active_lora: None,
            sender: None,
            rtty: None,
            sstv: None,
            receiver: None,
            stats: LinkStats::default(),
        }
    }

    /// Current readiness
    #[must_use]
    pub const fn readiness(&self) -> Readiness {
        self.readiness
    }

    /// Stored default LoRa settings
    #[must_use]
    pub const fn default_lora(&self) -> Option<&LoraSettings> {
        self.default_lora.as_ref()
    }

    /// LoRa settings currently applied to the chip
    #[must_use]
    pub const fn active_lora(&self) -> Option<&LoraSettings> {
        self.active_lora.as_ref()
    }

    /// SSDO sender id
    #[must_use]
    pub const fn sender(&self) -> Option<SenderId> {
        self.sender
    }

    /// Timing parameters
    #[must_use]
    pub const fn timing(&self) -> &LinkTiming {
        &self.timing
    }

    /// Link counters
    #[must_use]
    pub fn stats(&self) -> LinkStats {
        LinkStats {
            ring_overwrites: self.link.overwritten(),
            ..self.stats
        }
    }

    /// Shared receive state
    #[must_use]
    pub const fn link(&self) -> &'a RxLink<T, N> {
        self.link
    }

    /// The transceiver driver
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// Mutable access to the transceiver driver
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// The delay provider
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Check if a LoRa receive handler is installed
    #[must_use]
    pub const fn is_receiving(&self) -> bool {
        self.receiver.is_some()
    }

    // ------------------------------------------------------------------
    // Mode setup
    // ------------------------------------------------------------------

    /// Configure LoRa and store the settings as the default channel
    pub fn setup_lora(&mut self, settings: LoraSettings) -> RadioResult {
        self.configure_lora(settings, true)
    }

    /// Configure LoRa without touching the stored default channel
    pub fn setup_lora_active(&mut self, settings: LoraSettings) -> RadioResult {
        self.configure_lora(settings, false)
    }

    /// Re-apply the stored default LoRa channel
    pub fn reset_lora(&mut self) -> RadioResult {
        let defaults = self.default_lora.ok_or(RadioError::NoDefaultLora)?;
        self.configure_lora(defaults, false)
    }

    /// Configure FSK
    pub fn setup_fsk(&mut self, settings: FskSettings) -> RadioResult {
        info!("setting up FSK");
        if let Err(e) = self.radio.begin_fsk(&settings) {
            error!("failed to set up FSK: {}", e);
            self.readiness = apply_event(self.readiness, ModeEvent::Rejected(RadioMode::Fsk));
            return Err(RadioError::configuration(RadioMode::Fsk, e));
        }

        self.readiness = apply_event(self.readiness, ModeEvent::Configured(RadioMode::Fsk));
        self.leave_lora();
        info!("FSK ready");
        Ok(())
    }

    /// Configure RTTY on the FSK physical layer
    ///
    /// Fails without touching the hardware unless FSK is ready.
    pub fn setup_rtty(
        &mut self,
        settings: RttySettings,
        client: &'a mut dyn RttyClient<R>,
    ) -> RadioResult {
        info!("setting up RTTY");
        if let Err(e) = self.readiness.require_enterable(RadioMode::Rtty) {
            error!("RTTY needs FSK set up first");
            return Err(e);
        }

        if let Err(e) = client.begin(&mut self.radio, &settings) {
            error!("failed to set up RTTY: {}", e);
            return Err(RadioError::configuration(RadioMode::Rtty, e));
        }

        self.rtty = Some(client);
        self.readiness = apply_event(self.readiness, ModeEvent::Configured(RadioMode::Rtty));
        self.leave_lora();
        info!("RTTY ready");
        Ok(())
    }

    /// Configure SSTV
    pub fn setup_sstv(
        &mut self,
        settings: SstvSettings,
        client: &'a mut dyn SstvClient<R>,
    ) -> RadioResult {
        info!("setting up SSTV");
        if let Err(e) = client.begin(&mut self.radio, settings.frequency, settings.mode) {
            error!("failed to set up SSTV: {}", e);
            return Err(RadioError::configuration(RadioMode::Sstv, e));
        }
        if let Err(e) = client.set_correction(&mut self.radio, settings.correction) {
            error!("failed to set SSTV correction: {}", e);
            return Err(RadioError::configuration(RadioMode::Sstv, e));
        }

        self.sstv = Some(client);
        self.readiness = apply_event(self.readiness, ModeEvent::Configured(RadioMode::Sstv));
        self.leave_lora();
        info!("SSTV ready");
        Ok(())
    }

    /// Another mode took the radio: LoRa receive is no longer active.
    ///
    /// The receive handler stays registered and is re-armed by
    /// [`Self::resume_lora_receive`] once LoRa is set up again.
    fn leave_lora(&mut self) {
        self.active_lora = None;
        self.link.watchdog().stop();
    }

    fn configure_lora(&mut self, settings: LoraSettings, make_default: bool) -> RadioResult {
        debug!("setting up LoRa");
        let result = self
            .radio
            .begin_lora(&settings)
            .and_then(|()| self.radio.set_crc(true));

        if let Err(e) = result {
            error!("failed to set up LoRa: {}", e);
            self.readiness = apply_event(self.readiness, ModeEvent::Rejected(RadioMode::Lora));
            return Err(RadioError::configuration(RadioMode::Lora, e));
        }

        if make_default {
            self.default_lora = Some(settings);
        }
        self.active_lora = Some(settings);
        self.readiness = apply_event(self.readiness, ModeEvent::Configured(RadioMode::Lora));
        debug!("LoRa ready");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Plain sends
    // ------------------------------------------------------------------

    /// Send one RTTY line (idle carrier, line, standby)
    pub fn send_rtty(&mut self, line: &str) -> RadioResult {
        if let Err(e) = self.readiness.require(RadioMode::Rtty) {
            error!("RTTY not set up");
            return Err(e);
        }
        let Some(rtty) = self.rtty.as_deref_mut() else {
            return Err(RadioError::NotConfigured(RadioMode::Rtty));
        };

        rtty.idle(&mut self.radio);
        self.delay.delay_ms(self.timing.rtty_idle_ms);

        let sent = rtty.println(&mut self.radio, line);
        if let Err(e) = self.radio.standby() {
            warn!("standby after RTTY failed: {}", e);
        }
        sent.map_err(RadioError::transmit)
    }

    /// Send one raw LoRa packet
    pub fn send_lora(&mut self, data: &[u8]) -> RadioResult {
        let result = self.transmit_lora(data);
        self.resume_receive();
        result
    }

    /// Send an RGB565 image (`SSTV_WIDTH` x `SSTV_HEIGHT`)
    pub fn send_sstv(&mut self, image: &[u16]) -> RadioResult {
        self.check_image(image.len())?;
        self.transmit_image(|row, line| rgb565_line(image, row, line))
    }

    /// Send an 8-bit grayscale image (`SSTV_WIDTH` x `SSTV_HEIGHT`)
    pub fn send_sstv_gray(&mut self, image: &[u8]) -> RadioResult {
        self.check_image(image.len())?;
        self.transmit_image(|row, line| gray_line(image, row, line))
    }

    fn check_image(&self, actual: usize) -> RadioResult {
        if let Err(e) = self.readiness.require(RadioMode::Sstv) {
            error!("SSTV not set up");
            return Err(e);
        }
        if actual != SSTV_PIXELS {
            return Err(RadioError::InvalidImage {
                expected: SSTV_PIXELS,
                actual,
            });
        }
        Ok(())
    }

    fn transmit_image<F: Fn(usize, &mut SstvLine)>(&mut self, convert: F) -> RadioResult {
        let Some(sstv) = self.sstv.as_deref_mut() else {
            return Err(RadioError::NotConfigured(RadioMode::Sstv));
        };

        debug!("SSTV sync tone");
        sstv.idle(&mut self.radio);
        self.delay.delay_ms(self.timing.sstv_sync_tone_ms);

        sstv.send_header(&mut self.radio);
        let mut line: SstvLine = [0; SSTV_WIDTH];
        for row in 0..SSTV_HEIGHT {
            convert(row, &mut line);
            trace!("SSTV line {}", row);
            sstv.send_line(&mut self.radio, &line);
        }

        if let Err(e) = self.radio.standby() {
            warn!("standby after SSTV failed: {}", e);
        }
        Ok(())
    }

    fn transmit_lora(&mut self, data: &[u8]) -> RadioResult {
        if let Err(e) = self.readiness.require(RadioMode::Lora) {
            error!("LoRa not set up");
            return Err(e);
        }
        self.radio.transmit(data).map_err(RadioError::transmit)
    }

    // ------------------------------------------------------------------
    // SSDO object transfer
    // ------------------------------------------------------------------

    /// Set the SSDO sender identity of this node
    pub fn set_ssdo_sender(&mut self, sender: SenderId) {
        self.sender = Some(sender);
    }

    /// Send an object as a sequence of SSDO fragments
    ///
    /// Best effort: no acknowledgement and no retransmission. A failed
    /// fragment aborts the remaining ones.
    pub fn send_lora_ssdo(
        &mut self,
        object: &[u8],
        object_id: u32,
        object_type: ObjectType,
    ) -> RadioResult {
        let result = self.transmit_object(object, object_id, object_type);
        self.resume_receive();
        result
    }

    /// Send an object on a temporarily changed LoRa channel
    ///
    /// When `new_settings` differ from the active ones, the change is
    /// announced `resend` times on the current channel first. The object
    /// is then sent on the new channel after the settle delay, and the
    /// stored default channel is restored. Only the object send itself
    /// reports failure.
    pub fn send_lora_ssdo_with_reconfig(
        &mut self,
        object: &[u8],
        object_id: u32,
        object_type: ObjectType,
        new_settings: LoraSettings,
        resend: u32,
    ) -> RadioResult {
        let defaults = self.default_lora.ok_or(RadioError::NoDefaultLora)?;
        if self.sender.is_none() {
            return Err(RadioError::SenderNotSet);
        }
        if let Err(e) = self.readiness.require(RadioMode::Lora) {
            error!("LoRa not set up");
            return Err(e);
        }

        let differs = self
            .active_lora
            .map_or(true, |active| new_settings.differs_from(&active));
        if differs {
            info!("announcing channel change for object {}", object_id);
            let change = ChangeDescriptor::from_settings(&new_settings).to_bytes();
            for _ in 0..resend {
                if let Err(e) = self.transmit_object(&change, object_id, ObjectType::Change) {
                    warn!("channel change announcement failed: {}", e);
                }
            }
        }

        if let Err(e) = self.configure_lora(new_settings, false) {
            warn!("could not switch to the announced channel: {}", e);
        }
        self.delay.delay_ms(self.timing.settle_delay_ms);

        let result = self.transmit_object(object, object_id, object_type);

        if let Err(e) = self.configure_lora(defaults, false) {
            error!("failed to restore default LoRa channel: {}", e);
        }
        self.resume_receive();
        result
    }

    /// [`Self::send_lora_ssdo_with_reconfig`] announcing the change
    /// `DEFAULT_CHANGE_RESEND` times
    pub fn send_lora_ssdo_on_channel(
        &mut self,
        object: &[u8],
        object_id: u32,
        object_type: ObjectType,
        new_settings: LoraSettings,
    ) -> RadioResult {
        self.send_lora_ssdo_with_reconfig(
            object,
            object_id,
            object_type,
            new_settings,
            DEFAULT_CHANGE_RESEND,
        )
    }

    fn transmit_object(
        &mut self,
        object: &[u8],
        object_id: u32,
        object_type: ObjectType,
    ) -> RadioResult {
        let sender = self.sender.ok_or(RadioError::SenderNotSet)?;
        let ssdo = Ssdo::new(sender, object_id, object_type);
        let mut frame: Frame = [0; PACKET_SIZE];

        for index in 0..Ssdo::fragment_count(object.len()) {
            ssdo.encode(object, index, &mut frame)?;
            if let Err(e) = self.transmit_lora(&frame) {
                error!("object {} aborted at fragment {}", object_id, index);
                return Err(e);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Receive
    // ------------------------------------------------------------------

    /// Deliver every received LoRa frame, undecoded, to `handler`
    pub fn set_lora_receive_handler(&mut self, handler: &'a mut dyn FrameHandler) -> RadioResult {
        self.install_receiver(Receiver::Frames(handler))
    }

    /// Decode received frames as SSDO and deliver fragments to `handler`
    ///
    /// Channel change fragments are consumed by the link itself.
    pub fn set_lora_ssdo_packet_handler(
        &mut self,
        handler: &'a mut dyn PacketHandler,
    ) -> RadioResult {
        self.install_receiver(Receiver::Packets(handler))
    }

    /// Decode received frames as SSDO and deliver whole objects
    pub fn set_lora_ssdo_object_handler<H, const MAX: usize>(
        &mut self,
        assembler: &'a mut ObjectAssembler<H, MAX>,
    ) -> RadioResult
    where
        H: ObjectHandler + 'a,
    {
        self.set_lora_ssdo_packet_handler(assembler)
    }

    /// Remove the receive handler, stop the watchdog and idle the radio
    pub fn clear_receive_handler(&mut self) {
        self.receiver = None;
        self.link.watchdog().stop();
        if let Err(e) = self.radio.standby() {
            warn!("standby failed: {}", e);
        }
    }

    /// Restart LoRa receive for the registered handler after another mode
    /// had the radio
    pub fn resume_lora_receive(&mut self) -> RadioResult {
        if let Err(e) = self.readiness.require(RadioMode::Lora) {
            error!("LoRa not set up");
            return Err(e);
        }
        if self.receiver.is_none() {
            return Ok(());
        }

        self.radio.enable_data_ready_irq();
        self.radio
            .start_receive()
            .map_err(|e| RadioError::configuration(RadioMode::Lora, e))?;
        self.link.watchdog().start(self.timing.watchdog_timeout_us);
        Ok(())
    }

    fn install_receiver(&mut self, receiver: Receiver<'a>) -> RadioResult {
        if let Err(e) = self.readiness.require(RadioMode::Lora) {
            error!("LoRa not set up");
            return Err(e);
        }

        self.radio.enable_data_ready_irq();
        self.radio
            .start_receive()
            .map_err(|e| RadioError::configuration(RadioMode::Lora, e))?;

        self.receiver = Some(receiver);
        self.link.watchdog().start(self.timing.watchdog_timeout_us);
        Ok(())
    }

    fn resume_receive(&mut self) {
        if self.receiver.is_some() && self.readiness.is_ready(RadioMode::Lora) {
            if let Err(e) = self.radio.start_receive() {
                warn!("could not resume receive: {}", e);
            }
        }
    }

    /// Poll tick: must be called repeatedly from the main loop
    ///
    /// Handles a pending watchdog reset, then processes at most one frame.
    pub fn process_recv_buff(&mut self) {
        if self.link.watchdog().take_reset_request() {
            self.reset_channel();
        }

        let Some(frame) = self.link.pop_frame() else {
            return;
        };
        self.stats.frames_received = self.stats.frames_received.wrapping_add(1);

        match &mut self.receiver {
            None => {
                trace!("frame dropped, no receive handler");
            }
            Some(Receiver::Frames(handler)) => handler.on_frame(&frame),
            Some(Receiver::Packets(_)) => self.handle_ssdo_frame(&frame),
        }
    }

    fn handle_ssdo_frame(&mut self, frame: &Frame) {
        let (header, body) = match decode(frame) {
            Ok(decoded) => decoded,
            Err(e) => {
                // decode error -> drop, count, do not surface
                self.stats.decode_errors = self.stats.decode_errors.wrapping_add(1);
                debug!("dropping frame: {}", e);
                return;
            }
        };

        if header.object_type == ObjectType::Change {
            self.apply_change(body, &header);
        } else if let Some(Receiver::Packets(handler)) = &mut self.receiver {
            handler.on_packet(body, &header);
        }
    }

    fn apply_change(&mut self, body: &[u8], header: &SsdoHeader) {
        let descriptor = match ChangeDescriptor::from_bytes(body) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                self.stats.decode_errors = self.stats.decode_errors.wrapping_add(1);
                debug!("dropping change request: {}", e);
                return;
            }
        };
        if !self.readiness.is_ready(RadioMode::Lora) {
            debug!("channel change ignored, LoRa not active");
            return;
        }
        let Some(defaults) = self.default_lora else {
            warn!("channel change ignored, no default LoRa settings");
            return;
        };

        info!("channel change requested by {}", header.sender);
        if let Err(e) = self.configure_lora(descriptor.apply_to(&defaults), false) {
            error!("channel change failed: {}", e);
            return;
        }
        if let Err(e) = self.radio.start_receive() {
            warn!("could not resume receive: {}", e);
        }

        self.link.watchdog().start(self.timing.reconfig_grace_us);
        self.stats.channel_changes = self.stats.channel_changes.wrapping_add(1);
    }

    fn reset_channel(&mut self) {
        if self.receiver.is_none() || !self.readiness.is_ready(RadioMode::Lora) {
            return;
        }
        info!("receive watchdog expired, restoring default LoRa channel");
        self.stats.channel_resets = self.stats.channel_resets.wrapping_add(1);

        match self.reset_lora() {
            Ok(()) => {
                if let Err(e) = self.radio.start_receive() {
                    warn!("could not resume receive: {}", e);
                }
            }
            Err(e) => error!("channel reset failed: {}", e),
        }
        self.link.watchdog().start(self.timing.watchdog_timeout_us);
    }
}
