#![doc = r#"
An [`OutputSink`] backed by a hardware or virtual MIDI output port, via the
`midir` crate. Only available with the `midir` cargo feature.

The sink is opened before the scheduler starts and closed after it
terminates; the scheduler itself never touches the device lifecycle.
"#]

use crate::sink::{OutputSink, SinkError};
use midir::{MidiOutput, MidiOutputConnection};

/// GM System On: returns every channel of a General MIDI device to a known
/// state. Worth sending before playback and on teardown.
pub const GM_SYSTEM_ON: [u8; 6] = [0xF0, 0x7E, 0x7F, 0x09, 0x01, 0xF7];

/// Roland GS "reverb macro" setup message, for GS-compatible devices.
pub const ROLAND_GS_REVERB: [u8; 17] = [
    0xF0, 0x41, 0x10, 0x42, 0x12, 0x40, 0x01, 0x30, 0x02, 0x04, 0x00, 0x40, 0x40, 0x00, 0x00,
    0x09, 0xF7,
];

/// A connection to one MIDI output port.
pub struct MidirSink {
    connection: MidiOutputConnection,
}

impl MidirSink {
    /// Connect to the first available output port.
    pub fn open(client_name: &str) -> Result<Self, SinkError> {
        let output = MidiOutput::new(client_name).map_err(|e| SinkError::new(e.to_string()))?;
        let ports = output.ports();
        let port = ports
            .first()
            .ok_or_else(|| SinkError::new("no MIDI output device detected"))?;
        let port_name = output.port_name(port).unwrap_or_else(|_| "unknown".into());
        tracing::debug!(port = %port_name, "connecting to MIDI output");
        let connection = output
            .connect(port, client_name)
            .map_err(|e| SinkError::new(e.to_string()))?;
        Ok(Self { connection })
    }

    /// Send GM System On, silencing and resetting the device.
    pub fn reset(&mut self) -> Result<(), SinkError> {
        self.send_exclusive(&GM_SYSTEM_ON)
    }

    /// Close the connection to the port.
    pub fn close(self) {
        self.connection.close();
    }
}

impl OutputSink for MidirSink {
    fn send_short(&mut self, status: u8, data: &[u8]) -> Result<(), SinkError> {
        if data.len() > 2 {
            return Err(SinkError::new(format!(
                "channel message carries {} data bytes, at most 2 allowed",
                data.len()
            )));
        }
        let mut message = [0u8; 3];
        message[0] = status;
        message[1..=data.len()].copy_from_slice(data);
        self.connection
            .send(&message[..=data.len()])
            .map_err(|e| SinkError::new(e.to_string()))
    }

    fn send_exclusive(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        self.connection
            .send(bytes)
            .map_err(|e| SinkError::new(e.to_string()))
    }
}
