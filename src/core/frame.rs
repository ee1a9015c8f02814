use crate::core::error::FrameError;
use serde::{Deserialize, Serialize};

/// Largest identifier representable in a standard (11-bit) frame
pub const MAX_STANDARD_ID: u32 = 0x7FF;
/// Largest identifier representable in an extended (29-bit) frame
pub const MAX_EXTENDED_ID: u32 = 0x1FFF_FFFF;
/// Payload limit for classic CAN frames
pub const MAX_CLASSIC_PAYLOAD: usize = 8;
/// Payload limit for CAN FD frames
pub const MAX_FD_PAYLOAD: usize = 64;
/// Payload lengths a CAN FD DLC can encode above the classic limit
pub const FD_PAYLOAD_LENGTHS: [usize; 7] = [12, 16, 20, 24, 32, 48, 64];

/// Logical direction of a frame, fixed when the frame is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Frame observed on the bus
    Received,
    /// Frame queued for transmission
    Transmit,
}

/// Frame format flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameFlags {
    /// 29-bit identifier
    pub extended: bool,
    /// Remote transmission request
    pub remote: bool,
    /// Error frame reported by the controller
    pub error: bool,
    /// CAN FD frame
    pub flexible_data_rate: bool,
    /// CAN FD bitrate switch
    pub bitrate_switch: bool,
}

impl FrameFlags {
    pub fn extended() -> Self {
        Self {
            extended: true,
            ..Default::default()
        }
    }

    pub fn remote() -> Self {
        Self {
            remote: true,
            ..Default::default()
        }
    }

    pub fn fd() -> Self {
        Self {
            flexible_data_rate: true,
            ..Default::default()
        }
    }
}

/// One immutable CAN bus message.
///
/// Fields are private and there are no setters; a new frame is built for
/// every received or transmitted message. Construction validates the
/// identifier width and the payload bound for the frame's format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanFrame {
    id: u32,
    payload: Vec<u8>,
    flags: FrameFlags,
    direction: Direction,
    timestamp_us: Option<u64>,
}

impl CanFrame {
    /// Create a validated frame
    pub fn new(
        id: u32,
        payload: &[u8],
        flags: FrameFlags,
        direction: Direction,
    ) -> Result<Self, FrameError> {
        let max_id = if flags.extended {
            MAX_EXTENDED_ID
        } else {
            MAX_STANDARD_ID
        };
        if id > max_id {
            return Err(FrameError::IdentifierOutOfRange {
                id,
                extended: flags.extended,
            });
        }

        if flags.remote {
            if flags.flexible_data_rate {
                return Err(FrameError::RemoteFlexibleDataRate);
            }
            if !payload.is_empty() {
                return Err(FrameError::RemoteWithPayload(payload.len()));
            }
        }

        let max_len = if flags.flexible_data_rate {
            MAX_FD_PAYLOAD
        } else {
            MAX_CLASSIC_PAYLOAD
        };
        if payload.len() > max_len {
            return Err(FrameError::PayloadTooLong {
                len: payload.len(),
                max: max_len,
            });
        }
        if payload.len() > MAX_CLASSIC_PAYLOAD && !FD_PAYLOAD_LENGTHS.contains(&payload.len()) {
            return Err(FrameError::InvalidFdLength(payload.len()));
        }

        Ok(Self {
            id,
            payload: payload.to_vec(),
            flags,
            direction,
            timestamp_us: None,
        })
    }

    /// Standard data frame observed on the bus
    pub fn received(id: u32, payload: &[u8]) -> Result<Self, FrameError> {
        Self::new(id, payload, FrameFlags::default(), Direction::Received)
    }

    /// Standard data frame to be sent
    pub fn transmit(id: u32, payload: &[u8]) -> Result<Self, FrameError> {
        Self::new(id, payload, FrameFlags::default(), Direction::Transmit)
    }

    /// Copy of this frame carrying a capture timestamp
    pub fn with_timestamp(&self, timestamp_us: u64) -> Self {
        Self {
            timestamp_us: Some(timestamp_us),
            ..self.clone()
        }
    }

    /// Copy of this frame with a different direction tag
    pub fn with_direction(&self, direction: Direction) -> Self {
        Self {
            direction,
            ..self.clone()
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn flags(&self) -> FrameFlags {
        self.flags
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn timestamp_us(&self) -> Option<u64> {
        self.timestamp_us
    }

    pub fn is_extended(&self) -> bool {
        self.flags.extended
    }

    pub fn is_remote(&self) -> bool {
        self.flags.remote
    }

    pub fn is_error(&self) -> bool {
        self.flags.error
    }

    /// Identifier formatted the way bus monitors print it
    pub fn id_string(&self) -> String {
        if self.flags.extended {
            format!("{:08X}", self.id)
        } else {
            format!("{:03X}", self.id)
        }
    }
}

impl std::fmt::Display for CanFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.id_string(), self.payload.len())?;
        if self.flags.remote {
            return write!(f, " remote");
        }
        for byte in &self.payload {
            write!(f, " {:02X}", byte)?;
        }
        Ok(())
    }
}
