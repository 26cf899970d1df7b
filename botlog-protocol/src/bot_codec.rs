use crate::identity::DeviceIdentity;
use crate::messages::logs::LogMsg;
use crate::messages::status::StatusMsg;
use crate::messages::MsgFromBot;
use log::debug;
use mqtt::packet::*;
use mqtt::Decodable;
use std::error::Error;
use std::fmt;

/// Prefix of every topic a device publishes to
pub const TOPIC_PREFIX: &str = "bot";

/// A Codec that decodes MQTT packets published by devices
#[derive(Debug, Copy, Clone)]
pub struct BotCodec;

/// The result of a decoding process
pub type DecodingResult = Result<MsgFromBot, CodecError>;

/// Represents an error in decoding a packet
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CodecError {
    /// The MQTT packet type is unknown or unexpected
    UnexpectedMqttPacketType,

    /// The MQTT packet is invalid, according to the MQTT spec
    InvalidMqttPacket,

    /// The message body is not valid JSON
    InvalidMessageBody,

    /// The topic name does not follow the "bot/<device>/<leaf>" structure
    InvalidTopic,

    /// The topic name lacks the device ID
    MissingDeviceId,
}

impl CodecError {
    fn get_text<'a>(self: &'a CodecError) -> &'a str {
        match self {
            CodecError::UnexpectedMqttPacketType => "Unexpected MQTT Packet Type",
            CodecError::InvalidMqttPacket => "Invalid MQTT Packet",
            CodecError::InvalidMessageBody => "Invalid Message Body",
            CodecError::InvalidTopic => "Invalid Topic",
            CodecError::MissingDeviceId => "Missing Device ID",
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", &self.get_text());
    }
}

impl Error for CodecError {}

impl BotCodec {
    /// Decodes a single message from the provided buffer
    ///
    /// # Errors
    /// Returns an error if the buffer contains an invalid MQTT packet, or if the packet is not a valid device publication
    pub fn decode(bytes: &[u8]) -> DecodingResult {
        let mut buf = &bytes[..];
        let decode_res = VariablePacket::decode(&mut buf);

        decode_res
            .map_err(|_e| CodecError::InvalidMqttPacket)
            .map(Self::decode_packet)?
    }

    /// Decodes an MQTT packet into a device message. Returns the message, or an error.
    ///
    /// # Arguments
    ///
    /// * packet - the MQTT packet to decode
    pub fn decode_packet(packet: VariablePacket) -> DecodingResult {
        return match packet {
            VariablePacket::PublishPacket(ref publ) => {
                Self::decode_publish(publ.topic_name(), publ.payload_ref())
            }
            _other_packet => Err(CodecError::UnexpectedMqttPacketType),
        };
    }

    /// Decodes a publication from its topic name and payload
    pub fn decode_publish(topic: &str, payload: &[u8]) -> DecodingResult {
        let mut segments = topic.split('/');
        if segments.next() != Some(TOPIC_PREFIX) {
            return Err(CodecError::InvalidTopic);
        }

        let device = match segments.next() {
            Some(id) if !id.is_empty() => DeviceIdentity::from_device_id(id),
            _other => return Err(CodecError::MissingDeviceId),
        };

        let leaf = segments.next();
        let rest = segments.next();
        debug!("Publication from {}, leaf: {:?}", device, leaf);

        match (leaf, rest) {
            (Some("logs"), None) => Ok(LogMsg {
                device,
                body: deserialize_message_body(payload)?,
            }
            .into()),
            (Some("status"), None) => Ok(StatusMsg {
                device,
                body: deserialize_message_body(payload)?,
            }
            .into()),
            _other => Ok(MsgFromBot::UnknownMessage()),
        }
    }

    /// Decodes a line in the format printed by `mosquitto_sub -v`: the topic, a space, and the payload
    pub fn decode_line(line: &str) -> DecodingResult {
        let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
        match line.find(' ') {
            Some(split) => Self::decode_publish(&line[..split], line[split + 1..].as_bytes()),
            None => Err(CodecError::InvalidMessageBody),
        }
    }

    /// The topic a device publishes its logs to
    pub fn logs_topic(device: &DeviceIdentity) -> String {
        format!("{}/{}/logs", TOPIC_PREFIX, device)
    }

    /// A topic filter matching the logs of every device
    pub fn logs_topic_filter() -> String {
        format!("{}/+/logs", TOPIC_PREFIX)
    }
}

fn deserialize_message_body(payload: &[u8]) -> Result<serde_json::Value, CodecError> {
    serde_json::from_slice(payload).map_err(|_e| CodecError::InvalidMessageBody)
}
