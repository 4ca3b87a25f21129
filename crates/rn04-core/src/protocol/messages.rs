//! JSON message types for the shell ↔ hook-runtime control channel.
//!
//! The hook runtime is a child process of the shell; its standard pipes are
//! the transport.  Each message is one line of JSON, and each JSON object
//! carries a `"type"` field that identifies the variant — serde's
//! `#[serde(tag = "type")]` attribute handles this automatically.
//!
//! # Message flow
//!
//! ```text
//! Shell   → Runtime: stdin   →  ControlMessage   (the only one is "stop")
//! Runtime → Shell:   stdout  →  StatusMessage    (diagnostic, shell just logs)
//! ```
//!
//! Closing the runtime's stdin is an implicit stop, so the shell's kill paths
//! and crash paths converge on the same runtime-side shutdown.
//!
//! # Why two enums?
//!
//! The directions carry different information: the shell only ever commands,
//! the runtime only ever reports.  Separate enums make it a compile-time
//! error to send a status where a command belongs, and vice versa.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors produced when encoding or decoding protocol lines.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The line was empty or whitespace-only.
    #[error("empty message line")]
    EmptyLine,

    /// The line was not a valid message of the expected direction.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ── Shell → Runtime messages ──────────────────────────────────────────────────

/// Commands the shell can send to the runtime.
///
/// # Serde representation
///
/// ```json
/// {"type":"stop"}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ControlMessage {
    /// Release all synthetic keys, uninstall the hook, and exit.
    ///
    /// This is the only inbound control signal the runtime honours; all
    /// other shutdown causes (stdin EOF, Ctrl-C) funnel into the same path.
    Stop,
}

// ── Runtime → Shell messages ──────────────────────────────────────────────────

/// Diagnostic reports the runtime emits on stdout.
///
/// The shell logs these and never acts on them; the runtime stays fully
/// functional even if nobody reads its stdout.
///
/// # Serde representation
///
/// ```json
/// {"type":"started","session_id":"550e8400-e29b-41d4-a716-446655440000"}
/// {"type":"error","message":"mouse hook install failed"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StatusMessage {
    /// The hook is installed and events are flowing.
    Started {
        /// Session identity from the launch artifact, echoed back so logs
        /// on both sides of the pipe can be correlated.
        session_id: Uuid,
    },

    /// A fatal setup failure; the runtime exits after emitting this.
    Error {
        /// Human-readable description, for the shell's log only.
        message: String,
    },
}

// ── Line codec ────────────────────────────────────────────────────────────────

/// Encodes a control message as one JSON line (no trailing newline).
pub fn encode_control(msg: &ControlMessage) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(msg)?)
}

/// Decodes one line from the runtime's stdin into a control message.
///
/// # Errors
///
/// [`ProtocolError::EmptyLine`] for blank lines, [`ProtocolError::Malformed`]
/// for anything that is not a known control message.
pub fn decode_control(line: &str) -> Result<ControlMessage, ProtocolError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ProtocolError::EmptyLine);
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Encodes a status message as one JSON line (no trailing newline).
pub fn encode_status(msg: &StatusMessage) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(msg)?)
}

/// Decodes one line from the runtime's stdout into a status message.
pub fn decode_status(line: &str) -> Result<StatusMessage, ProtocolError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ProtocolError::EmptyLine);
    }
    Ok(serde_json::from_str(trimmed)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_encodes_to_the_exact_wire_shape() {
        // Arrange
        let msg = ControlMessage::Stop;

        // Act
        let line = encode_control(&msg).unwrap();

        // Assert: the runtime's stdin parser depends on this exact object
        assert_eq!(line, r#"{"type":"stop"}"#);
    }

    #[test]
    fn test_stop_round_trips() {
        let original = ControlMessage::Stop;
        let line = encode_control(&original).unwrap();
        let decoded = decode_control(&line).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_decode_control_tolerates_surrounding_whitespace() {
        let decoded = decode_control("  {\"type\":\"stop\"}\n").unwrap();
        assert_eq!(decoded, ControlMessage::Stop);
    }

    #[test]
    fn test_started_serializes_with_type_discriminant() {
        // Arrange
        let msg = StatusMessage::Started {
            session_id: Uuid::nil(),
        };

        // Act
        let line = encode_status(&msg).unwrap();

        // Assert
        assert!(line.contains(r#""type":"started""#));
        assert!(line.contains("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn test_started_round_trips() {
        let original = StatusMessage::Started {
            session_id: Uuid::new_v4(),
        };
        let line = encode_status(&original).unwrap();
        let decoded = decode_status(&line).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_error_round_trips() {
        let original = StatusMessage::Error {
            message: "mouse hook install failed".to_string(),
        };
        let line = encode_status(&original).unwrap();
        let decoded = decode_status(&line).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_unknown_message_type_returns_error() {
        // Arrange: JSON with an unknown `type` value
        let json = r#"{"type":"reboot"}"#;

        // Act
        let result = decode_control(json);

        // Assert: serde must reject unknown variants
        assert!(matches!(result, Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_missing_type_field_returns_error() {
        let json = r#"{"session_id":"550e8400-e29b-41d4-a716-446655440000"}"#;

        let result = decode_status(json);

        assert!(matches!(result, Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_empty_line_returns_dedicated_error() {
        assert!(matches!(decode_control(""), Err(ProtocolError::EmptyLine)));
        assert!(matches!(decode_control("   \n"), Err(ProtocolError::EmptyLine)));
    }

    #[test]
    fn test_control_and_status_directions_do_not_cross() {
        // A status line must not decode as a control message.
        let status_line = encode_status(&StatusMessage::Error {
            message: "x".to_string(),
        })
        .unwrap();

        assert!(decode_control(&status_line).is_err());
    }
}
