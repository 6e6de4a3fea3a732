use crate::registry::RecordKind;
use serde::{Serialize, Serializer};

/// A registered record kind whose payload is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpaqueRecord {
    pub kind: RecordKind,
    #[serde(serialize_with = "hex_bytes")]
    pub data: Vec<u8>,
}

/// A record with an opcode the registry does not know, carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownRecord {
    pub opcode: u16,
    #[serde(serialize_with = "hex_bytes")]
    pub data: Vec<u8>,
}

fn hex_bytes<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    let hex: String = data.iter().map(|b| format!("{b:02X}")).collect();
    serializer.serialize_str(&hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_as_hex() {
        let record = UnknownRecord {
            opcode: 0x0862,
            data: vec![0x01, 0xAB],
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"opcode":2146,"data":"01AB"}"#
        );
    }
}
