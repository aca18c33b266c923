// crates/skillswap-core/src/codec.rs
//
// Byte-level contracts between this crate's read and write paths.
//
// Record blob (version 1):
//   {"version":1,"data":"FHE-...","timestamp":1700000000,
//    "owner":"0x...","skillType":"Cooking","rating":0}
// A blob without "version" is the legacy layout (version 0) and is upgraded
// on read. A missing or null rating reads as 0.
//
// Index blob (version 1):
//   {"version":1,"ids":["1700000000000-abc1234", ...]}
// A bare JSON array of ids is the legacy layout and is accepted as-is.
//
// Payload: "FHE-" + base64(JSON(draft)). A reversible placeholder for a real
// confidential-computation transform; it provides no confidentiality.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::SkillError;
use crate::record::{SkillCategory, SkillDraft, SkillRecord, MAX_RATING};
use crate::traits::PayloadCipher;

/// Current record blob schema version.
pub const RECORD_SCHEMA_VERSION: u32 = 1;

/// Current index blob schema version.
pub const INDEX_SCHEMA_VERSION: u32 = 1;

/// Marker prefixed to every placeholder-encoded payload.
pub const PAYLOAD_MARKER: &str = "FHE-";

/// Reversible stand-in for a confidential-computation backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderCipher;

impl PayloadCipher for PlaceholderCipher {
    fn encode(&self, draft: &SkillDraft) -> Result<String, SkillError> {
        encode_payload(draft)
    }

    fn decode(&self, payload: &str) -> Result<SkillDraft, SkillError> {
        decode_payload(payload)
    }
}

/// Encode a submission draft into its payload string.
pub fn encode_payload(draft: &SkillDraft) -> Result<String, SkillError> {
    let json = serde_json::to_vec(draft)?;
    Ok(format!(
        "{}{}",
        PAYLOAD_MARKER,
        base64::engine::general_purpose::STANDARD.encode(json)
    ))
}

/// Decode a payload string produced by `encode_payload`.
pub fn decode_payload(payload: &str) -> Result<SkillDraft, SkillError> {
    let body = payload.strip_prefix(PAYLOAD_MARKER).ok_or_else(|| {
        SkillError::DecodeError(format!("payload is missing the {} marker", PAYLOAD_MARKER))
    })?;
    let json = base64::engine::general_purpose::STANDARD.decode(body)?;
    Ok(serde_json::from_slice(&json)?)
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordBlob {
    #[serde(default)]
    version: u32,
    data: String,
    timestamp: i64,
    owner: String,
    #[serde(rename = "skillType")]
    skill_type: String,
    #[serde(default)]
    rating: Option<u64>,
}

/// Serialize a record to its store representation. The id is not part of
/// the blob; it is carried by the key.
pub fn encode_record(record: &SkillRecord) -> Result<Vec<u8>, SkillError> {
    let blob = RecordBlob {
        version: RECORD_SCHEMA_VERSION,
        data: record.payload.clone(),
        timestamp: record.timestamp,
        owner: record.owner.clone(),
        skill_type: record.category.as_str().to_string(),
        rating: Some(u64::from(record.rating)),
    };
    Ok(serde_json::to_vec(&blob)?)
}

/// Deserialize a record blob read from the key derived from `id`.
pub fn decode_record(id: &str, bytes: &[u8]) -> Result<SkillRecord, SkillError> {
    let blob: RecordBlob = serde_json::from_slice(bytes)?;

    if blob.version > RECORD_SCHEMA_VERSION {
        return Err(SkillError::DecodeError(format!(
            "unsupported record schema version {} for {}",
            blob.version, id
        )));
    }

    let category: SkillCategory = blob.skill_type.parse().map_err(|_| {
        SkillError::DecodeError(format!("unknown skill type {:?} for {}", blob.skill_type, id))
    })?;

    let rating = blob.rating.unwrap_or(0);
    if rating > u64::from(MAX_RATING) {
        return Err(SkillError::DecodeError(format!(
            "rating {} out of range for {}",
            rating, id
        )));
    }

    Ok(SkillRecord {
        id: id.to_string(),
        payload: blob.data,
        timestamp: blob.timestamp,
        owner: blob.owner,
        category,
        rating: rating as u8,
    })
}

#[derive(Debug, Serialize)]
struct IndexBlob<'a> {
    version: u32,
    ids: &'a [String],
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IndexRepr {
    Versioned { version: u32, ids: Vec<String> },
    Legacy(Vec<String>),
}

/// Serialize the registry index.
pub fn encode_index(ids: &[String]) -> Result<Vec<u8>, SkillError> {
    Ok(serde_json::to_vec(&IndexBlob {
        version: INDEX_SCHEMA_VERSION,
        ids,
    })?)
}

/// Deserialize the registry index, accepting the legacy bare-array layout.
pub fn decode_index(bytes: &[u8]) -> Result<Vec<String>, SkillError> {
    match serde_json::from_slice::<IndexRepr>(bytes)? {
        IndexRepr::Legacy(ids) => Ok(ids),
        IndexRepr::Versioned { version, ids } if version <= INDEX_SCHEMA_VERSION => Ok(ids),
        IndexRepr::Versioned { version, .. } => Err(SkillError::DecodeError(format!(
            "unsupported index schema version {}",
            version
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_draft() -> SkillDraft {
        SkillDraft::new(SkillCategory::Language)
            .with_description("Conversational Portuguese, \"intermediate\" level")
            .with_experience("5 years / ünïcode ok")
    }

    #[test]
    fn test_payload_roundtrip() {
        let draft = sample_draft();
        let payload = encode_payload(&draft).unwrap();
        assert!(payload.starts_with(PAYLOAD_MARKER));
        assert_eq!(decode_payload(&payload).unwrap(), draft);
    }

    #[test]
    fn test_payload_roundtrip_empty_fields() {
        let draft = SkillDraft::new(SkillCategory::Other);
        let cipher = PlaceholderCipher;
        assert_eq!(cipher.decode(&cipher.encode(&draft).unwrap()).unwrap(), draft);
    }

    #[test]
    fn test_payload_decode_rejects_missing_marker() {
        let payload = encode_payload(&sample_draft()).unwrap();
        let stripped = payload.trim_start_matches(PAYLOAD_MARKER);
        assert!(matches!(decode_payload(stripped), Err(SkillError::DecodeError(_))));
        assert!(matches!(decode_payload("FHE-!!!"), Err(SkillError::DecodeError(_))));
    }

    #[test]
    fn test_payload_uses_legacy_field_names() {
        let payload = encode_payload(&SkillDraft::new(SkillCategory::Cooking)).unwrap();
        let json = base64::engine::general_purpose::STANDARD
            .decode(payload.trim_start_matches(PAYLOAD_MARKER))
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["skillType"], "Cooking");
    }

    #[test]
    fn test_record_blob_carries_version() {
        let record = SkillRecord {
            id: "1-a".into(),
            payload: "FHE-e30=".into(),
            timestamp: 1_700_000_000,
            owner: "0xAAA".into(),
            category: SkillCategory::Cooking,
            rating: 3,
        };
        let bytes = encode_record(&record).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["version"], 1);
        assert!(value.get("id").is_none());
        assert_eq!(decode_record("1-a", &bytes).unwrap(), record);
    }

    #[test]
    fn test_legacy_record_is_upgraded() {
        let legacy = br#"{"data":"FHE-abc","timestamp":1699999999,"owner":"0xBBB","skillType":"Programming"}"#;
        let record = decode_record("42-zzz", legacy).unwrap();
        assert_eq!(record.id, "42-zzz");
        assert_eq!(record.category, SkillCategory::Programming);
        assert_eq!(record.rating, 0);

        let null_rating = br#"{"data":"x","timestamp":1,"owner":"o","skillType":"Other","rating":null}"#;
        assert_eq!(decode_record("n", null_rating).unwrap().rating, 0);
    }

    #[test]
    fn test_record_rejects_future_version_and_bad_fields() {
        let future = br#"{"version":9,"data":"x","timestamp":1,"owner":"o","skillType":"Other"}"#;
        assert!(matches!(decode_record("f", future), Err(SkillError::DecodeError(_))));

        let bad_type = br#"{"version":1,"data":"x","timestamp":1,"owner":"o","skillType":"Juggling"}"#;
        assert!(matches!(decode_record("t", bad_type), Err(SkillError::DecodeError(_))));

        let bad_rating = br#"{"version":1,"data":"x","timestamp":1,"owner":"o","skillType":"Other","rating":9}"#;
        assert!(matches!(decode_record("r", bad_rating), Err(SkillError::DecodeError(_))));

        assert!(matches!(decode_record("g", b"garbage"), Err(SkillError::DecodeError(_))));
    }

    #[test]
    fn test_index_versioned_and_legacy() {
        let ids = vec!["a".to_string(), "b".to_string()];
        assert_eq!(decode_index(&encode_index(&ids).unwrap()).unwrap(), ids);
        assert_eq!(decode_index(br#"["a","b"]"#).unwrap(), ids);
        assert!(decode_index(br#"{"version":2,"ids":["a"]}"#).is_err());
        assert!(decode_index(b"not json").is_err());
    }
}
