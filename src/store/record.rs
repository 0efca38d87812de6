//! On-disk record format
//!
//! Collection logs are a sequence of records:
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, includes this field and the checksum)
//! +------------------+
//! | Document ID      | (length-prefixed string)
//! +------------------+
//! | Schema ID        | (length-prefixed string)
//! +------------------+
//! | Schema Version   | (length-prefixed string)
//! +------------------+
//! | Document Body    | (length-prefixed JSON bytes)
//! +------------------+
//! | Checksum         | (CRC32, u32 LE, covers all preceding bytes)
//! +------------------+
//! ```
//!
//! Every read verifies the checksum; a mismatch aborts the read.

use std::io::{self, Read};

use crc32fast::Hasher;

/// One stored document with its schema binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Store-assigned document id
    pub document_id: String,
    /// Schema the document was validated against
    pub schema_id: String,
    /// Version of that schema
    pub schema_version: String,
    /// JSON document bytes
    pub body: Vec<u8>,
}

impl StoredRecord {
    pub fn new(
        document_id: impl Into<String>,
        schema_id: impl Into<String>,
        schema_version: impl Into<String>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            schema_id: schema_id.into(),
            schema_version: schema_version.into(),
            body,
        }
    }

    fn encode_fields(&self) -> Vec<u8> {
        fn put_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
            buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
            buf.extend_from_slice(bytes);
        }

        let mut buf = Vec::new();
        put_bytes(&mut buf, self.document_id.as_bytes());
        put_bytes(&mut buf, self.schema_id.as_bytes());
        put_bytes(&mut buf, self.schema_version.as_bytes());
        put_bytes(&mut buf, &self.body);
        buf
    }

    /// Serializes the complete record, checksum included.
    pub fn serialize(&self) -> Vec<u8> {
        let fields = self.encode_fields();
        let record_length = (4 + fields.len() + 4) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&fields);

        let mut hasher = Hasher::new();
        hasher.update(&record);
        record.extend_from_slice(&hasher.finalize().to_le_bytes());

        record
    }

    /// Deserializes one record from the front of `data`, verifying the
    /// checksum. Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        // length + three empty strings + empty body + checksum
        const MIN_RECORD_SIZE: usize = 4 + 4 * 4 + 4;

        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "record too short",
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid record length {}", record_length),
            ));
        }
        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);

        let mut hasher = Hasher::new();
        hasher.update(&data[..checksum_offset]);
        let computed = hasher.finalize();
        if computed != stored {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("checksum mismatch: computed {:08x}, stored {:08x}", computed, stored),
            ));
        }

        fn take_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
            let mut len_buf = [0u8; 4];
            reader.read_exact(&mut len_buf)?;
            let mut buf = vec![0u8; u32::from_le_bytes(len_buf) as usize];
            reader.read_exact(&mut buf)?;
            Ok(buf)
        }

        fn take_string<R: Read>(reader: &mut R) -> io::Result<String> {
            String::from_utf8(take_bytes(reader)?).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("invalid UTF-8: {}", e))
            })
        }

        let mut cursor = io::Cursor::new(&data[4..checksum_offset]);
        let document_id = take_string(&mut cursor)?;
        let schema_id = take_string(&mut cursor)?;
        let schema_version = take_string(&mut cursor)?;
        let body = take_bytes(&mut cursor)?;

        Ok((
            Self {
                document_id,
                schema_id,
                schema_version,
                body,
            },
            record_length,
        ))
    }
}
