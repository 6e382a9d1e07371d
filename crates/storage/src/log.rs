//! Append-only commit log
//!
//! The commit log is the single backing file of the store. Every successful
//! mutation is appended and fsynced before it becomes visible in memory; on
//! open the log is replayed to rebuild the collection tables.
//!
//! ## Record Format
//!
//! ```text
//! [length: u32 LE][tag: u8][payload: bytes][crc32: u32 LE]
//! ```
//!
//! - **length**: size of tag + payload + crc (NOT including length itself)
//! - **tag**: record type (1=Insert, 2=Replace, 3=Remove)
//! - **payload**: bincode-serialized LogRecord
//! - **crc32**: checksum over \[tag\]\[payload\]
//!
//! Length enables reading variable-sized records; the tag keeps the format
//! open for future record types; the CRC detects bit flips and partial
//! writes. A torn record at the tail (crash mid-append) is dropped and the
//! file truncated to the last whole record. A complete record with a bad CRC
//! is corruption and fatal to open.

use oxp_core::{DocKind, DocumentId, Fault, StoreResult};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

const TAG_INSERT: u8 = 1;
const TAG_REPLACE: u8 = 2;
const TAG_REMOVE: u8 = 3;

/// One logged mutation
///
/// Only mutations that passed their existence check are logged, so replaying
/// a log in order re-applies exactly the serialized history of successful
/// operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogRecord {
    /// A new record was created
    Insert {
        /// Collection the record belongs to
        kind: DocKind,
        /// Caller-assigned id
        id: DocumentId,
        /// Serialized document
        payload: Vec<u8>,
        /// Secondary value, for indexed collections
        secondary: Option<String>,
    },
    /// An existing record's payload was overwritten
    Replace {
        /// Collection the record belongs to
        kind: DocKind,
        /// Id of the overwritten record
        id: DocumentId,
        /// New serialized document
        payload: Vec<u8>,
    },
    /// An existing record was removed
    Remove {
        /// Collection the record belonged to
        kind: DocKind,
        /// Id of the removed record
        id: DocumentId,
    },
}

impl LogRecord {
    /// Collection the logged mutation belongs to
    pub fn kind(&self) -> DocKind {
        match self {
            LogRecord::Insert { kind, .. }
            | LogRecord::Replace { kind, .. }
            | LogRecord::Remove { kind, .. } => *kind,
        }
    }

    fn tag(&self) -> u8 {
        match self {
            LogRecord::Insert { .. } => TAG_INSERT,
            LogRecord::Replace { .. } => TAG_REPLACE,
            LogRecord::Remove { .. } => TAG_REMOVE,
        }
    }
}

/// Encode a record to its framed byte representation
pub fn encode_record(record: &LogRecord) -> StoreResult<Vec<u8>> {
    let payload = bincode::serialize(record).map_err(Fault::from)?;

    // total = tag(1) + payload + crc(4)
    let total_len = 1 + payload.len() + 4;

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&[record.tag()]);
    hasher.update(&payload);
    let crc = hasher.finalize();

    let mut buf = Vec::with_capacity(4 + total_len);
    buf.extend_from_slice(&(total_len as u32).to_le_bytes());
    buf.push(record.tag());
    buf.extend_from_slice(&payload);
    buf.extend_from_slice(&crc.to_le_bytes());
    Ok(buf)
}

/// Outcome of decoding one frame from a byte slice
#[derive(Debug)]
enum Decoded {
    /// A whole, verified record plus the bytes it consumed
    Record(LogRecord, usize),
    /// The slice ends before the frame does (torn tail candidate)
    Incomplete,
}

/// Decode the next frame from `buf`
///
/// Returns `Incomplete` when the slice is shorter than the frame claims,
/// which is only acceptable at end of file. A complete frame that fails its CRC or
/// carries an unknown tag is a corruption fault.
fn decode_record(buf: &[u8], offset: u64) -> StoreResult<Decoded> {
    if buf.len() < 4 {
        return Ok(Decoded::Incomplete);
    }
    let total_len = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    if total_len < 1 + 4 {
        return Err(Fault::Corruption(format!(
            "record at offset {offset} claims impossible length {total_len}"
        ))
        .into());
    }
    if buf.len() < 4 + total_len {
        return Ok(Decoded::Incomplete);
    }

    let frame = &buf[4..4 + total_len];
    let (body, crc_bytes) = frame.split_at(total_len - 4);
    let stored_crc = u32::from_le_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(body);
    if hasher.finalize() != stored_crc {
        return Err(Fault::Corruption(format!("CRC mismatch at offset {offset}")).into());
    }

    let tag = body[0];
    if !matches!(tag, TAG_INSERT | TAG_REPLACE | TAG_REMOVE) {
        return Err(Fault::Corruption(format!("unknown record tag {tag} at offset {offset}")).into());
    }

    let record: LogRecord = bincode::deserialize(&body[1..]).map_err(Fault::from)?;
    Ok(Decoded::Record(record, 4 + total_len))
}

/// Append-only commit log over a single file
///
/// Not internally synchronized; the store serializes appends behind its own
/// lock so log order matches the order mutations become visible.
#[derive(Debug)]
pub struct CommitLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl CommitLog {
    /// Open the log at `path`, replaying any existing records
    ///
    /// Creates the file (and parent directories) if absent. Returns the log
    /// positioned for appending plus every whole record already on disk, in
    /// write order. A torn record at the tail is dropped and the file
    /// truncated to the last whole record; corruption anywhere else fails
    /// the open.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<(Self, Vec<LogRecord>)> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(Fault::Io)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(Fault::Io)?;

        let (records, valid_len) = Self::scan(&mut file, &path)?;

        let file_len = file.metadata().map_err(Fault::Io)?.len();
        if valid_len < file_len {
            warn!(
                path = %path.display(),
                dropped = file_len - valid_len,
                "dropping torn record at commit-log tail"
            );
            file.set_len(valid_len).map_err(Fault::Io)?;
            file.sync_all().map_err(Fault::Io)?;
        }

        Ok((
            Self {
                path,
                writer: BufWriter::new(file),
            },
            records,
        ))
    }

    /// Read every whole record, returning them and the byte length they span
    fn scan(file: &mut File, path: &Path) -> StoreResult<(Vec<LogRecord>, u64)> {
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).map_err(Fault::Io)?;

        let mut records = Vec::new();
        let mut offset = 0usize;
        while offset < buf.len() {
            match decode_record(&buf[offset..], offset as u64) {
                Ok(Decoded::Record(record, consumed)) => {
                    records.push(record);
                    offset += consumed;
                }
                Ok(Decoded::Incomplete) => break,
                Err(e) => {
                    warn!(path = %path.display(), offset, "commit log unreadable");
                    return Err(e);
                }
            }
        }
        Ok((records, offset as u64))
    }

    /// Append a record and force it to disk
    ///
    /// The record is not considered committed until this returns. Flush and
    /// fsync happen on every append; a success here means the mutation
    /// survives a crash.
    pub fn append(&mut self, record: &LogRecord) -> StoreResult<()> {
        let encoded = encode_record(record)?;
        self.writer.write_all(&encoded).map_err(Fault::Io)?;
        self.writer.flush().map_err(Fault::Io)?;
        self.writer.get_ref().sync_all().map_err(Fault::Io)?;
        Ok(())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
