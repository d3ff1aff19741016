//! Fetching media and reading its length.

use std::fs::File;
use std::io::{self, Cursor, ErrorKind, Read, Seek, SeekFrom};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use lofty::file::AudioFile;
use lofty::probe::Probe;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{CONTENT_RANGE, HeaderMap, RANGE};
use tracing::debug;

use crate::library::MediaSource;

use super::error::MediaError;

const CHUNK: usize = 64 * 1024;
/// Upper bound on what a `Content-Length` may preallocate.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Leading bytes fetched to probe remote media: headers and first frames.
pub(super) const PROBE_HEAD: u64 = 256 * 1024;
/// Trailing bytes fetched to probe remote media, where trailing tags and
/// final page positions live.
pub(super) const PROBE_TAIL: u64 = 64 * 1024;

static CLIENT: OnceLock<Client> = OnceLock::new();

fn http_client() -> Result<&'static Client, MediaError> {
    if let Some(client) = CLIENT.get() {
        return Ok(client);
    }
    let client = Client::builder()
        // Whole tracks are read over links of any speed.
        .timeout(None)
        .user_agent(concat!("medley/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(CLIENT.get_or_init(|| client))
}

/// Read `reader` to the end in chunks, giving up as soon as `cancel` is set.
fn read_cancellable(
    mut reader: impl Read,
    cancel: &AtomicBool,
    size_hint: Option<u64>,
) -> Result<Vec<u8>, MediaError> {
    let capacity = size_hint.unwrap_or(0).min(MAX_PREALLOC) as usize;
    let mut out = Vec::with_capacity(capacity);
    let mut buf = vec![0u8; CHUNK];
    loop {
        if cancel.load(Ordering::Acquire) {
            return Err(MediaError::Cancelled);
        }
        match reader.read(&mut buf) {
            Ok(0) => return Ok(out),
            Ok(n) => out.extend_from_slice(&buf[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
}

fn get(url: &str, range: Option<String>) -> Result<Response, MediaError> {
    let mut req = http_client()?.get(url);
    if let Some(r) = range {
        req = req.header(RANGE, r);
    }
    let resp = req.send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(MediaError::Status(status.as_u16()));
    }
    Ok(resp)
}

/// Read the whole media into memory.
pub(super) fn fetch_bytes(
    source: &MediaSource,
    cancel: &AtomicBool,
) -> Result<Vec<u8>, MediaError> {
    match source {
        MediaSource::File(path) => {
            let file = File::open(path)?;
            let len = file.metadata().ok().map(|m| m.len());
            read_cancellable(file, cancel, len)
        }
        MediaSource::Url(url) => {
            debug!(%url, "fetching");
            let resp = get(url, None)?;
            let len = resp.content_length();
            read_cancellable(resp, cancel, len)
        }
    }
}

fn probe_reader<R: Read + Seek>(reader: R) -> Option<Duration> {
    let tagged = Probe::new(reader).guess_file_type().ok()?.read().ok()?;
    Some(tagged.properties().duration()).filter(|d| !d.is_zero())
}

/// Length of the encoded audio, if the container reports one.
pub(super) fn probe_duration(bytes: &[u8]) -> Option<Duration> {
    probe_reader(Cursor::new(bytes))
}

/// Length of the media behind `source`, reading as little of it as possible.
///
/// Local files are probed in place. Remote media is probed from ranged
/// requests for its head and tail; servers without range support send the
/// whole body instead.
pub(super) fn probe_source(
    source: &MediaSource,
    cancel: &AtomicBool,
) -> Result<Option<Duration>, MediaError> {
    match source {
        MediaSource::File(path) => {
            let file = File::open(path)?;
            Ok(probe_reader(io::BufReader::new(file)))
        }
        MediaSource::Url(url) => probe_remote(url, cancel),
    }
}

fn probe_remote(url: &str, cancel: &AtomicBool) -> Result<Option<Duration>, MediaError> {
    let resp = get(url, Some(format!("bytes=0-{}", PROBE_HEAD - 1)))?;
    if resp.status() != StatusCode::PARTIAL_CONTENT {
        debug!(%url, "no range support, probing the full body");
        let len = resp.content_length();
        let bytes = read_cancellable(resp, cancel, len)?;
        return Ok(probe_duration(&bytes));
    }

    let total = content_range_total(resp.headers());
    let head = read_cancellable(resp, cancel, Some(PROBE_HEAD))?;
    let head_len = head.len() as u64;
    let Some(total) = total.filter(|&t| t > head_len) else {
        return Ok(probe_duration(&head));
    };

    let tail_start = total.saturating_sub(PROBE_TAIL).max(head_len);
    let tail_resp = get(url, Some(format!("bytes={tail_start}-")))?;
    let tail = if tail_resp.status() == StatusCode::PARTIAL_CONTENT {
        read_cancellable(tail_resp, cancel, Some(total - tail_start))?
    } else {
        Vec::new()
    };
    debug!(%url, total, head = head_len, tail = tail.len(), "probing sparse media");
    Ok(probe_reader(SparseMedia::new(total, head, tail_start, tail)))
}

/// The complete length from a `Content-Range: bytes a-b/total` header.
fn content_range_total(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(CONTENT_RANGE)?.to_str().ok()?;
    value.rsplit_once('/')?.1.trim().parse().ok()
}

/// A file of known length of which only the head and tail are held.
/// Everything in between reads as zeros.
pub(super) struct SparseMedia {
    len: u64,
    head: Vec<u8>,
    tail_start: u64,
    tail: Vec<u8>,
    pos: u64,
}

impl SparseMedia {
    pub(super) fn new(len: u64, head: Vec<u8>, tail_start: u64, tail: Vec<u8>) -> Self {
        Self {
            len,
            head,
            tail_start,
            tail,
            pos: 0,
        }
    }
}

fn held_at(data: &[u8], start: u64, pos: u64) -> Option<&[u8]> {
    let offset = usize::try_from(pos.checked_sub(start)?).ok()?;
    data.get(offset..).filter(|rest| !rest.is_empty())
}

impl Read for SparseMedia {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.len || buf.is_empty() {
            return Ok(0);
        }
        let remaining = usize::try_from(self.len - self.pos).unwrap_or(usize::MAX);
        let want = buf.len().min(remaining);

        let held = held_at(&self.head, 0, self.pos)
            .or_else(|| held_at(&self.tail, self.tail_start, self.pos));
        let n = match held {
            Some(bytes) => {
                let n = want.min(bytes.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                n
            }
            None => {
                let next = if self.pos < self.tail_start {
                    self.tail_start
                } else {
                    self.len
                };
                let n = want.min(usize::try_from(next - self.pos).unwrap_or(usize::MAX));
                buf[..n].fill(0);
                n
            }
        };
        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for SparseMedia {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(n) => Some(n),
            SeekFrom::End(d) => self.len.checked_add_signed(d),
            SeekFrom::Current(d) => self.pos.checked_add_signed(d),
        };
        let Some(target) = target else {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                "seek before the start of the media",
            ));
        };
        self.pos = target;
        Ok(target)
    }
}
