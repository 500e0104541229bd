// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{Error, PaddedSize};
use crate::cid_collections::CidHashMap;
use crate::utils::db::car_stream::{CarBlock, CarV1Header, ld_read, ld_size};
use cid::Cid;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read as _, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extension carried by unpadded archives.
pub const CAR_SUFFIX: &str = ".car";

/// Outcome of [`pad_car`] or [`unpad_car`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aligned {
    /// Where the file lives now. Differs from the input when the suffix was toggled.
    pub path: PathBuf,
    pub before: u64,
    pub after: u64,
}

impl Aligned {
    fn unchanged(path: &Path, size: u64) -> Self {
        Self {
            path: path.to_owned(),
            before: size,
            after: size,
        }
    }
}

/// Appends zeros to the archive at `path` up to `piece.padded_size(file size)`, then
/// drops a trailing [`CAR_SUFFIX`] from its name.
///
/// An archive that is already piece-sized is left alone.
#[tracing::instrument(skip_all)]
pub fn pad_car(path: impl AsRef<Path>, piece: &impl PaddedSize) -> Result<Aligned, Error> {
    let path = path.as_ref();
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let car_size = file.metadata()?.len();
    CarV1Header::read(&mut BufReader::new(&mut file)).map_err(Error::parsing)?;

    let piece_size = piece.padded_size(car_size);
    if piece_size == car_size {
        debug!(path = %path.display(), car_size, "already piece-sized");
        return Ok(Aligned::unchanged(path, car_size));
    }
    if piece_size < car_size {
        return Err(Error::SizeMismatch {
            expected: piece_size,
            actual: car_size,
        });
    }

    file.seek(SeekFrom::End(0))?;
    io::copy(&mut io::repeat(0).take(piece_size - car_size), &mut file)?;
    file.sync_all()?;
    drop(file);

    let path = match strip_car_suffix(path) {
        Some(renamed) => rename_or_keep(path, renamed),
        None => path.to_owned(),
    };
    info!(path = %path.display(), car_size, piece_size, "padded CAR");
    Ok(Aligned {
        path,
        before: car_size,
        after: piece_size,
    })
}

/// Truncates zero padding after the last record of the archive at `path`, then appends
/// [`CAR_SUFFIX`] to its name.
///
/// The file is only truncated if every root named in the header was found among the
/// records, and everything past the last record is zero. An archive without padding is
/// left alone.
#[tracing::instrument(skip_all)]
pub fn unpad_car(path: impl AsRef<Path>) -> Result<Aligned, Error> {
    let path = path.as_ref();
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let file_size = file.metadata()?.len();
    let (content_size, missing) = scan_records(&mut BufReader::new(&mut file))?;

    if content_size == file_size {
        debug!(path = %path.display(), file_size, "no padding to remove");
        return Ok(Aligned::unchanged(path, file_size));
    }
    if !missing.is_empty() {
        for cid in &missing {
            warn!(path = %path.display(), %cid, "root block not found");
        }
        return Err(Error::MissingBlocks(missing));
    }
    if content_size > file_size || !zeros_from(&mut file, content_size)? {
        return Err(Error::SizeMismatch {
            expected: content_size,
            actual: file_size,
        });
    }

    file.set_len(content_size)?;
    file.sync_all()?;
    drop(file);

    let mut renamed = path.as_os_str().to_owned();
    renamed.push(CAR_SUFFIX);
    let path = rename_or_keep(path, PathBuf::from(renamed));
    info!(path = %path.display(), file_size, content_size, "unpadded CAR");
    Ok(Aligned {
        path,
        before: file_size,
        after: content_size,
    })
}

/// Reads records up to the first zero-length frame or the end of input. Returns the
/// size they span and the header roots that were not among them, in header order.
fn scan_records(reader: &mut impl BufRead) -> Result<(u64, Vec<Cid>), Error> {
    let (header, header_size) = CarV1Header::read(reader).map_err(Error::parsing)?;
    let mut found: CidHashMap<bool> = header.roots.iter().map(|cid| (*cid, false)).collect();
    let mut content_size = header_size;
    loop {
        let frame = match ld_read(reader) {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                debug!(offset = content_size, "short read, treating as end of records");
                break;
            }
            Err(e) => return Err(e.into()),
        };
        content_size += ld_size(frame.len());
        let block = CarBlock::from_bytes(frame).map_err(Error::parsing)?;
        if let Some(seen) = found.get_mut(&block.cid) {
            *seen = true;
        }
    }
    let missing = header
        .roots
        .iter()
        .filter(|cid| found.get(cid) == Some(&false))
        .copied()
        .collect();
    Ok((content_size, missing))
}

fn zeros_from(file: &mut File, offset: u64) -> io::Result<bool> {
    file.seek(SeekFrom::Start(offset))?;
    let mut reader = BufReader::new(file);
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(true);
        }
        if buf.iter().any(|b| *b != 0) {
            return Ok(false);
        }
        let len = buf.len();
        reader.consume(len);
    }
}

fn strip_car_suffix(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(CAR_SUFFIX).filter(|stem| !stem.is_empty())?;
    Some(path.with_file_name(stem))
}

// The content is already aligned at this point, so a failed rename only costs the name.
fn rename_or_keep(from: &Path, to: PathBuf) -> PathBuf {
    match std::fs::rename(from, &to) {
        Ok(()) => to,
        Err(e) => {
            warn!(from = %from.display(), to = %to.display(), error = %e, "rename failed");
            from.to_owned()
        }
    }
}
