//! An open container and the Exif tag tree read from it.

use std::{borrow::Cow, sync::Arc};

use exif_container_types::exif::Endianness;

use crate::{
    codec::{DecodeOptions, ExifCodec, RelocationDelta, TagTree, TiffCodec, error::CodecError},
    config::Limits,
    converter::ValueConverter,
    data_buf::DataBuf,
    error::AccessorError,
    factory::ContainerKind,
    locator::{find_tiff_header, tiff_slice},
    providers::{jpeg, png, tiff},
    stream::{self, MetadataStream},
};

/// Byte order for Exif created from scratch in JPEG and PNG files.
const DEFAULT_ENDIANNESS: Endianness = Endianness::Little;

fn read_err(e: std::io::Error) -> AccessorError {
    log::error!("Failed to read the stream! err: {e}");
    AccessorError::Read(Arc::new(e))
}

fn write_err(e: std::io::Error) -> AccessorError {
    log::error!("Failed to write the stream! err: {e}");
    AccessorError::Write(Arc::new(e))
}

/// One open container.
///
/// Get one from [`AccessorFactory`](crate::factory::AccessorFactory). It
/// starts with no tag tree: call [`read`](Self::read) to decode the
/// container's Exif, or [`create_exif_data`](Self::create_exif_data) to start
/// fresh.
///
/// Nothing touches the stream until a write fully succeeds. Every write
/// builds the complete new container first, then swaps it in with
/// [`MetadataStream::replace`].
#[derive(Clone, Debug)]
pub struct ContainerHandle<S: MetadataStream, C: ExifCodec = TiffCodec> {
    stream: S,
    kind: ContainerKind,
    codec: C,
    limits: Limits,
    tree: Option<TagTree>,

    /// For TIFF files, one past the last byte [`tiff::read`] touched.
    max_addr_read: Option<u32>,
}

impl<S: MetadataStream, C: ExifCodec> ContainerHandle<S, C> {
    pub(crate) fn new(stream: S, kind: ContainerKind, codec: C, limits: Limits) -> Self {
        Self {
            stream,
            kind,
            codec,
            limits,
            tree: None,
            max_addr_read: None,
        }
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn tag_tree(&self) -> Option<&TagTree> {
        self.tree.as_ref()
    }

    pub fn tag_tree_mut(&mut self) -> Option<&mut TagTree> {
        self.tree.as_mut()
    }

    /// Gives the stream back.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Decodes the container's Exif into a tag tree.
    ///
    /// Any tree this handle already had is replaced. If the container has no
    /// Exif, this returns [`AccessorError::ExifNotFound`] and the old tree is
    /// kept.
    pub fn read(&mut self) -> Result<&TagTree, AccessorError> {
        let (tree, max_addr_read) = match self.kind {
            ContainerKind::Jpeg | ContainerKind::Png => {
                let Some(blob) = self.read_exif_blob()? else {
                    log::debug!("No Exif in this `{:?}` container.", self.kind);
                    return Err(AccessorError::ExifNotFound);
                };

                let Some((tiff, endianness)) = tiff_slice(blob.as_slice()) else {
                    log::error!("Exif blob has no TIFF header.");
                    return Err(CodecError::NoByteOrderMarker.into());
                };

                let options = DecodeOptions {
                    byte_order_hint: Some(endianness),
                    max_addr: None,
                    follow_ifd1: true,
                };
                (self.codec.decode(tiff, options)?.tree, None)
            }

            ContainerKind::Tiff => {
                let data: Cow<'_, [u8]> = stream::load(&mut self.stream).map_err(read_err)?;
                let decoded = tiff::read(&data, &self.codec)?;
                (decoded.tree, Some(decoded.max_addr_read))
            }
        };

        log::debug!("Read Exif from `{:?}` container.", self.kind);
        self.max_addr_read = max_addr_read;
        let tree: &TagTree = self.tree.insert(tree);
        Ok(tree)
    }

    /// Encodes the tag tree and writes it into the container.
    pub fn write(&mut self) -> Result<(), AccessorError> {
        let Some(tree) = self.tree.as_ref() else {
            log::error!("Can't write without a tag tree.");
            return Err(AccessorError::NoTagTree);
        };

        let out: Vec<u8> = match self.kind {
            ContainerKind::Jpeg | ContainerKind::Png => {
                let blob: Vec<u8> = self.codec.encode(tree, RelocationDelta::ZERO, None)?;
                let data: Cow<'_, [u8]> = stream::load(&mut self.stream).map_err(read_err)?;
                match self.kind {
                    ContainerKind::Jpeg => jpeg::write_exif_blob(&data, &blob, &self.limits)?,
                    _ => png::write_exif_blob(&data, &blob)?,
                }
            }

            ContainerKind::Tiff => {
                let data: Cow<'_, [u8]> = stream::load(&mut self.stream).map_err(read_err)?;
                tiff::write(&data, tree, self.max_addr_read, &self.codec, &self.limits)?
            }
        };

        self.stream.replace(&out).map_err(write_err)?;

        // the new IFDs now end the file, so the next write can go in place
        if self.kind == ContainerKind::Tiff {
            self.max_addr_read = find_tiff_header(&out)
                .and_then(|h| u32::try_from(out.len() - h.offset).ok());
        }

        log::debug!("Wrote `{}` bytes to the stream.", out.len());
        Ok(())
    }

    /// Copies the container's raw Exif blob out, if it has one.
    ///
    /// TIFF files don't have a blob. Their IFDs are the file itself.
    pub fn read_exif_blob(&mut self) -> Result<Option<DataBuf>, AccessorError> {
        let kind = self.kind;
        let data: Cow<'_, [u8]> = stream::load(&mut self.stream).map_err(read_err)?;

        let blob: Option<DataBuf> = match kind {
            ContainerKind::Jpeg => jpeg::read_exif_blob(&data)?.map(DataBuf::from),
            ContainerKind::Png => png::read_exif_blob(&data, &self.limits)?
                .map(|b: Cow<'_, [u8]>| DataBuf::from(b.into_owned())),
            ContainerKind::Tiff => {
                log::error!("TIFF files have no separate Exif blob.");
                return Err(AccessorError::Unsupported {
                    kind,
                    operation: "read_exif_blob",
                });
            }
        };
        Ok(blob)
    }

    /// Replaces the container's Exif with `blob` as-is.
    ///
    /// The blob isn't checked, so it doesn't even have to be Exif. The
    /// handle's tag tree is left alone.
    pub fn write_exif_blob(&mut self, blob: &[u8]) -> Result<(), AccessorError> {
        let kind = self.kind;
        if kind == ContainerKind::Tiff {
            log::error!("TIFF files have no separate Exif blob.");
            return Err(AccessorError::Unsupported {
                kind,
                operation: "write_exif_blob",
            });
        }

        let out: Vec<u8> = {
            let data: Cow<'_, [u8]> = stream::load(&mut self.stream).map_err(read_err)?;
            match kind {
                ContainerKind::Jpeg => jpeg::write_exif_blob(&data, blob, &self.limits)?,
                _ => png::write_exif_blob(&data, blob)?,
            }
        };

        self.stream.replace(&out).map_err(write_err)
    }

    /// Starts over with an empty tag tree.
    ///
    /// TIFF files keep their own byte order. Everything else uses little
    /// endian.
    pub fn create_exif_data(&mut self) -> Result<&mut TagTree, AccessorError> {
        let endianness: Endianness = match self.kind {
            ContainerKind::Jpeg | ContainerKind::Png => DEFAULT_ENDIANNESS,
            ContainerKind::Tiff => {
                let data: Cow<'_, [u8]> = stream::load(&mut self.stream).map_err(read_err)?;
                find_tiff_header(&data)
                    .map(|h| h.endianness)
                    .unwrap_or(DEFAULT_ENDIANNESS)
            }
        };

        log::debug!("Created empty `{endianness:?}` Exif data.");
        Ok(self.tree.insert(TagTree::new(endianness)))
    }

    /// Reads one value from the tag tree by key name.
    pub fn get_value(&self, key: &str) -> Option<String> {
        self.tree.as_ref()?.get(key)
    }

    /// Checks and normalizes `value`, then stores it in the tag tree.
    ///
    /// Nothing is written to the stream until [`write`](Self::write).
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), AccessorError> {
        if ValueConverter::is_modify_allowed(key) && !TagTree::can_store(key) {
            log::warn!("`{key}` may be modified, but the tag tree has no place for it.");
            return Err(AccessorError::NotStorable {
                key: key.to_string(),
            });
        }

        let normalized: String = ValueConverter::convert(key, value)
            .inspect_err(|e| log::warn!("Refusing value for `{key}`. err: {e}"))?;

        let Some(tree) = self.tree.as_mut() else {
            log::error!("Can't set `{key}` without a tag tree.");
            return Err(AccessorError::NoTagTree);
        };
        Ok(tree.set(key, &normalized)?)
    }
}
