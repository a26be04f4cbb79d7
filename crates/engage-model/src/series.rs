//! ---
//! engage_section: "04-blob-payloads"
//! engage_subsection: "module"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Packed binary data series carried in human biometrics blobs."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
//! Layout, all little-endian and unpadded:
//!
//! ```text
//! header  t:u8  ts:u32  it:u8  im:u8  vt:u8  ss:u8      (9 bytes)
//! element ofs:u8  val:uN                                (ss times, N from vt)
//! ```
//!
//! A blob is a plain concatenation of series.

use bytes::{Buf, BufMut, BytesMut};
use thiserror::Error;

use crate::enums::{DataSeriesValueType, HumanBiometricsType};

pub const HEADER_LEN: usize = 9;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("truncated series: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("invalid value type {0}")]
    InvalidValueType(u8),

    #[error("series holds {0} elements, at most 255 fit")]
    TooManyElements(usize),

    #[error("value {value} does not fit {value_type:?}")]
    ValueOverflow {
        value: u64,
        value_type: DataSeriesValueType,
    },
}

pub type Result<T> = std::result::Result<T, SeriesError>;

/// One sample, positioned by its offset from the series timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataElement {
    pub offset: u8,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSeries {
    /// Raw series type; see [`DataSeries::biometrics_type`].
    pub kind: u8,
    pub ts: u32,
    pub increment_type: u8,
    pub increment_multiplier: u8,
    pub value_type: DataSeriesValueType,
    pub elements: Vec<DataElement>,
}

impl DataSeries {
    pub fn biometrics_type(&self) -> Option<HumanBiometricsType> {
        HumanBiometricsType::from_ordinal(i64::from(self.kind))
    }

    /// Parse every series in `payload`.
    pub fn parse_all(mut payload: &[u8]) -> Result<Vec<DataSeries>> {
        let mut series = Vec::new();
        while payload.has_remaining() {
            series.push(Self::parse(&mut payload)?);
        }
        Ok(series)
    }

    /// Parse one series from the front of `buf`, advancing past it.
    pub fn parse(buf: &mut &[u8]) -> Result<DataSeries> {
        ensure(buf, HEADER_LEN)?;
        let kind = buf.get_u8();
        let ts = buf.get_u32_le();
        let increment_type = buf.get_u8();
        let increment_multiplier = buf.get_u8();
        let raw_type = buf.get_u8();
        let count = usize::from(buf.get_u8());

        let value_type = DataSeriesValueType::from_ordinal(i64::from(raw_type))
            .ok_or(SeriesError::InvalidValueType(raw_type))?;
        let width = value_type.width().ok_or(SeriesError::InvalidValueType(raw_type))?;

        ensure(buf, count * (1 + width))?;
        let elements = (0..count)
            .map(|_| {
                let offset = buf.get_u8();
                let value = match value_type {
                    DataSeriesValueType::Uint8 => u64::from(buf.get_u8()),
                    DataSeriesValueType::Uint16 => u64::from(buf.get_u16_le()),
                    DataSeriesValueType::Uint32 => u64::from(buf.get_u32_le()),
                    _ => buf.get_u64_le(),
                };
                DataElement { offset, value }
            })
            .collect();

        Ok(DataSeries {
            kind,
            ts,
            increment_type,
            increment_multiplier,
            value_type,
            elements,
        })
    }

    /// Append the packed form of this series to `buf`.
    pub fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        let raw_type = self.value_type.ordinal() as u8;
        let width = self
            .value_type
            .width()
            .ok_or(SeriesError::InvalidValueType(raw_type))?;
        let count = u8::try_from(self.elements.len())
            .map_err(|_| SeriesError::TooManyElements(self.elements.len()))?;
        if let Some(element) = self
            .elements
            .iter()
            .find(|element| width < 8 && element.value >> (width * 8) != 0)
        {
            return Err(SeriesError::ValueOverflow {
                value: element.value,
                value_type: self.value_type,
            });
        }

        buf.reserve(HEADER_LEN + self.elements.len() * (1 + width));
        buf.put_u8(self.kind);
        buf.put_u32_le(self.ts);
        buf.put_u8(self.increment_type);
        buf.put_u8(self.increment_multiplier);
        buf.put_u8(raw_type);
        buf.put_u8(count);
        for element in &self.elements {
            buf.put_u8(element.offset);
            match self.value_type {
                DataSeriesValueType::Uint8 => buf.put_u8(element.value as u8),
                DataSeriesValueType::Uint16 => buf.put_u16_le(element.value as u16),
                DataSeriesValueType::Uint32 => buf.put_u32_le(element.value as u32),
                _ => buf.put_u64_le(element.value),
            }
        }
        Ok(())
    }
}

fn ensure(buf: &[u8], needed: usize) -> Result<()> {
    if buf.remaining() < needed {
        return Err(SeriesError::Truncated {
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}
