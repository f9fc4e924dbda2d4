//! Serializer contract for snapshots.
//!
//! The core hands whole record sequences to an [`Encoder`] and expects a
//! [`Decoder`] to reproduce them in meaning. Bytes on disk are the codec's
//! business.

use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{AgendaError, AgendaResult};

pub trait Encoder {
    fn encode<T: Serialize + ?Sized>(&mut self, value: &T) -> AgendaResult<()>;
}

pub trait Decoder {
    fn decode<T: DeserializeOwned>(&mut self) -> AgendaResult<T>;
}

/// Pretty-printed JSON, one value per `encode` call.
pub struct JsonEncoder<W: Write> {
    writer: W,
}

impl<W: Write> JsonEncoder<W> {
    pub fn new(writer: W) -> Self {
        JsonEncoder { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Encoder for JsonEncoder<W> {
    fn encode<T: Serialize + ?Sized>(&mut self, value: &T) -> AgendaResult<()> {
        serde_json::to_writer_pretty(&mut self.writer, value)
            .map_err(|e| AgendaError::Codec(e.to_string()))?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Reads consecutive JSON values from a stream.
pub struct JsonDecoder<R: Read> {
    values: serde_json::StreamDeserializer<'static, serde_json::de::IoRead<R>, serde_json::Value>,
}

impl<R: Read> JsonDecoder<R> {
    pub fn new(reader: R) -> Self {
        JsonDecoder {
            values: serde_json::Deserializer::from_reader(reader).into_iter(),
        }
    }
}

impl<R: Read> JsonDecoder<R> {
    /// Fail unless only whitespace follows the values decoded so far.
    pub fn finish(mut self) -> AgendaResult<()> {
        match self.values.next() {
            None => Ok(()),
            Some(Ok(_)) => Err(AgendaError::Codec("unexpected trailing value".into())),
            Some(Err(e)) => Err(AgendaError::Codec(e.to_string())),
        }
    }
}

impl<R: Read> Decoder for JsonDecoder<R> {
    fn decode<T: DeserializeOwned>(&mut self) -> AgendaResult<T> {
        let value = self
            .values
            .next()
            .ok_or_else(|| AgendaError::Codec("unexpected end of input".into()))?
            .map_err(|e| AgendaError::Codec(e.to_string()))?;

        serde_json::from_value(value).map_err(|e| AgendaError::Codec(e.to_string()))
    }
}
