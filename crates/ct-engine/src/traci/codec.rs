//! Byte-level encoding and decoding of TraCI messages.

use crate::{EngineError, EngineResult};

use super::{RESPONSE_OFFSET, RTYPE_OK};

// ── Encoding ──────────────────────────────────────────────────────────────────

pub(crate) fn put_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

pub(crate) fn put_f64(buf: &mut Vec<u8>, v: f64) {
    buf.extend_from_slice(&v.to_be_bytes());
}

pub(crate) fn put_string(buf: &mut Vec<u8>, s: &str) {
    put_i32(buf, s.len() as i32);
    buf.extend_from_slice(s.as_bytes());
}

/// Append one command, choosing the short or extended length header.
pub(crate) fn put_command(buf: &mut Vec<u8>, id: u8, payload: &[u8]) {
    let short_len = 1 + 1 + payload.len();
    if short_len <= u8::MAX as usize {
        buf.push(short_len as u8);
    } else {
        buf.push(0);
        put_i32(buf, (1 + 4 + 1 + payload.len()) as i32);
    }
    buf.push(id);
    buf.extend_from_slice(payload);
}

/// Payload of a variable getter: `var`, `object`, then extra parameters.
pub(crate) fn get_payload(var: u8, object: &str, params: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(1 + 4 + object.len() + params.len());
    payload.push(var);
    put_string(&mut payload, object);
    payload.extend_from_slice(params);
    payload
}

/// Wrap a single command into a complete length-prefixed message.
pub(crate) fn frame(id: u8, payload: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(payload.len() + 6);
    put_command(&mut body, id, payload);
    let mut msg = Vec::with_capacity(body.len() + 4);
    put_i32(&mut msg, (body.len() + 4) as i32);
    msg.extend_from_slice(&body);
    msg
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Cursor over a received message body (after the 4-byte total length).
pub(crate) struct Storage<'a> {
    data: &'a [u8],
    pos:  usize,
}

impl<'a> Storage<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> EngineResult<&'a [u8]> {
        let end = self.pos + n;
        if end > self.data.len() {
            return Err(EngineError::Protocol(format!(
                "truncated response: wanted {n} bytes at offset {}, have {}",
                self.pos,
                self.data.len() - self.pos
            )));
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn read_u8(&mut self) -> EngineResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn read_i32(&mut self) -> EngineResult<i32> {
        let b = self.take(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub(crate) fn read_f64(&mut self) -> EngineResult<f64> {
        let b = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(b);
        Ok(f64::from_be_bytes(raw))
    }

    pub(crate) fn read_string(&mut self) -> EngineResult<String> {
        let len = self.read_i32()?;
        if len < 0 {
            return Err(EngineError::Protocol(format!("negative string length {len}")));
        }
        let bytes = self.take(len as usize)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| EngineError::Protocol("string is not valid UTF-8".into()))
    }

    pub(crate) fn read_string_list(&mut self) -> EngineResult<Vec<String>> {
        let n = self.read_i32()?;
        if n < 0 {
            return Err(EngineError::Protocol(format!("negative list length {n}")));
        }
        (0..n).map(|_| self.read_string()).collect()
    }

    /// Command length header: one byte, or zero followed by an `i32`.
    pub(crate) fn read_length(&mut self) -> EngineResult<usize> {
        match self.read_u8()? {
            0 => Ok(self.read_i32()?.max(0) as usize),
            n => Ok(n as usize),
        }
    }

    /// Consume a type tag and fail unless it is `expected`.
    pub(crate) fn expect_type(&mut self, expected: u8) -> EngineResult<()> {
        let got = self.read_u8()?;
        if got != expected {
            return Err(EngineError::Protocol(format!(
                "expected value type 0x{expected:02x}, got 0x{got:02x}"
            )));
        }
        Ok(())
    }

    /// Consume the status block answering command `id`.
    pub(crate) fn read_status(&mut self, id: u8) -> EngineResult<()> {
        self.read_length()?;
        let got = self.read_u8()?;
        let result = self.read_u8()?;
        let description = self.read_string()?;
        if got != id {
            return Err(EngineError::Protocol(format!(
                "status for command 0x{got:02x}, expected 0x{id:02x}"
            )));
        }
        if result != RTYPE_OK {
            return Err(EngineError::Command { command: id, message: description });
        }
        Ok(())
    }

    /// Consume the header of a getter result, leaving the cursor on the
    /// value's type tag.
    pub(crate) fn read_get_header(&mut self, id: u8, var: u8) -> EngineResult<()> {
        self.read_length()?;
        let response = self.read_u8()?;
        let got_var = self.read_u8()?;
        self.read_string()?;
        if response != id.wrapping_add(RESPONSE_OFFSET) || got_var != var {
            return Err(EngineError::Protocol(format!(
                "unexpected result 0x{response:02x}/0x{got_var:02x} for 0x{id:02x}/0x{var:02x}"
            )));
        }
        Ok(())
    }
}
