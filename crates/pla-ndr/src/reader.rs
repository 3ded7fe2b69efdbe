//! NDR stream reader with pointer deferral
//!
//! Mirror image of [`NdrWriter`](crate::NdrWriter). A non-null referent read
//! by `read_pointer` queues a decoder that fills the pointer's slot when
//! `read_deferred` runs, in the same level-by-level order the writer used.

use std::collections::VecDeque;

use bytes::{Buf, Bytes};
use tracing::trace;

use crate::{NdrContext, NdrDecode, NdrEnum, NdrError, NdrPrimitive, Result};

type DeferredRead<'a> = Box<dyn FnOnce(&mut NdrReader<'a>) -> Result<()> + 'a>;

/// Reads one NDR stream
///
/// `'a` is the lifetime of the slots that queued pointer bodies decode into.
pub struct NdrReader<'a> {
    buf: Bytes,
    position: usize,
    ctx: NdrContext,
    deferred: VecDeque<DeferredRead<'a>>,
}

impl<'a> NdrReader<'a> {
    /// Create a reader over a complete stream
    pub fn new(buf: Bytes, ctx: NdrContext) -> Self {
        Self {
            buf,
            position: 0,
            ctx,
            deferred: VecDeque::new(),
        }
    }

    /// Decoding context
    pub fn context(&self) -> &NdrContext {
        &self.ctx
    }

    /// Byte offset from the start of the stream
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Number of pointer bodies waiting for `read_deferred`
    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    /// Fail with `BufferUnderflow` unless `needed` bytes remain
    pub fn ensure(&self, needed: usize) -> Result<()> {
        let have = self.buf.remaining();
        if have < needed {
            return Err(NdrError::BufferUnderflow { needed, have });
        }
        Ok(())
    }

    /// Skip padding up to the given boundary
    pub fn read_align(&mut self, alignment: usize) -> Result<()> {
        let padding = NdrContext::align_padding(self.position, alignment);
        self.ensure(padding)?;
        self.buf.advance(padding);
        self.position += padding;
        Ok(())
    }

    /// Read a fixed-width scalar at its natural alignment
    pub fn read_data<T: NdrPrimitive>(&mut self) -> Result<T> {
        self.read_align(T::SIZE)?;
        self.ensure(T::SIZE)?;
        let value = T::get(&self.ctx, &mut self.buf);
        self.position += T::SIZE;
        Ok(value)
    }

    /// Read `len` raw bytes with no alignment
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        self.ensure(len)?;
        self.position += len;
        Ok(self.buf.split_to(len))
    }

    /// Read a 32-bit count
    pub fn read_size(&mut self) -> Result<usize> {
        let count: u32 = self.read_data()?;
        usize::try_from(count).map_err(|_| NdrError::IntegerOverflow)
    }

    /// Read a 16-bit enumeration, rejecting values outside the type
    pub fn read_enum<E: NdrEnum>(&mut self) -> Result<E> {
        let raw: u16 = self.read_data()?;
        E::from_wire(raw)
    }

    /// Check a string length read from the wire against the configured limit
    pub fn check_string_len(&self, len: usize) -> Result<()> {
        let limit = self.ctx.limits.max_string_len;
        if len > limit {
            return Err(NdrError::AllocationLimitExceeded { requested: len, limit });
        }
        Ok(())
    }

    /// Check an array element count read from the wire against the configured limit
    pub fn check_array_len(&self, len: usize) -> Result<()> {
        let limit = self.ctx.limits.max_array_elements;
        if len > limit {
            return Err(NdrError::AllocationLimitExceeded { requested: len, limit });
        }
        Ok(())
    }

    /// Read a pointer discriminant; zero means null
    pub fn read_referent(&mut self) -> Result<u32> {
        self.read_data()
    }

    /// Queue a body decoder for the next `read_deferred`
    pub fn defer<F>(&mut self, body: F)
    where
        F: FnOnce(&mut NdrReader<'a>) -> Result<()> + 'a,
    {
        self.deferred.push_back(Box::new(body));
    }

    /// Read a unique pointer into `slot`
    ///
    /// A zero referent leaves `None`. Otherwise the slot receives
    /// `T::default()` once the body is reached, and the body decodes into it.
    pub fn read_pointer<T>(&mut self, slot: &'a mut Option<T>) -> Result<()>
    where
        T: NdrDecode + Default + 'a,
    {
        let referent = self.read_referent()?;
        if referent == 0 {
            *slot = None;
            return Ok(());
        }
        trace!(referent, position = self.position, "deferring pointer body");
        self.defer(move |r| {
            r.read_align(T::ndr_align())?;
            Option::insert(slot, T::default()).ndr_decode(r)
        });
        Ok(())
    }

    /// Decode every queued pointer body, level by level
    pub fn read_deferred(&mut self) -> Result<()> {
        let mut level = 0usize;
        while !self.deferred.is_empty() {
            let mut current = std::mem::take(&mut self.deferred);
            trace!(level, bodies = current.len(), "reading deferred pointer bodies");
            while let Some(body) = current.pop_front() {
                body(self)?;
            }
            level += 1;
        }
        Ok(())
    }

    /// Finish the stream
    ///
    /// Fails if pointer bodies are still queued (debug builds panic) or if
    /// bytes remain after the last value.
    pub fn finish(self) -> Result<()> {
        let pending = self.deferred.len();
        debug_assert!(pending == 0, "NdrReader finished with {pending} unflushed deferred bodies");
        if pending != 0 {
            return Err(NdrError::UnflushedDeferrals(pending));
        }
        match self.buf.remaining() {
            0 => Ok(()),
            n => Err(NdrError::TrailingData(n)),
        }
    }
}

impl std::fmt::Debug for NdrReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NdrReader")
            .field("position", &self.position)
            .field("remaining", &self.buf.remaining())
            .field("pending", &self.deferred.len())
            .finish()
    }
}
