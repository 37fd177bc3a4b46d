/**
    xenstore-rs provides a Rust based xenstore implementation.
    Copyright (C) 2016 Star Lab Corp.

    This program is free software; you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation; either version 2 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License along
    with this program; if not, see <http://www.gnu.org/licenses/>.
**/

//! An incremental packet parser that tolerates arbitrary fragmentation.

use crate::error::Error;
use crate::op::Op;
use crate::packet::{Packet, RawHeader, HEADER_SIZE};

/// What the caller should do next: read more bytes, or extract a result.
#[derive(Debug)]
pub enum State<'a> {
    /// The parser needs exactly this many more bytes before it can make progress.
    Continue(usize),
    /// The parser is finished; this is its terminal result.
    Done(&'a Result<Packet, Error>),
}

enum Inner {
    ReadingHeader { buf: Vec<u8> },
    ReadingBody { ty: Op, rid: u32, tid: u32, len: usize, data: Vec<u8> },
    Finished(Result<Packet, Error>),
}

/// A single-owner, mutable state machine that assembles one `Packet` from
/// arbitrarily fragmented byte input.
///
/// Once `Finished`, further calls to `input` are no-ops; allocate a fresh
/// `Parser` for the next frame.
pub struct Parser {
    inner: Inner,
}

impl Parser {
    /// Create a fresh parser, ready to read a header.
    pub fn create() -> Parser {
        Parser {
            inner: Inner::ReadingHeader { buf: Vec::with_capacity(HEADER_SIZE) },
        }
    }

    /// Report what the parser needs next.
    pub fn state(&self) -> State<'_> {
        match &self.inner {
            Inner::ReadingHeader { buf } => State::Continue(HEADER_SIZE - buf.len()),
            Inner::ReadingBody { len, data, .. } => State::Continue(len - data.len()),
            Inner::Finished(result) => State::Done(result),
        }
    }

    /// Feed a fragment of bytes into the parser.
    ///
    /// Callers must never pass more bytes than the most recent `state()`
    /// call's `Continue(n)` reported; the parser makes no attempt to buffer
    /// or reject an oversized fragment beyond what its current state needs.
    pub fn input(&mut self, fragment: &[u8]) {
        log::trace!("parser input: {} bytes", fragment.len());
        let header_to_finish = match &mut self.inner {
            Inner::Finished(_) => None,
            Inner::ReadingHeader { buf } => {
                buf.extend_from_slice(fragment);
                if buf.len() < HEADER_SIZE {
                    return;
                }
                let mut header_bytes = [0u8; HEADER_SIZE];
                header_bytes.copy_from_slice(&buf[..HEADER_SIZE]);
                Some(RawHeader::parse(&header_bytes))
            }
            Inner::ReadingBody { data, len, .. } => {
                data.extend_from_slice(fragment);
                if data.len() < *len {
                    return;
                }
                None
            }
        };

        if let Some(header) = header_to_finish {
            self.finish_header(header);
            return;
        }

        if let Inner::ReadingBody { ty, rid, tid, data, .. } =
            std::mem::replace(&mut self.inner, Inner::Finished(Err(Error::EndOfStream)))
        {
            self.inner = Inner::Finished(Ok(Packet::create(tid, rid, ty, data)));
        }
    }

    /// If finished, take the result and reset to a fresh header-reading state.
    /// Leaves the parser untouched (returns `None`) if it still wants input.
    pub fn take_finished(&mut self) -> Option<Result<Packet, Error>> {
        match &self.inner {
            Inner::Finished(_) => {}
            _ => return None,
        }
        match std::mem::replace(&mut self.inner, Inner::ReadingHeader { buf: Vec::with_capacity(HEADER_SIZE) }) {
            Inner::Finished(result) => Some(result),
            _ => unreachable!("checked above"),
        }
    }

    fn finish_header(&mut self, header: RawHeader) {
        let len = header.clamped_len();
        match Op::of_int(header.msg_type) {
            Err(e) => {
                log::debug!("parser finished with error: {}", e);
                self.inner = Inner::Finished(Err(e));
            }
            Ok(ty) if len == 0 => {
                self.inner =
                    Inner::Finished(Ok(Packet::create(header.tx_id, header.req_id, ty, Vec::new())));
            }
            Ok(ty) => {
                self.inner = Inner::ReadingBody {
                    ty,
                    rid: header.req_id,
                    tid: header.tx_id,
                    len,
                    data: Vec::with_capacity(len),
                };
            }
        }
    }
}

impl Default for Parser {
    fn default() -> Parser {
        Parser::create()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    fn expect_done(parser: &Parser) -> Packet {
        match parser.state() {
            State::Done(Ok(pkt)) => pkt.clone(),
            State::Done(Err(e)) => panic!("parser finished with error: {}", e),
            State::Continue(n) => panic!("parser still wants {} bytes", n),
        }
    }

    #[test]
    fn single_shot_round_trip() {
        let pkt = Packet::create(0, 7, Op::Read, b"/foo/bar\0".to_vec());
        let bytes = pkt.marshal();

        let mut parser = Parser::create();
        parser.input(&bytes);
        assert_eq!(expect_done(&parser), pkt);
    }

    #[test]
    fn byte_by_byte_round_trip() {
        let pkt = Packet::create(3, 1, Op::Introduce, b"3\x004660\x005\x00".to_vec());
        let bytes = pkt.marshal();

        let mut parser = Parser::create();
        for b in &bytes {
            parser.input(std::slice::from_ref(b));
        }
        assert_eq!(expect_done(&parser), pkt);
    }

    #[test]
    fn s6_fragmented_recv() {
        let pkt = Packet::create(0, 7, Op::Read, b"/foo/bar\0".to_vec());
        let bytes = pkt.marshal();
        assert_eq!(bytes.len(), 23);

        let mut parser = Parser::create();
        parser.input(&bytes[0..3]);
        parser.input(&bytes[3..13]);
        parser.input(&bytes[13..23]);
        assert_eq!(expect_done(&parser), pkt);
    }

    #[test]
    fn unknown_op_is_an_error() {
        let mut header = vec![];
        header.extend_from_slice(&999u32.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());

        let mut parser = Parser::create();
        parser.input(&header);
        match parser.state() {
            State::Done(Err(Error::UnknownOp(999))) => {}
            other => panic!("expected UnknownOp(999), got {:?}", other),
        }
    }

    #[test]
    fn length_is_clamped_to_payload_max() {
        let mut header = vec![];
        header.extend_from_slice(&(Op::Write.to_int()).to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());
        header.extend_from_slice(&50000u32.to_le_bytes());

        let mut parser = Parser::create();
        parser.input(&header);
        match parser.state() {
            State::Continue(n) => assert_eq!(n, 4096),
            other => panic!("expected Continue(4096), got {:?}", other),
        }
    }

    #[test]
    fn zero_length_finishes_immediately_after_header() {
        let pkt = Packet::create(0, 0, Op::TransactionStart, Vec::new());
        let bytes = pkt.marshal();
        assert_eq!(bytes.len(), HEADER_SIZE);

        let mut parser = Parser::create();
        parser.input(&bytes);
        assert_eq!(expect_done(&parser), pkt);
    }

    #[test]
    fn finished_parser_ignores_further_input() {
        let pkt = Packet::create(0, 0, Op::TransactionStart, Vec::new());
        let mut parser = Parser::create();
        parser.input(&pkt.marshal());
        assert!(matches!(parser.state(), State::Done(Ok(_))));
        parser.input(b"garbage");
        assert_eq!(expect_done(&parser), pkt);
    }

    #[test]
    fn fragmentation_robustness_property() {
        fn prop(data: Vec<u8>, cuts: Vec<u8>) -> bool {
            let data: Vec<u8> = data.into_iter().take(200).collect();
            let pkt = Packet::create(0, 0, Op::Write, data);
            let bytes = pkt.marshal();

            // Build a partition of `bytes` out of the cut points, each mapped
            // into range and deduped, always including the final boundary.
            let mut points: Vec<usize> = cuts
                .iter()
                .map(|c| 1 + (*c as usize) % bytes.len())
                .collect();
            points.push(bytes.len());
            points.sort_unstable();
            points.dedup();

            let mut parser = Parser::create();
            let mut start = 0;
            for end in points {
                parser.input(&bytes[start..end]);
                start = end;
            }

            match parser.state() {
                State::Done(Ok(got)) => *got == pkt,
                _ => false,
            }
        }
        quickcheck(prop as fn(Vec<u8>, Vec<u8>) -> bool);
    }
}
