// Copyright 2025 Tyler Neely (tylerneely@gmail.com).
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.
//
// See http://creativecommons.org/licenses/MIT/ for more information.

//! Patch librarian for the Yamaha DX7 and TX7.
//!
//! Decodes single voice and 32 voice SYSEX dumps, folds many of them into
//! a deduplicated, searchable [`Library`], and encodes voices back into
//! messages for the instrument. [`FrameAssembler`] rebuilds complete
//! messages from the chunks a MIDI transport delivers.

#![warn(missing_docs)]

pub mod bank;
pub mod checksum;
pub mod codec;
pub mod dedup;
mod display;
pub mod error;
pub mod frame;
pub mod library;
pub mod patch;
pub mod scan;
pub mod transport;

pub use bank::{dump_request, encode_bulk, encode_single, encode_voice, Bank, Header};
pub use checksum::checksum;
pub use codec::Format;
pub use dedup::{content_hash, DedupTable};
pub use error::{Error, Result};
pub use frame::{CancelToken, FrameAssembler, FrameReceiver, Mode, State};
pub use library::Library;
pub use patch::{Envelope, KeyboardScaling, Lfo, Operator, Voice};
pub use transport::{download, upload, SysexSink};
