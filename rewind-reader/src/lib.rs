// Copyright (C) 2023, Ava Labs, Inc. All rights reserved.
// See the file LICENSE.md for licensing terms.

#![warn(missing_debug_implementations, rust_2018_idioms, missing_docs)]
#![deny(unsafe_code)]

//! # rewind-reader transparently buffers a [`Read`](std::io::Read) source so it can be rewound
//!
//! [`RewindReader`] wraps any [`Read`](std::io::Read) source and captures every byte it
//! delivers until the first call to [`rewind`](RewindReader::rewind), after which the
//! captured bytes are replayed from the start. Once the consumer reads past the end of
//! the captured data, the capture is dropped and reads pass straight through to the
//! source; a further rewind fails with [`RewindUnavailable`].
//!
//! The typical use is re-reading a prefix of a stream that can only be consumed once,
//! such as a request body that must be sniffed before being handed off:
//!
//! ```
//! use std::io::{Cursor, Read};
//! use rewind_reader::RewindReader;
//!
//! # fn main() -> std::io::Result<()> {
//! let mut reader = RewindReader::new(Cursor::new("foo bar baz"));
//!
//! let mut prefix = [0u8; 3];
//! reader.read_exact(&mut prefix)?;
//! assert_eq!(&prefix, b"foo");
//!
//! reader.rewind()?;
//!
//! let mut replayed = String::new();
//! reader.read_to_string(&mut replayed)?;
//! assert_eq!(replayed, "foo bar baz");
//! # Ok(())
//! # }
//! ```

/// Logger module for handling logging functionality
pub mod logger;
mod reader;

pub use reader::{RewindReader, RewindUnavailable};
