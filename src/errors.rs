// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can stop a render.  None of these are recoverable
//! from inside the renderer; the caller gets exactly one of them and
//! decides whether to start over.

use failure::Fail;
use std::io;

/// The single error type returned by every fallible operation in this
/// crate.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The render parameters, the jitter table or the worker settings
    /// do not describe a render we can perform.
    #[fail(display = "invalid render parameters: {}", reason)]
    InvalidSpec {
        /// What was wrong with them.
        reason: String,
    },

    /// The image buffer could not be sized or reserved.
    #[fail(display = "could not allocate an image buffer of {} bytes", bytes)]
    Allocation {
        /// The requested size; `usize::MAX` when the size itself overflowed.
        bytes: usize,
    },

    /// The lock around the row cursor is no longer usable.
    #[fail(display = "the row cursor lock was poisoned by a failed worker")]
    Synchronization,

    /// A worker thread could not be started.
    #[fail(display = "could not start worker thread {}: {}", worker, cause)]
    ThreadCreation {
        /// Index of the worker that failed to start.
        worker: usize,
        /// What the operating system said.
        #[cause]
        cause: io::Error,
    },

    /// A worker thread panicked while rendering.
    #[fail(display = "a worker thread panicked while rendering")]
    WorkerPanicked,

    /// The output file could not be created or written.
    #[fail(display = "could not write {}: {}", path, cause)]
    FileWrite {
        /// Where we tried to write.
        path: String,
        /// The underlying I/O failure.
        #[cause]
        cause: io::Error,
    },
}

impl RenderError {
    pub(crate) fn invalid<S: Into<String>>(reason: S) -> Self {
        RenderError::InvalidSpec {
            reason: reason.into(),
        }
    }
}
