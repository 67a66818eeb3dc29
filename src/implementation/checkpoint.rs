// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provides the checkpointing facility: after each phase of a
//! solve, the material that phase produced can be dumped as a json artefact
//! which remains readable long after the solver process is gone. Useful when
//! a week long estimation run needs auditing, or when its outputs feed some
//! downstream tooling.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::TikTakError;

/// The artefact names a solve may leave behind, in the order they get
/// written: every quasirandom seed with its value, the retained promising
/// seeds, the candidate minima, and the final incumbent.
pub const ARTEFACT_NAMES: [&str; 4] = [
    "quasirandom_points",
    "all_points",
    "local_minima",
    "global_minimum",
];

/// One artefact as it lives on disk: the payload wrapped together with the
/// name it was written under, so that a stray file identifies itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artefact<T> {
    /// The name the artefact was written under
    pub artefact: String,
    /// The payload of the artefact
    pub data: T,
}

/// Writes the artefacts of a solve into a configured directory, one json
/// file per artefact, each written right after the phase that produced it.
///
/// # Example
/// ```
/// # use tiktak::{load_artefact, Checkpointer, EvaluatedPoint};
/// # let dir = std::env::temp_dir().join("tiktak_doc_checkpoint");
/// let checkpointer = Checkpointer::new(&dir);
/// let minimum = EvaluatedPoint { location: vec![1.0, 1.0], value: 0.0 };
/// checkpointer.write("global_minimum", &minimum).unwrap();
///
/// let reloaded = load_artefact::<EvaluatedPoint>(dir.join("global_minimum.json")).unwrap();
/// assert_eq!("global_minimum", reloaded.artefact);
/// assert_eq!(minimum, reloaded.data);
/// # std::fs::remove_dir_all(&dir).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Checkpointer {
    /// Where the artefacts are written
    directory: PathBuf,
}

impl Checkpointer {
    /// Creates a checkpointer writing into the given directory. The
    /// directory itself is only created upon the first write.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Checkpointer {
            directory: directory.into(),
        }
    }

    /// The directory the artefacts are written into.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Dumps one artefact under the given name.
    pub fn write<T: Serialize>(&self, artefact: &str, data: &T) -> Result<(), TikTakError> {
        fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(format!("{}.json", artefact));
        let file = File::create(path)?;
        let wrapped = Artefact {
            artefact: artefact.to_string(),
            data,
        };
        serde_json::to_writer_pretty(BufWriter::new(file), &wrapped)?;
        Ok(())
    }
}

/// Reads one artefact back from disk. This is deliberately a free function:
/// reloading a dump must not require a live solver, or a solver at all.
pub fn load_artefact<T: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<Artefact<T>, TikTakError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
