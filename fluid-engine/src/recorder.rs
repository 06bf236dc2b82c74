// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Frame recording
//!
//! Serializes simulation frames to a plain-text log for offline playback:
//! a header with the particle count, frame limit, domain height, and the
//! sphere descriptors, then one line of space-separated truncated integer
//! coordinates per particle per frame. A pure consumer of the engine's
//! read-only queries; it imposes nothing on the engine beyond read
//! consistency between steps.

use std::io::{self, Write};

use crate::engine::FluidEngine;

/// Writes simulation frames to an underlying writer
pub struct FrameRecorder<W: Write> {
    writer: W,
    frames: u64,
}

impl<W: Write> FrameRecorder<W> {
    /// Create a recorder over the given writer
    pub fn new(writer: W) -> Self {
        FrameRecorder { writer, frames: 0 }
    }

    /// Number of frames recorded so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Write the run header: counts, frame limit, domain height, and one
    /// descriptor line per sphere (center coordinates then radius)
    pub fn write_header<const N: usize>(
        &mut self,
        engine: &FluidEngine<N>,
        frame_limit: u64,
    ) -> io::Result<()> {
        writeln!(self.writer, "{}", engine.particles().len())?;
        writeln!(self.writer, "{}", frame_limit)?;
        writeln!(self.writer, "{}", engine.parameters().extent[1] as i64)?;
        writeln!(self.writer, "{}", engine.rigid_spheres().len())?;
        for sphere in engine.rigid_spheres() {
            for axis in 0..N {
                write!(self.writer, "{} ", sphere.center[axis] as i64)?;
            }
            writeln!(self.writer, "{}", sphere.radius as i64)?;
        }
        Ok(())
    }

    /// Record one frame: a line of truncated integer coordinates per
    /// particle, in particle order
    pub fn record_frame<const N: usize>(&mut self, engine: &FluidEngine<N>) -> io::Result<()> {
        for particle in engine.particles() {
            let mut line = String::new();
            for axis in 0..N {
                if axis > 0 {
                    line.push(' ');
                }
                line.push_str(&(particle.position[axis] as i64).to_string());
            }
            writeln!(self.writer, "{}", line)?;
        }
        self.frames += 1;
        Ok(())
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
