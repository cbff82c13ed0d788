// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Services behind the command line: entries file, batch runner, progress line.

pub mod batch;
pub mod entries;
pub mod progress;
