// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout module — where each page lands on the output canvas.

pub mod planner;

pub use planner::PageLayoutPlanner;
